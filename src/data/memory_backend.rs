use crate::data::birthday_backend::{BirthdayBackend, StoreChange};
use crate::error::StoreError;
use crate::models::data::{BirthdayKey, BirthdayRecord};
use poise::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Backend that keeps the "persisted" copy in memory. Survives store reloads as
/// long as the backend itself is shared.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    persisted: Mutex<Vec<BirthdayRecord>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following flush fail, as a broken disk or dropped connection would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn persisted(&self) -> Vec<BirthdayRecord> {
        self.persisted.lock().await.clone()
    }
}

#[async_trait]
impl BirthdayBackend for MemoryBackend {
    async fn load(&self) -> Result<Vec<BirthdayRecord>, StoreError> {
        Ok(self.persisted.lock().await.clone())
    }

    async fn flush(
        &self,
        _change: StoreChange<'_>,
        snapshot: &BTreeMap<BirthdayKey, BirthdayRecord>,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory backend rejects writes".to_string()));
        }
        *self.persisted.lock().await = snapshot.values().cloned().collect();
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
