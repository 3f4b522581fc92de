//! In-memory birthday collection backed by a durable [`BirthdayBackend`].
//!
//! Reads are served from memory. Every mutation holds the lock until the backend
//! has flushed it; a failed flush rolls the in-memory change back, so the cache
//! never runs ahead of what is persisted.

use crate::data::birthday_backend::{BirthdayBackend, StoreChange};
use crate::error::StoreError;
use crate::models::data::{BirthdayKey, BirthdayRecord};
use crate::models::domain::MonthDay;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct BirthdayStore {
    records: Mutex<BTreeMap<BirthdayKey, BirthdayRecord>>,
    backend: Arc<dyn BirthdayBackend>,
}

impl BirthdayStore {
    /// Build the store from whatever the backend holds. A backend that cannot be
    /// read is logged and the store starts empty instead of failing startup.
    pub async fn load(backend: Arc<dyn BirthdayBackend>) -> Self {
        let store = BirthdayStore {
            records: Mutex::new(BTreeMap::new()),
            backend,
        };
        store.reload().await;
        store
    }

    /// Replace the in-memory contents with the backend's. Returns the record count.
    pub async fn reload(&self) -> usize {
        let loaded = match self.backend.load().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(
                    backend = %self.backend.describe(),
                    error = %e,
                    "Failed to load birthdays, continuing with an empty store"
                );
                Vec::new()
            }
        };

        let mut records = self.records.lock().await;
        records.clear();
        for record in loaded {
            if let Some(previous) = records.insert(record.key(), record) {
                tracing::warn!(
                    server_id = %previous.server_id,
                    user_id = %previous.user_id,
                    "Duplicate persisted birthday, keeping the last one"
                );
            }
        }
        tracing::info!(
            backend = %self.backend.describe(),
            count = records.len(),
            "Loaded birthdays"
        );
        records.len()
    }

    /// Insert or overwrite the birthday of `user_id` in `server_id`.
    pub async fn upsert(
        &self,
        user_id: &str,
        server_id: &str,
        birth: MonthDay,
    ) -> Result<(), StoreError> {
        let record = BirthdayRecord {
            user_id: user_id.to_string(),
            server_id: server_id.to_string(),
            birth,
        };
        let key = record.key();

        let mut records = self.records.lock().await;
        let previous = records.insert(key.clone(), record.clone());
        if let Err(e) = self
            .backend
            .flush(StoreChange::Upserted(&record), &records)
            .await
        {
            match previous {
                Some(previous) => records.insert(key, previous),
                None => records.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Delete the birthday if present. Returns whether one existed.
    pub async fn remove(&self, user_id: &str, server_id: &str) -> Result<bool, StoreError> {
        let key = BirthdayKey::new(server_id, user_id);

        let mut records = self.records.lock().await;
        let Some(previous) = records.remove(&key) else {
            return Ok(false);
        };
        if let Err(e) = self
            .backend
            .flush(StoreChange::Removed(&key), &records)
            .await
        {
            records.insert(key, previous);
            return Err(e);
        }
        Ok(true)
    }

    /// All birthdays of one server, in no particular order.
    pub async fn list_by_server(&self, server_id: &str) -> Vec<BirthdayRecord> {
        self.records
            .lock()
            .await
            .values()
            .filter(|record| record.server_id == server_id)
            .cloned()
            .collect()
    }

    /// Birthdays on `month_day` across every server.
    pub async fn due_today(&self, month_day: MonthDay) -> Vec<BirthdayRecord> {
        self.records
            .lock()
            .await
            .values()
            .filter(|record| record.birth == month_day)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}
