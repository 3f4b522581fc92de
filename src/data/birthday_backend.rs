//! Persistence seam of the birthday store.
//!
//! The store keeps every record in memory and hands each mutation to a backend
//! before acknowledging it. Backends that persist a whole document (the JSON file)
//! write `snapshot`; row-oriented backends (Postgres) apply `change`.

use crate::error::StoreError;
use crate::models::data::{BirthdayKey, BirthdayRecord};
use poise::async_trait;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange<'a> {
    Upserted(&'a BirthdayRecord),
    Removed(&'a BirthdayKey),
}

#[async_trait]
pub trait BirthdayBackend: Send + Sync {
    /// Read every persisted record. Entries that fail validation are skipped with a
    /// warning; an unreadable source is an error.
    async fn load(&self) -> Result<Vec<BirthdayRecord>, StoreError>;

    /// Durably apply `change`. `snapshot` already reflects it.
    async fn flush(
        &self,
        change: StoreChange<'_>,
        snapshot: &BTreeMap<BirthdayKey, BirthdayRecord>,
    ) -> Result<(), StoreError>;

    fn describe(&self) -> String;
}
