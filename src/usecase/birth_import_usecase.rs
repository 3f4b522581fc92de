use crate::data::birthday_store::BirthdayStore;
use crate::models::data::ImportEntry;
use crate::models::domain::MonthDay;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Bulk-loads birthdays exported from another bot, e.g. a `birthdays.json` array of
/// `{userId, month, day, serverId}` objects.
pub struct BirthImportUsecase {
    store: Arc<BirthdayStore>,
}

impl BirthImportUsecase {
    pub fn new(store: Arc<BirthdayStore>) -> Self {
        BirthImportUsecase { store }
    }

    /// Entries with an invalid date or empty ids are skipped. A storage failure
    /// stops the import; entries before it are already persisted.
    pub async fn invoke(&self, entries: Vec<ImportEntry>) -> anyhow::Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        for entry in entries {
            if entry.user_id.trim().is_empty() || entry.server_id.trim().is_empty() {
                tracing::warn!(?entry, "Skipping entry without user or server id");
                summary.skipped += 1;
                continue;
            }
            let birth = match MonthDay::new(entry.month, entry.day) {
                Ok(birth) => birth,
                Err(e) => {
                    tracing::warn!(?entry, error = %e, "Skipping entry with invalid date");
                    summary.skipped += 1;
                    continue;
                }
            };
            self.store
                .upsert(&entry.user_id, &entry.server_id, birth)
                .await?;
            summary.imported += 1;
        }
        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "Birthdays imported"
        );
        Ok(summary)
    }
}
