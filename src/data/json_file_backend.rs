//! Flat-file backend: a single JSON object keyed by `"{serverId}-{userId}"`.
//!
//! Every flush rewrites the whole file through a temp file and a rename, so a
//! crash mid-write leaves the previous version in place.

use crate::data::birthday_backend::{BirthdayBackend, StoreChange};
use crate::error::StoreError;
use crate::models::data::{BirthdayEntry, BirthdayKey, BirthdayRecord};
use poise::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

pub struct JsonFileBackend {
    path: PathBuf,
    // 読めなかったファイルは退避できるまで上書きしない
    write_protected: AtomicBool,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileBackend {
            path: path.into(),
            write_protected: AtomicBool::new(false),
        }
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }

    /// Keep a copy of an unreadable file so the next flush does not destroy it.
    /// When no copy can be made, flushes are refused until a later load succeeds.
    async fn quarantine(&self) {
        let backup = self.sibling(".corrupt");
        match tokio::fs::copy(&self.path, &backup).await {
            Ok(_) => tracing::warn!(
                backup = %backup.display(),
                "Copied unreadable birthday file aside"
            ),
            Err(e) => {
                tracing::error!(
                    backup = %backup.display(),
                    error = %e,
                    "Failed to copy unreadable birthday file aside, refusing to overwrite it"
                );
                self.write_protected.store(true, Ordering::SeqCst);
            }
        }
    }
}

#[async_trait]
impl BirthdayBackend for JsonFileBackend {
    async fn load(&self) -> Result<Vec<BirthdayRecord>, StoreError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No birthday file yet, starting empty");
                self.write_protected.store(false, Ordering::SeqCst);
                return Ok(Vec::new());
            }
            Err(e) => {
                self.quarantine().await;
                return Err(self.io_error(&self.path, e));
            }
        };

        let entries: BTreeMap<String, BirthdayEntry> = match serde_json::from_slice(&content) {
            Ok(entries) => entries,
            Err(source) => {
                self.quarantine().await;
                return Err(StoreError::Malformed {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        self.write_protected.store(false, Ordering::SeqCst);
        let mut records = Vec::with_capacity(entries.len());
        for (file_key, entry) in entries {
            match BirthdayRecord::try_from(entry) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(%file_key, error = %e, "Skipping invalid birthday entry"),
            }
        }
        Ok(records)
    }

    async fn flush(
        &self,
        _change: StoreChange<'_>,
        snapshot: &BTreeMap<BirthdayKey, BirthdayRecord>,
    ) -> Result<(), StoreError> {
        if self.write_protected.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!(
                "{} could not be read or copied aside, not overwriting it",
                self.path.display()
            )));
        }

        let entries: BTreeMap<String, BirthdayEntry> = snapshot
            .values()
            .map(BirthdayEntry::from)
            .map(|entry| (entry.file_key(), entry))
            .collect();
        let json = serde_json::to_string_pretty(&entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(parent, e))?;
        }

        let tmp_path = self.sibling(".tmp");
        tokio::fs::write(&tmp_path, json.as_bytes())
            .await
            .map_err(|e| self.io_error(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(&self.path, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::MonthDay;

    fn record(server: &str, user: &str, month: u32, day: u32) -> BirthdayRecord {
        BirthdayRecord {
            user_id: user.to_string(),
            server_id: server.to_string(),
            birth: MonthDay::new(month, day).unwrap(),
        }
    }

    fn snapshot(records: &[BirthdayRecord]) -> BTreeMap<BirthdayKey, BirthdayRecord> {
        records.iter().map(|r| (r.key(), r.clone())).collect()
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("birthdays.json"));
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn flush_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested").join("birthdays.json"));
        let records = vec![record("1", "10", 1, 1), record("2", "20", 12, 31)];
        let snapshot = snapshot(&records);

        backend
            .flush(StoreChange::Upserted(&records[0]), &snapshot)
            .await
            .unwrap();

        let mut loaded = backend.load().await.unwrap();
        loaded.sort_by_key(|r| r.key());
        assert_eq!(loaded, records);
    }

    #[tokio::test]
    async fn writes_the_documented_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birthdays.json");
        let backend = JsonFileBackend::new(&path);
        let records = vec![record("55", "99", 7, 4)];

        backend
            .flush(StoreChange::Upserted(&records[0]), &snapshot(&records))
            .await
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!({"55-99": {"userId": "99", "date": "7/4", "serverId": "55"}})
        );
        assert!(!dir.path().join("birthdays.json.tmp").exists());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error_and_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birthdays.json");
        std::fs::write(&path, "{ not json").unwrap();
        let backend = JsonFileBackend::new(&path);

        let result = backend.load().await;

        assert!(matches!(result, Err(StoreError::Malformed { .. })));
        let backup = dir.path().join("birthdays.json.corrupt");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn non_utf8_file_is_kept_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birthdays.json");
        let mut content = br#"{"1-10": {"userId": "10", "date": "5/12", "serverId": "1"}, "1-"#.to_vec();
        content.extend_from_slice(&[0xFF, 0xFE]);
        content.extend_from_slice(br#"": {"userId": "1"#);
        content.extend_from_slice(&[0xFF]);
        content.extend_from_slice(br#"", "date": "1/2", "serverId": "1"}}"#);
        std::fs::write(&path, &content).unwrap();
        let backend = JsonFileBackend::new(&path);

        assert!(backend.load().await.is_err());

        let backup = dir.path().join("birthdays.json.corrupt");
        assert_eq!(std::fs::read(backup).unwrap(), content);
    }

    #[tokio::test]
    async fn unreadable_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        // ディレクトリは読めないしコピーもできない
        let path = dir.path().join("birthdays.json");
        std::fs::create_dir(&path).unwrap();
        let backend = JsonFileBackend::new(&path);

        assert!(matches!(backend.load().await, Err(StoreError::Io { .. })));

        let records = vec![record("9", "90", 1, 1)];
        let result = backend
            .flush(StoreChange::Upserted(&records[0]), &snapshot(&records))
            .await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert!(path.is_dir());
    }

    #[tokio::test]
    async fn invalid_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birthdays.json");
        std::fs::write(
            &path,
            r#"{
                "1-10": {"userId": "10", "date": "5/12", "serverId": "1"},
                "1-11": {"userId": "11", "date": "14/2", "serverId": "1"}
            }"#,
        )
        .unwrap();

        let loaded = JsonFileBackend::new(&path).load().await.unwrap();

        assert_eq!(loaded, vec![record("1", "10", 5, 12)]);
    }
}
