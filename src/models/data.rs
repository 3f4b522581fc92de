use crate::error::StoreError;
use crate::models::domain::MonthDay;
use serde::{Deserialize, Serialize};

/// Composite key of a birthday: one record per member per server.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BirthdayKey {
    pub server_id: String,
    pub user_id: String,
}

impl BirthdayKey {
    pub fn new(server_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        BirthdayKey {
            server_id: server_id.into(),
            user_id: user_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayRecord {
    pub user_id: String,
    pub server_id: String,
    pub birth: MonthDay,
}

impl BirthdayRecord {
    pub fn key(&self) -> BirthdayKey {
        BirthdayKey::new(&self.server_id, &self.user_id)
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}

/// Value stored in the birthday file, keyed by `"{serverId}-{userId}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdayEntry {
    pub user_id: String,
    pub date: String,
    pub server_id: String,
}

impl BirthdayEntry {
    pub fn file_key(&self) -> String {
        format!("{}-{}", self.server_id, self.user_id)
    }
}

impl From<&BirthdayRecord> for BirthdayEntry {
    fn from(record: &BirthdayRecord) -> Self {
        BirthdayEntry {
            user_id: record.user_id.clone(),
            date: record.birth.to_string(),
            server_id: record.server_id.clone(),
        }
    }
}

impl TryFrom<BirthdayEntry> for BirthdayRecord {
    type Error = StoreError;

    fn try_from(entry: BirthdayEntry) -> Result<Self, Self::Error> {
        let birth = entry
            .date
            .parse::<MonthDay>()
            .map_err(|e| StoreError::InvalidRecord {
                user_id: entry.user_id.clone(),
                server_id: entry.server_id.clone(),
                reason: e.to_string(),
            })?;
        Ok(BirthdayRecord {
            user_id: entry.user_id,
            server_id: entry.server_id,
            birth,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct BirthdayRow {
    pub server_id: String,
    pub user_id: String,
    pub month: i32,
    pub day: i32,
}

impl TryFrom<BirthdayRow> for BirthdayRecord {
    type Error = StoreError;

    fn try_from(row: BirthdayRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| StoreError::InvalidRecord {
            user_id: row.user_id.clone(),
            server_id: row.server_id.clone(),
            reason,
        };
        let month = u32::try_from(row.month).map_err(|e| invalid(e.to_string()))?;
        let day = u32::try_from(row.day).map_err(|e| invalid(e.to_string()))?;
        let birth = MonthDay::new(month, day).map_err(|e| invalid(e.to_string()))?;
        Ok(BirthdayRecord {
            user_id: row.user_id,
            server_id: row.server_id,
            birth,
        })
    }
}

/// One member of a bulk import file: `{userId, month, day, serverId}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportEntry {
    pub user_id: String,
    pub month: u32,
    pub day: u32,
    pub server_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_uses_the_file_layout() {
        let record = BirthdayRecord {
            user_id: "42".to_string(),
            server_id: "7".to_string(),
            birth: MonthDay::new(3, 9).unwrap(),
        };
        let entry = BirthdayEntry::from(&record);
        assert_eq!(entry.file_key(), "7-42");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"userId": "42", "date": "3/9", "serverId": "7"})
        );
    }

    #[test]
    fn entry_with_bad_date_is_rejected() {
        let entry = BirthdayEntry {
            user_id: "42".to_string(),
            date: "13/40".to_string(),
            server_id: "7".to_string(),
        };
        assert!(matches!(
            BirthdayRecord::try_from(entry),
            Err(StoreError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn row_with_negative_day_is_rejected() {
        let row = BirthdayRow {
            server_id: "7".to_string(),
            user_id: "42".to_string(),
            month: 4,
            day: -1,
        };
        assert!(BirthdayRecord::try_from(row).is_err());
    }
}
