// Postgres persistence for birthdays, one row per (server_id, user_id)

use crate::data::birthday_backend::{BirthdayBackend, StoreChange};
use crate::error::StoreError;
use crate::models::data::{BirthdayKey, BirthdayRecord, BirthdayRow};
use poise::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::BTreeMap;

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// The pool connects on first use, so an unreachable database surfaces as a
    /// load/flush error instead of a startup failure.
    pub fn connect_lazy(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)?;
        Ok(PostgresBackend { pool })
    }

    async fn select_birthdays(&self) -> Result<Vec<BirthdayRow>, StoreError> {
        let rows = sqlx::query_as::<_, BirthdayRow>(
            r#"
        SELECT server_id, user_id, month, day FROM birthdays
        "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert_birthday(&self, record: &BirthdayRecord) -> Result<(), StoreError> {
        let month = i32::try_from(record.birth.month()).map_err(|e| invalid(record, e))?;
        let day = i32::try_from(record.birth.day()).map_err(|e| invalid(record, e))?;
        sqlx::query(
            r#"
        INSERT INTO birthdays (server_id, user_id, month, day)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (server_id, user_id) DO UPDATE
        SET month = EXCLUDED.month, day = EXCLUDED.day
        "#,
        )
        .bind(&record.server_id)
        .bind(&record.user_id)
        .bind(month)
        .bind(day)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_birthday(&self, key: &BirthdayKey) -> Result<(), StoreError> {
        sqlx::query(
            r#"
        DELETE FROM birthdays
        WHERE server_id = $1 AND user_id = $2
        "#,
        )
        .bind(&key.server_id)
        .bind(&key.user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn invalid(record: &BirthdayRecord, e: impl std::fmt::Display) -> StoreError {
    StoreError::InvalidRecord {
        user_id: record.user_id.clone(),
        server_id: record.server_id.clone(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl BirthdayBackend for PostgresBackend {
    async fn load(&self) -> Result<Vec<BirthdayRecord>, StoreError> {
        sqlx::migrate!("db/migrations").run(&self.pool).await?;

        let rows = self.select_birthdays().await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match BirthdayRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "Skipping invalid birthday row"),
            }
        }
        Ok(records)
    }

    async fn flush(
        &self,
        change: StoreChange<'_>,
        _snapshot: &BTreeMap<BirthdayKey, BirthdayRecord>,
    ) -> Result<(), StoreError> {
        match change {
            StoreChange::Upserted(record) => self.upsert_birthday(record).await,
            StoreChange::Removed(key) => self.delete_birthday(key).await,
        }
    }

    fn describe(&self) -> String {
        "postgres".to_string()
    }
}
