pub mod birthday_backend;
pub mod birthday_store;
pub mod guild_gateway;
pub mod json_file_backend;
pub mod memory_backend;
pub mod postgres_backend;

use crate::config::StoreConfig;
use crate::data::birthday_backend::BirthdayBackend;
use crate::data::json_file_backend::JsonFileBackend;
use crate::data::postgres_backend::PostgresBackend;
use crate::error::StoreError;
use std::sync::Arc;

/// Backend selected by configuration: Postgres when a connection string is set,
/// otherwise the JSON file.
pub fn open_backend(config: &StoreConfig) -> Result<Arc<dyn BirthdayBackend>, StoreError> {
    let backend: Arc<dyn BirthdayBackend> = match config {
        StoreConfig::Postgres { database_url } => {
            Arc::new(PostgresBackend::connect_lazy(database_url)?)
        }
        StoreConfig::JsonFile { path } => Arc::new(JsonFileBackend::new(path)),
    };
    Ok(backend)
}
