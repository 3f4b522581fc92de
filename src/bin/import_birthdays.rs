//! Import birthdays from a JSON array of `{userId, month, day, serverId}` objects
//! into the bot's store. Existing birthdays for the same member and server are
//! overwritten.
//!
//! With the file store, stop the bot first: it rewrites the whole file from its
//! in-memory copy on the next change and would drop the imported entries.

use anyhow::Context as _;
use birthday_bot_rs::config::StoreConfig;
use birthday_bot_rs::constants::DEFAULT_BIRTHDAYS_FILE;
use birthday_bot_rs::data::birthday_store::BirthdayStore;
use birthday_bot_rs::data::open_backend;
use birthday_bot_rs::models::data::ImportEntry;
use birthday_bot_rs::usecase::birth_import_usecase::BirthImportUsecase;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "import_birthdays")]
#[command(about = "Import birthdays from a JSON export into the birthday store")]
#[command(
    long_about = "Import birthdays from a JSON export into the birthday store.\n\n\
With the file store (no DATABASE_URL), stop the bot before importing: a running bot \
rewrites the file from its in-memory copy on its next change and silently drops \
the imported birthdays."
)]
#[command(version)]
struct Args {
    /// JSON file to import
    #[arg(short, long, default_value = "birthdays.import.json")]
    input: PathBuf,

    /// Postgres connection string; takes precedence over --store-file
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Birthday file used when no database is configured
    #[arg(long, env = "BIRTHDAYS_FILE", default_value = DEFAULT_BIRTHDAYS_FILE)]
    store_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("import_birthdays=info,birthday_bot_rs=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let content = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let entries: Vec<ImportEntry> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of birthdays", args.input.display()))?;
    tracing::info!(count = entries.len(), input = %args.input.display(), "Read import file");

    let store_config = match args.database_url.filter(|url| !url.trim().is_empty()) {
        Some(database_url) => StoreConfig::Postgres { database_url },
        None => StoreConfig::JsonFile {
            path: args.store_file,
        },
    };
    let backend = open_backend(&store_config)?;
    let store = Arc::new(BirthdayStore::load(backend).await);

    let summary = BirthImportUsecase::new(store.clone()).invoke(entries).await?;
    println!(
        "Birthdays imported: {} (skipped {}), store now holds {}",
        summary.imported,
        summary.skipped,
        store.len().await
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn help_warns_about_importing_while_the_bot_runs() {
        let long_about = Args::command().get_long_about().unwrap().to_string();
        assert!(long_about.contains("stop the bot before importing"));
    }

    #[test]
    fn store_file_defaults_to_the_bot_file() {
        let args = Args::try_parse_from(["import_birthdays", "--input", "in.json"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.json"));
        if std::env::var_os("BIRTHDAYS_FILE").is_none() {
            assert_eq!(args.store_file, PathBuf::from(DEFAULT_BIRTHDAYS_FILE));
        }
    }
}
