pub const DEFAULT_COMMAND_PREFIX: &str = "!";

pub const DEFAULT_BIRTHDAYS_FILE: &str = "birthdays.json";

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60; // hourly

pub const DEFAULT_TIMEZONE: &str = "UTC";

// Used when a server has no system channel configured.
pub const FALLBACK_ANNOUNCEMENT_CHANNEL: &str = "general";

pub const DISCORD_TOKEN_KEY: &str = "DISCORD_TOKEN";
pub const DATABASE_URL_KEY: &str = "DATABASE_URL";
pub const BIRTHDAYS_FILE_KEY: &str = "BIRTHDAYS_FILE";
pub const COMMAND_PREFIX_KEY: &str = "COMMAND_PREFIX";
pub const SWEEP_INTERVAL_KEY: &str = "SWEEP_INTERVAL_SECS";
pub const TIMEZONE_KEY: &str = "BOT_TIMEZONE";
