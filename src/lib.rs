//! Birthday bot for Discord servers.
//!
//! Members register birthdays with text commands (`!addbirthday 04/09`) or the
//! `/birthday` slash command; a background sweep announces each birthday in the
//! server's system channel on the day.

pub mod clock;
pub mod command_handler;
pub mod commands;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod models;
pub mod res;
pub mod usecase;
pub mod worker;
