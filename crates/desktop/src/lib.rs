//! Local SQLite storage and configuration for Lorekeeper

pub mod config;
pub mod db;
pub mod store;

pub use config::Config;
pub use store::SqliteStore;
