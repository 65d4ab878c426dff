//! Error types for Lorekeeper

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LorekeeperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store read error: {0}")]
    StoreRead(String),

    #[error("Store write error: {0}")]
    StoreWrite(String),
}

pub type Result<T> = std::result::Result<T, LorekeeperError>;
