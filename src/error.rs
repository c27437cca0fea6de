// Error types for the ranking core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Store lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Duplicate candidate id: {0}")]
    DuplicateId(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid counter value: {0}")]
    InvalidValue(String),

    #[error("Invalid ranking configuration: {0}")]
    InvalidConfig(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RankError>;
