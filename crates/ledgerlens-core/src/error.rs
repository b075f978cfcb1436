//! Error types for LedgerLens

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Caller input rejected before any persistence access
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credential
    #[error("{0}")]
    Unauthenticated(String),

    /// Record is absent or belongs to another owner (deliberately indistinguishable)
    #[error("{0}")]
    NotFound(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn transaction_not_found() -> Self {
        Self::NotFound("Transaction not found".to_string())
    }

    /// True for store-side failures (the caller did nothing wrong)
    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Pool(_) | Self::Encryption(_) | Self::Io(_) | Self::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
