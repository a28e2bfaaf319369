//! Error types for the engine crate.
//!
//! Unknown ids and numeric caps/floors are never errors. Assignment
//! conflicts are reported through `AssignOutcome`, not here.

use thiserror::Error;
use workhorse_logic::constants::WorkerKind;
use workhorse_logic::ids::WorkerId;

/// Errors that can occur during save/load.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Errors raised while loading or validating a `SimConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Level catalog is empty")]
    EmptyCatalog,

    #[error("Duplicate level id: {0}")]
    DuplicateLevel(String),

    #[error("Level {0} has a turn limit of zero")]
    InvalidTurnLimit(String),

    #[error("Consolation fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),
}

/// Errors from level transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("Level not found: {0}")]
    UnknownLevel(String),

    #[error("No level is loaded")]
    NoLevelLoaded,

    #[error("Level {0} is the last level")]
    NoNextLevel(String),

    #[error("Level {0} is still in progress")]
    InProgress(String),
}

/// Errors from currency transactions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopError {
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Worker not found: {0}")]
    UnknownWorker(WorkerId),

    #[error("Worker {0} is already revealed")]
    AlreadyRevealed(WorkerId),

    #[error("{0} is not available in this level")]
    KindUnavailable(WorkerKind),

    #[error("Invalid workspace placement")]
    InvalidPlacement,
}

pub type SaveResult<T> = std::result::Result<T, SaveError>;
pub type ShopResult<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShopError::InsufficientFunds {
            needed: 40,
            available: 12,
        };
        assert_eq!(err.to_string(), "Insufficient funds: need 40, have 12");

        let err = SaveError::VersionMismatch {
            expected: 1,
            found: 7,
        };
        assert!(err.to_string().contains("expected 1, found 7"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SaveError = io_err.into();
        assert!(matches!(err, SaveError::Io(_)));
    }
}
