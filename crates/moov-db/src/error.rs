use std::fmt;

use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Column whose UNIQUE constraint rejected an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Name,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Name => f.write_str("name"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("record not found")]
    NotFound,

    #[error("insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory { requested: i64, available: i64 },

    #[error("ticket quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("duplicate {0}")]
    Duplicate(UniqueField),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("venue file has no {0} column")]
    MissingColumn(&'static str),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DB lock poisoned: {0}")]
    LockPoisoned(String),
}

impl Error {
    /// Converts a UNIQUE violation on `users` into [`Error::Duplicate`],
    /// passing every other error through.
    pub(crate) fn from_user_insert(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, Some(msg)) = &err {
            if code.code == ErrorCode::ConstraintViolation && msg.contains("UNIQUE") {
                if msg.contains("users.email") {
                    return Self::Duplicate(UniqueField::Email);
                }
                if msg.contains("users.name") {
                    return Self::Duplicate(UniqueField::Name);
                }
            }
        }
        Self::Sqlite(err)
    }
}
