//! # Database Error Types Module
//!
//! Error types for the guidance table. Upserts treat these as best-effort
//! failures; clearing a jurisdiction propagates them.

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// LibSQL error
    #[error("LibSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// SQL query error
    #[error("SQL query error: {0}")]
    Query(String),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Data error
    #[error("Data error: {0}")]
    Data(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<DbError> for CrateError {
    fn from(err: DbError) -> Self {
        CrateError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_crate_error() {
        let err: CrateError = DbError::Query("no such table".to_string()).into();
        match err {
            CrateError::Database(message) => assert!(message.contains("no such table")),
            other => panic!("expected database error, got {:?}", other),
        }
    }
}
