//! # Database Schema Module
//!
//! Creates the `medical_guidelines` table and its lookup indexes.
//!
//! Titles are the natural key of a guidance row, but uniqueness is kept by
//! the upsert convention rather than by a constraint. Indexes cover the two
//! access paths: lookup by title on upsert and bulk delete by country.

use crate::store::error::DbError;
use libsql::{Connection, params};

/// Name of the guidance table
pub const GUIDANCE_TABLE: &str = "medical_guidelines";

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS medical_guidelines (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            summary TEXT,
            link_guidance TEXT,
            link_file TEXT,
            products TEXT,
            country TEXT,
            agency TEXT,
            json_data TEXT,
            all_text TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create {} table: {}", GUIDANCE_TABLE, e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_medical_guidelines_title ON medical_guidelines(title)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on title: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_medical_guidelines_country ON medical_guidelines(country)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on country: {}", e)))?;

    Ok(())
}
