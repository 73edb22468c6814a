//! Database operations for the guidance table

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use libsql::{Connection, Database, Row, params};
use tracing::{debug, error, info, instrument, warn};

use crate::config::{DatabaseConfig, ScraperConfig};
use crate::extract::extract_text;
use crate::store::error::DbError;
use crate::store::schema;
use crate::store::{GuidanceDocument, GuidanceRecord, UpsertOutcome, merge_all_text};

const RECORD_COLUMNS: &str = "id, title, COALESCE(summary, ''), COALESCE(link_guidance, ''),
    COALESCE(link_file, ''), COALESCE(products, ''), COALESCE(country, ''),
    COALESCE(agency, ''), COALESCE(json_data, '{}'), COALESCE(all_text, ''),
    created_at, updated_at";

/// Store for guidance rows
///
/// A fresh connection is opened for every operation and dropped when it
/// completes.
#[derive(Clone)]
pub struct GuidanceStore {
    db: Arc<Database>,
    base_url: String,
    country: String,
    agency: String,
}

impl GuidanceStore {
    /// Open the configured database and make sure the schema exists
    pub async fn open(db_config: &DatabaseConfig, config: &ScraperConfig) -> Result<Self, DbError> {
        let db = match db_config {
            DatabaseConfig::Local { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DbError::Connection(format!(
                            "Failed to create database directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
                libsql::Builder::new_local(path)
                    .build()
                    .await
                    .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?
            }
            DatabaseConfig::Remote { url, auth_token } => {
                libsql::Builder::new_remote(url.clone(), auth_token.clone())
                    .build()
                    .await
                    .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?
            }
        };

        let store = Self {
            db: Arc::new(db),
            base_url: config.base_url.clone(),
            country: config.country.clone(),
            agency: config.agency.clone(),
        };

        let conn = store.connect()?;
        schema::initialize_schema(&conn).await?;

        Ok(store)
    }

    /// Open a local database file
    pub async fn new_from_path(path: &Path, config: &ScraperConfig) -> Result<Self, DbError> {
        let db_config = DatabaseConfig::Local {
            path: path.to_path_buf(),
        };
        Self::open(&db_config, config).await
    }

    fn connect(&self) -> Result<Connection, DbError> {
        self.db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))
    }

    /// Absolute guidance link for a file URL
    pub fn guidance_url(&self, file_url: &str) -> String {
        if file_url.starts_with("http") {
            file_url.to_string()
        } else {
            format!("{}{}", self.base_url, file_url)
        }
    }

    fn summary(&self, section: &str) -> String {
        format!("Guidance document from {} {}", self.agency, section)
    }

    /// Extract the text of a downloaded file and record it under its title
    #[instrument(skip(self, doc), fields(title = %doc.title))]
    pub async fn upsert_guidance(&self, doc: &GuidanceDocument) -> Result<UpsertOutcome, DbError> {
        let path = doc.file_path.clone();
        let text = tokio::task::spawn_blocking(move || extract_text(&path))
            .await
            .unwrap_or_else(|e| {
                warn!("Text extraction task failed for {}: {}", doc.file_path.display(), e);
                String::new()
            });

        self.upsert_with_text(doc, &text).await
    }

    /// Record a document under its title using already extracted text
    ///
    /// An existing row keeps its title and creation time; everything else is
    /// overwritten except `all_text`, which accumulates.
    pub async fn upsert_with_text(
        &self,
        doc: &GuidanceDocument,
        new_text: &str,
    ) -> Result<UpsertOutcome, DbError> {
        let conn = self.connect()?;

        let mut rows = conn
            .query(
                "SELECT COALESCE(all_text, '') FROM medical_guidelines WHERE title = ?",
                params![doc.title.clone()],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to look up title: {}", e)))?;

        let existing: Option<String> = match rows.next().await {
            Ok(Some(row)) => Some(
                row.get(0)
                    .map_err(|e| DbError::Data(format!("Failed to read all_text: {}", e)))?,
            ),
            Ok(None) => None,
            Err(e) => return Err(DbError::Data(format!("Failed to look up title: {}", e))),
        };
        drop(rows);

        let now = Utc::now().to_rfc3339();
        let json_data = serde_json::json!({ "section": doc.section }).to_string();
        let link_guidance = self.guidance_url(&doc.file_url);
        let link_file = doc.file_path.to_string_lossy().to_string();

        match existing {
            Some(previous) => {
                let all_text = merge_all_text(&previous, new_text);
                conn.execute(
                    "UPDATE medical_guidelines SET
                        summary = ?,
                        link_guidance = ?,
                        link_file = ?,
                        products = ?,
                        json_data = ?,
                        all_text = ?,
                        updated_at = ?
                     WHERE title = ?",
                    params![
                        self.summary(&doc.section),
                        link_guidance,
                        link_file,
                        doc.product_type.as_str(),
                        json_data,
                        all_text,
                        now,
                        doc.title.clone(),
                    ],
                )
                .await
                .map_err(|e| DbError::Query(format!("Failed to update guidance: {}", e)))?;

                debug!("Updated guidance row for {}", doc.title);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                conn.execute(
                    "INSERT INTO medical_guidelines (
                        title, summary, link_guidance, link_file, products,
                        country, agency, json_data, all_text, created_at, updated_at
                     ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    params![
                        doc.title.clone(),
                        self.summary(&doc.section),
                        link_guidance,
                        link_file,
                        doc.product_type.as_str(),
                        self.country.clone(),
                        self.agency.clone(),
                        json_data,
                        new_text,
                        now.clone(),
                        now,
                    ],
                )
                .await
                .map_err(|e| DbError::Query(format!("Failed to insert guidance: {}", e)))?;

                debug!("Inserted guidance row for {}", doc.title);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    /// Delete every row of a jurisdiction, returning how many were removed
    #[instrument(skip(self))]
    pub async fn clear_jurisdiction(&self, country: &str) -> Result<u64, DbError> {
        let conn = self.connect()?;

        info!("Removing all entries from {}", country);
        let deleted = conn
            .execute(
                "DELETE FROM medical_guidelines WHERE country = ?",
                params![country],
            )
            .await
            .map_err(|e| {
                error!("Error clearing {} entries: {}", country, e);
                DbError::Query(format!("Failed to clear {}: {}", country, e))
            })?;

        debug!("Removed {} entries from {}", deleted, country);
        Ok(deleted)
    }

    /// Get the first row with this exact title
    pub async fn find_by_title(&self, title: &str) -> Result<Option<GuidanceRecord>, DbError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} FROM medical_guidelines WHERE title = ? ORDER BY id LIMIT 1",
            RECORD_COLUMNS
        );

        let mut rows = conn
            .query(&sql, params![title])
            .await
            .map_err(|e| DbError::Query(format!("Failed to get guidance: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_record(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DbError::Data(format!("Failed to get guidance: {}", e))),
        }
    }

    /// All rows of a jurisdiction in insertion order
    pub async fn records_for_country(&self, country: &str) -> Result<Vec<GuidanceRecord>, DbError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT {} FROM medical_guidelines WHERE country = ? ORDER BY id",
            RECORD_COLUMNS
        );

        let mut rows = conn
            .query(&sql, params![country])
            .await
            .map_err(|e| DbError::Query(format!("Failed to list guidance: {}", e)))?;

        let mut records = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DbError::Data(format!("Failed to list guidance: {}", e)))?
        {
            records.push(row_to_record(&row)?);
        }

        Ok(records)
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::Data(format!("Invalid timestamp {:?}: {}", value, e)))
}

fn row_to_record(row: &Row) -> Result<GuidanceRecord, DbError> {
    let json_data: String = row.get(8)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(GuidanceRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        summary: row.get(2)?,
        link_guidance: row.get(3)?,
        link_file: row.get(4)?,
        products: row.get(5)?,
        country: row.get(6)?,
        agency: row.get(7)?,
        json_data: serde_json::from_str(&json_data)
            .map_err(|e| DbError::Data(format!("Invalid json_data: {}", e)))?,
        all_text: row.get(9)?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
