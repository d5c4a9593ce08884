use super::GenerationRecord;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Builder, Connection, Row, params};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const SELECT_COLUMNS: &str = "SELECT id, owner, full_name, email, target_position, \
     target_industry, form_data, job_description, generated_resume, estimated_ats_score, \
     keywords_matched, analysis, recommendations, created_at FROM generations";

/// Generation history keyed by identity owner.
pub struct HistoryStorage {
    // A single shared connection; `:memory:` databases do not survive reconnects.
    db: Option<Connection>,
    // In-memory fallback storage
    fallback: Arc<Mutex<Vec<GenerationRecord>>>,
}

impl HistoryStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let mut storage = Self {
            db: None,
            fallback: Arc::new(Mutex::new(Vec::new())),
        };

        match storage.init_database(db_path).await {
            Ok(()) => {
                info!("Database initialized successfully: {}", db_path);
            }
            Err(e) => {
                warn!(
                    "Database initialization failed, using in-memory fallback: {}",
                    e
                );
            }
        }

        Ok(storage)
    }

    pub fn is_persistent(&self) -> bool {
        self.db.is_some()
    }

    async fn init_database(&mut self, db_path: &str) -> Result<()> {
        let db = Builder::new_local(db_path).build().await?;

        let conn = db.connect()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS generations (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL,
                target_position TEXT NOT NULL,
                target_industry TEXT NOT NULL,
                form_data TEXT NOT NULL,
                job_description TEXT NOT NULL,
                generated_resume TEXT NOT NULL,
                estimated_ats_score INTEGER NOT NULL,
                keywords_matched INTEGER NOT NULL,
                analysis TEXT NOT NULL,
                recommendations TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            (),
        )
        .await?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_generations_owner ON generations (owner, created_at)",
            (),
        )
        .await?;

        self.db = Some(conn);
        Ok(())
    }

    pub async fn save(&self, record: GenerationRecord) -> Result<()> {
        if let Some(ref conn) = self.db {
            match self.save_to_db(conn, &record).await {
                Ok(()) => {
                    debug!("Generation {} saved to database", record.id);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Failed to save to database, using fallback: {}", e);
                }
            }
        }

        self.save_to_fallback(record)
    }

    async fn save_to_db(&self, conn: &Connection, record: &GenerationRecord) -> Result<()> {
        conn.execute(
            "INSERT INTO generations (id, owner, full_name, email, target_position, \
             target_industry, form_data, job_description, generated_resume, \
             estimated_ats_score, keywords_matched, analysis, recommendations, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                record.id.clone(),
                record.owner.clone(),
                record.full_name.clone(),
                record.email.clone(),
                record.target_position.clone(),
                record.target_industry.clone(),
                serde_json::to_string(&record.form_data)?,
                record.job_description.clone(),
                record.generated_resume.clone(),
                i64::from(record.estimated_ats_score),
                i64::from(record.keywords_matched),
                serde_json::to_string(&record.analysis)?,
                serde_json::to_string(&record.recommendations)?,
                record
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )
        .await?;
        Ok(())
    }

    fn save_to_fallback(&self, record: GenerationRecord) -> Result<()> {
        let mut fallback = self
            .fallback
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))?;
        fallback.push(record);
        Ok(())
    }

    /// Record `id` if it belongs to `owner`; `NotFound` otherwise.
    pub async fn get(&self, owner: &str, id: &str) -> Result<GenerationRecord> {
        if let Some(ref conn) = self.db {
            match self.get_from_db(conn, owner, id).await {
                Ok(Some(record)) => return Ok(record),
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to read from database, using fallback: {}", e);
                }
            }
        }

        self.fallback_records(owner)?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| Error::not_found(format!("Resume {id} not found")))
    }

    async fn get_from_db(
        &self,
        conn: &Connection,
        owner: &str,
        id: &str,
    ) -> Result<Option<GenerationRecord>> {
        let mut rows = conn
            .query(
                &format!("{SELECT_COLUMNS} WHERE id = ? AND owner = ?"),
                params![id.to_string(), owner.to_string()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// All records for `owner`, newest first.
    pub async fn list(&self, owner: &str) -> Result<Vec<GenerationRecord>> {
        let mut records = Vec::new();

        if let Some(ref conn) = self.db {
            match self.list_from_db(conn, owner).await {
                Ok(from_db) => {
                    debug!(
                        "Retrieved {} generations from database for {}",
                        from_db.len(),
                        owner
                    );
                    records = from_db;
                }
                Err(e) => {
                    warn!("Failed to read from database, using fallback: {}", e);
                }
            }
        }

        records.extend(self.fallback_records(owner)?);
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    pub async fn latest(&self, owner: &str) -> Result<Option<GenerationRecord>> {
        Ok(self.list(owner).await?.into_iter().next())
    }

    async fn list_from_db(&self, conn: &Connection, owner: &str) -> Result<Vec<GenerationRecord>> {
        let mut rows = conn
            .query(
                &format!("{SELECT_COLUMNS} WHERE owner = ? ORDER BY created_at DESC, rowid DESC"),
                params![owner.to_string()],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(record_from_row(&row)?);
        }

        Ok(records)
    }

    fn fallback_records(&self, owner: &str) -> Result<Vec<GenerationRecord>> {
        let fallback = self
            .fallback
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))?;

        // Newest insert first so equal timestamps still sort newest-first.
        Ok(fallback
            .iter()
            .rev()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect())
    }
}

fn record_from_row(row: &Row) -> Result<GenerationRecord> {
    let form_data: String = row.get(6)?;
    let score: i64 = row.get(9)?;
    let keywords_matched: i64 = row.get(10)?;
    let analysis: String = row.get(11)?;
    let recommendations: String = row.get(12)?;
    let created_at: String = row.get(13)?;

    Ok(GenerationRecord {
        id: row.get(0)?,
        owner: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        target_position: row.get(4)?,
        target_industry: row.get(5)?,
        form_data: serde_json::from_str(&form_data)?,
        job_description: row.get(7)?,
        generated_resume: row.get(8)?,
        estimated_ats_score: u8::try_from(score)
            .map_err(|_| Error::internal(format!("Stored score out of range: {score}")))?,
        keywords_matched: u32::try_from(keywords_matched).map_err(|_| {
            Error::internal(format!("Stored keyword count out of range: {keywords_matched}"))
        })?,
        analysis: serde_json::from_str(&analysis)?,
        recommendations: serde_json::from_str(&recommendations)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::internal(format!("Failed to parse timestamp: {e}")))?
            .with_timezone(&Utc),
    })
}
