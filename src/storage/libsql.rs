//! LibSQL feedback store implementation
//!
//! Persistent append-only storage for feedback events. The polarity
//! invariant is enforced twice: the `Polarity` type makes an out-of-range
//! value unrepresentable past the boundary, and a SQL CHECK constraint
//! rejects anything that would reach the table another way.

use crate::error::{FabulaError, Result};
use crate::storage::FeedbackStore;
use crate::types::{FeedbackEvent, FeedbackId, FeedbackSubmission, FeedbackSummary, Polarity};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{params, Builder, Connection, Database};
use tracing::{debug, info};

/// Feedback table schema. Applied idempotently at startup.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS feedback (
    id        TEXT PRIMARY KEY,
    text_id   TEXT NOT NULL CHECK (length(text_id) > 0),
    polarity  INTEGER NOT NULL CHECK (polarity IN (1, -1)),
    timestamp TEXT NOT NULL,
    user_id   TEXT,
    context   TEXT
);
CREATE INDEX IF NOT EXISTS idx_feedback_polarity ON feedback (polarity);
"#;

/// Database connection mode
#[derive(Debug, Clone)]
pub enum ConnectionMode {
    /// Local file-based database
    Local(String),
    /// In-memory database (for testing and scratch use)
    InMemory,
}

/// LibSQL feedback store
///
/// Holds a single connection opened at construction and shared by every
/// operation. libSQL gives each `:memory:` connection its own private
/// database, so per-operation connections would not see each other's writes
/// in in-memory mode.
pub struct LibsqlFeedbackStore {
    /// Kept open so the cached connection stays valid for the store's lifetime
    _db: Database,
    conn: Connection,
}

impl LibsqlFeedbackStore {
    /// Open the database and apply the schema
    pub async fn new(mode: ConnectionMode) -> Result<Self> {
        let path = match &mode {
            ConnectionMode::Local(path) => path.clone(),
            ConnectionMode::InMemory => ":memory:".to_string(),
        };

        info!("Opening feedback store: {:?}", mode);

        let db = Builder::new_local(&path)
            .build()
            .await
            .map_err(|e| FabulaError::Database(format!("Failed to open database: {}", e)))?;
        let conn = db
            .connect()
            .map_err(|e| FabulaError::Database(format!("Failed to get connection: {}", e)))?;

        conn.execute_batch(SCHEMA)
            .await
            .map_err(|e| FabulaError::Database(format!("Failed to apply schema: {}", e)))?;

        debug!("Feedback store ready");
        Ok(Self { _db: db, conn })
    }

    /// Convenience constructor taking a config-style path string
    /// (`:memory:` selects the in-memory mode)
    pub async fn from_path(path: &str) -> Result<Self> {
        let mode = if path == ":memory:" {
            ConnectionMode::InMemory
        } else {
            ConnectionMode::Local(path.to_string())
        };
        Self::new(mode).await
    }

    fn row_to_event(row: &libsql::Row) -> Result<FeedbackEvent> {
        let id_str: String = row.get(0)?;
        let id = FeedbackId::from_string(&id_str)
            .map_err(|e| FabulaError::Database(format!("Invalid feedback ID in store: {}", e)))?;

        let text_id: String = row.get(1)?;

        let polarity_raw: i64 = row.get(2)?;
        let polarity = Polarity::try_from(polarity_raw).map_err(|_| {
            FabulaError::Database(format!("Invalid polarity in store: {}", polarity_raw))
        })?;

        let timestamp_str: String = row.get(3)?;
        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_str)
            .map_err(|e| FabulaError::Database(format!("Invalid timestamp in store: {}", e)))?
            .with_timezone(&Utc);

        let user_id: Option<String> = row.get(4)?;
        let context: Option<String> = row.get(5)?;

        Ok(FeedbackEvent {
            id,
            text_id,
            polarity,
            timestamp,
            user_id,
            context,
        })
    }
}

#[async_trait]
impl FeedbackStore for LibsqlFeedbackStore {
    async fn insert(&self, submission: FeedbackSubmission) -> Result<FeedbackEvent> {
        if submission.text_id.is_empty() {
            return Err(FabulaError::Validation(
                "textId must not be empty".to_string(),
            ));
        }

        let event = FeedbackEvent {
            id: FeedbackId::new(),
            text_id: submission.text_id,
            polarity: submission.polarity,
            timestamp: Utc::now(),
            user_id: submission.user_id,
            context: submission.context,
        };

        self.conn
            .execute(
                r#"
                INSERT INTO feedback (id, text_id, polarity, timestamp, user_id, context)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    event.id.to_string(),
                    event.text_id.clone(),
                    event.polarity.as_i64(),
                    event.timestamp.to_rfc3339(),
                    event.user_id.clone(),
                    event.context.clone(),
                ],
            )
            .await?;

        debug!("Stored feedback event: {}", event.id);
        Ok(event)
    }

    async fn list_all(&self) -> Result<Vec<FeedbackEvent>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, text_id, polarity, timestamp, user_id, context FROM feedback",
                params![],
            )
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(Self::row_to_event(&row)?);
        }
        Ok(events)
    }

    async fn count_by_polarity(&self) -> Result<FeedbackSummary> {
        let mut rows = self
            .conn
            .query(
                "SELECT polarity, COUNT(*) FROM feedback GROUP BY polarity",
                params![],
            )
            .await?;

        let mut summary = FeedbackSummary::default();
        while let Some(row) = rows.next().await? {
            let polarity_raw: i64 = row.get(0)?;
            let count: i64 = row.get(1)?;
            let polarity = Polarity::try_from(polarity_raw).map_err(|_| {
                FabulaError::Database(format!("Invalid polarity in store: {}", polarity_raw))
            })?;
            match polarity {
                Polarity::Up => summary.positive = count as u64,
                Polarity::Down => summary.negative = count as u64,
            }
        }
        Ok(summary)
    }
}
