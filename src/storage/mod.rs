//! Storage layer for the Fabula feedback pipeline
//!
//! Provides the append-only feedback record store abstraction and its
//! libSQL implementation. The store exclusively owns persisted records;
//! no update or delete operations are exposed.

pub mod libsql;

use crate::error::Result;
use crate::types::{FeedbackEvent, FeedbackSubmission, FeedbackSummary};
use async_trait::async_trait;

/// Feedback record store defining all required operations
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persist one feedback event. Assigns the record ID and timestamp;
    /// rejects a submission with an empty `text_id`.
    async fn insert(&self, submission: FeedbackSubmission) -> Result<FeedbackEvent>;

    /// All persisted records, in unspecified order
    async fn list_all(&self) -> Result<Vec<FeedbackEvent>>;

    /// Count of records grouped by polarity
    async fn count_by_polarity(&self) -> Result<FeedbackSummary>;
}
