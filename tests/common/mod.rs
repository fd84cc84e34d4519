//! Common test utilities and helpers

use async_trait::async_trait;
use fabula_core::{
    ConnectionMode, FabulaError, FeedbackEvent, FeedbackStore, FeedbackSubmission, FeedbackSummary,
    LibsqlFeedbackStore, Polarity,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a file-backed feedback store in a temp directory.
///
/// Returns the TempDir alongside the store so the database file outlives the
/// test body (the directory is removed when the guard drops).
pub async fn create_test_store() -> (Arc<LibsqlFeedbackStore>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("fabula_test.db");

    let store = LibsqlFeedbackStore::new(ConnectionMode::Local(
        db_path.to_string_lossy().to_string(),
    ))
    .await
    .expect("Failed to create test store");

    (Arc::new(store), dir)
}

/// Seed a store with one event per polarity in the slice
pub async fn seed_store(store: &dyn FeedbackStore, polarities: &[Polarity]) {
    for (i, polarity) in polarities.iter().enumerate() {
        store
            .insert(FeedbackSubmission {
                text_id: format!("story-{}", i),
                polarity: *polarity,
                user_id: None,
                context: None,
            })
            .await
            .expect("Failed to seed store");
    }
}

/// A store whose every operation fails, for exercising the server-error paths
pub struct FailingStore;

#[async_trait]
impl FeedbackStore for FailingStore {
    async fn insert(&self, _submission: FeedbackSubmission) -> fabula_core::Result<FeedbackEvent> {
        Err(FabulaError::Database("store unavailable".to_string()))
    }

    async fn list_all(&self) -> fabula_core::Result<Vec<FeedbackEvent>> {
        Err(FabulaError::Database("store unavailable".to_string()))
    }

    async fn count_by_polarity(&self) -> fabula_core::Result<FeedbackSummary> {
        Err(FabulaError::Database("store unavailable".to_string()))
    }
}
