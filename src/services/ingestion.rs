//! Feedback ingestion service
//!
//! The validate-then-persist path for a single feedback submission. The raw
//! integer feedback value is parsed into a typed `Polarity` here, at the
//! boundary; everything downstream works with the validated form.

use crate::error::{FabulaError, Result};
use crate::storage::FeedbackStore;
use crate::types::{FeedbackEvent, FeedbackSubmission, Polarity};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Raw feedback submission as received over the wire
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Identifier of the generated text being judged
    pub text_id: String,
    /// 1 for thumbs up, -1 for thumbs down; anything else is rejected
    pub feedback: i64,
    /// Optional context information
    #[serde(default)]
    pub context: Option<String>,
}

/// Validates and persists one feedback event per request
pub struct IngestionService {
    store: Arc<dyn FeedbackStore>,
}

impl IngestionService {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }

    /// Accept one feedback submission.
    ///
    /// `user_id` comes from the upstream auth collaborator and is absent when
    /// no authentication context exists. Fails with `InvalidFeedbackValue`
    /// (nothing persisted) when the feedback value is outside {1, -1}, and
    /// with a validation error when `text_id` is empty.
    pub async fn submit(
        &self,
        request: FeedbackRequest,
        user_id: Option<String>,
    ) -> Result<FeedbackEvent> {
        let polarity = match Polarity::try_from(request.feedback) {
            Ok(polarity) => polarity,
            Err(err) => {
                warn!("Invalid feedback value received: {}", request.feedback);
                return Err(err);
            }
        };

        if request.text_id.is_empty() {
            warn!("Feedback submission with empty textId rejected");
            return Err(FabulaError::Validation(
                "textId must not be empty".to_string(),
            ));
        }

        let submission = FeedbackSubmission {
            text_id: request.text_id,
            polarity,
            user_id,
            context: request.context,
        };

        // Store failures keep their class: validation stays a client error,
        // anything else is a persistence failure surfaced as a server error.
        let event = self.store.insert(submission).await?;

        info!(
            "Feedback submitted: UserID={}, TextID={}, Feedback={}",
            event.user_id.as_deref().unwrap_or("-"),
            event.text_id,
            event.polarity
        );
        Ok(event)
    }
}
