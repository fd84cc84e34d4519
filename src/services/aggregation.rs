//! Feedback aggregation service
//!
//! Produces the count-by-polarity summary. Always a full-table aggregation;
//! no filtering, pagination, or time-windowing, and no caching.

use crate::error::{FabulaError, Result};
use crate::storage::FeedbackStore;
use crate::types::FeedbackSummary;
use std::sync::Arc;
use tracing::debug;

/// Computes the feedback summary on demand
pub struct AggregationService {
    store: Arc<dyn FeedbackStore>,
}

impl AggregationService {
    pub fn new(store: Arc<dyn FeedbackStore>) -> Self {
        Self { store }
    }

    /// Recompute the summary from scratch. Store unavailability surfaces as
    /// an aggregation error (a server error at the HTTP boundary).
    pub async fn summarize(&self) -> Result<FeedbackSummary> {
        let summary = self
            .store
            .count_by_polarity()
            .await
            .map_err(|e| FabulaError::Aggregation(e.to_string()))?;

        debug!(
            "Feedback summary: positive={}, negative={}",
            summary.positive, summary.negative
        );
        Ok(summary)
    }
}
