//! Fabula - Story Generation Service with a Feedback Loop
//!
//! A thin text-generation service that wraps a third-party completion API
//! and collects reader feedback on what it generates:
//! - Feedback ingestion (validate-then-persist, append-only store)
//! - On-demand count-by-polarity aggregation
//! - A daily scheduled batch pass over all collected feedback
//! - Story generation as a stateless pass-through to the provider
//!
//! # Architecture
//!
//! The system is organized into several layers:
//! - **Types**: Core data structures (FeedbackEvent, Polarity, summaries)
//! - **Storage**: Append-only feedback record store (libSQL)
//! - **Services**: Ingestion, aggregation, story generation
//! - **Scheduler**: Cancellable daily processing pass
//! - **API**: HTTP boundary (axum)
//!
//! # Example
//!
//! ```ignore
//! use fabula_core::{
//!     services::{AggregationService, IngestionService},
//!     storage::libsql::LibsqlFeedbackStore,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(LibsqlFeedbackStore::from_path("fabula.db").await?);
//!     let ingestion = IngestionService::new(store.clone());
//!     let aggregation = AggregationService::new(store);
//!
//!     let summary = aggregation.summarize().await?;
//!     println!("{} thumbs up", summary.positive);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::FabulaConfig;
pub use error::{FabulaError, Result};
pub use scheduler::{BatchScheduler, CountingProcessor, FeedbackProcessor, PassReport};
pub use services::{AggregationService, FeedbackRequest, IngestionService, StoryService};
pub use storage::{
    libsql::{ConnectionMode, LibsqlFeedbackStore},
    FeedbackStore,
};
pub use types::{
    FeedbackEvent, FeedbackId, FeedbackSubmission, FeedbackSummary, Polarity, PolarityCount,
};
