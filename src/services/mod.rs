//! Service layer for Fabula
//!
//! Thin services over the feedback store plus the completion-provider
//! pass-through for story generation.

pub mod aggregation;
pub mod ingestion;
pub mod story;

pub use aggregation::AggregationService;
pub use ingestion::{FeedbackRequest, IngestionService};
pub use story::StoryService;
