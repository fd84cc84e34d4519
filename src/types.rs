//! Core data types for the Fabula feedback pipeline
//!
//! Defines the persisted feedback record, the validated submission that
//! crosses the service boundary, and the derived aggregation summary.

use crate::error::FabulaError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for feedback records
///
/// Wraps a UUID to provide type safety and prevent mixing feedback IDs
/// with other UUID-based identifiers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub Uuid);

impl FeedbackId {
    /// Create a new random feedback ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a feedback ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for FeedbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directional judgment on a feedback event: thumbs-up or thumbs-down.
///
/// Serialized as the integers `1` / `-1` on the wire and in storage. Any
/// other integer fails to parse; there is no coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Polarity {
    Up,
    Down,
}

impl Polarity {
    /// Integer wire representation
    pub fn as_i64(self) -> i64 {
        match self {
            Polarity::Up => 1,
            Polarity::Down => -1,
        }
    }
}

impl TryFrom<i64> for Polarity {
    type Error = FabulaError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Polarity::Up),
            -1 => Ok(Polarity::Down),
            other => Err(FabulaError::InvalidFeedbackValue(other)),
        }
    }
}

impl From<Polarity> for i64 {
    fn from(polarity: Polarity) -> Self {
        polarity.as_i64()
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Validated feedback submission, produced by the parse-or-reject step at
/// the ingestion boundary. Everything downstream works with this typed form;
/// a submission with an out-of-range polarity cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    /// Identifier of the generated text being judged (opaque, non-empty)
    pub text_id: String,
    /// Thumbs-up or thumbs-down
    pub polarity: Polarity,
    /// Opaque submitter ID from the auth collaborator, if any
    pub user_id: Option<String>,
    /// Optional free-text context
    pub context: Option<String>,
}

/// One persisted user judgment on one generated text.
///
/// Created exactly once at ingestion, never mutated, never deleted by any
/// component in scope. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEvent {
    pub id: FeedbackId,
    pub text_id: String,
    pub polarity: Polarity,
    /// Creation time, assigned at persistence
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Derived count-by-polarity summary, recomputed from scratch on every
/// aggregation call. Never persisted or cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub positive: u64,
    pub negative: u64,
}

impl FeedbackSummary {
    /// Total number of records covered by the summary
    pub fn total(&self) -> u64 {
        self.positive + self.negative
    }

    /// Add one record with the given polarity to the summary
    pub fn record(&mut self, polarity: Polarity) {
        match polarity {
            Polarity::Up => self.positive += 1,
            Polarity::Down => self.negative += 1,
        }
    }

    /// Wire form: one `{_id, count}` bucket per polarity that has at least
    /// one record, positive bucket first. Polarities with zero records are
    /// omitted, matching the group-by output the summary is computed from.
    pub fn buckets(&self) -> Vec<PolarityCount> {
        let mut buckets = Vec::with_capacity(2);
        if self.positive > 0 {
            buckets.push(PolarityCount {
                polarity: Polarity::Up,
                count: self.positive,
            });
        }
        if self.negative > 0 {
            buckets.push(PolarityCount {
                polarity: Polarity::Down,
                count: self.negative,
            });
        }
        buckets
    }
}

/// One bucket of the feedback summary as exposed over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolarityCount {
    #[serde(rename = "_id")]
    pub polarity: Polarity,
    pub count: u64,
}
