//! HTTP boundary for the Fabula service
//!
//! Exposes feedback ingestion, the feedback summary, story generation, and
//! a health check. All routes delegate entirely to the service layer.

pub mod auth;
pub mod server;

pub use auth::AuthUser;
pub use server::{ApiServer, ApiServerConfig};
