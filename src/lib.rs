//! # CTF Rating
//!
//! CTFtime event rating calculator and team rating aggregation.
//!
//! ## Architecture
//!
//! - **models**: Event records and aggregation results
//! - **calculate**: Per-event rating formula and form validation
//! - **fetch**: HTTP page retrieval
//! - **scrape**: Leaderboard page parsers and source traits
//! - **aggregate**: Top-N selection with optional hosted-event substitution
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod scrape;

pub use models::*;
