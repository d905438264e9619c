//! Core data models.

mod record;
mod summary;

pub use record::*;
pub use summary::*;
