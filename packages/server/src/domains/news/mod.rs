//! News: ingestion into reviewable records, and the published archive.

pub mod actions;
pub mod ingestion;
pub mod models;

pub use ingestion::{IngestError, IngestOutcome, IngestSource, NormalizedRecord};
pub use models::{NewsCategory, NewsDocument};
