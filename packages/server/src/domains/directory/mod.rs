//! Business directory: cards, fair ranking, exposure bookkeeping.

pub mod actions;
pub mod exposure;
pub mod models;
pub mod ranking;

pub use exposure::{record_exposures, ExposureReport, ExposureStore, PgExposureStore};
pub use models::{
    DirectoryEntry, EntryTier, NewDirectoryEntry, MAX_EXPOSURE_WEIGHT, MIN_EXPOSURE_WEIGHT,
};
pub use ranking::{fairness_score, rank_entries, Rankable, RankingConfig};
