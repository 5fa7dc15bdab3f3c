//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain actions.
//! All external services use trait abstractions to enable testing.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::directory::{ExposureStore, RankingConfig};
use crate::kernel::{BaseAI, BasePageFetcher, ViewCountBuffer};

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to actions (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// JSON-mode LLM used by news ingestion
    pub ai: Arc<dyn BaseAI>,
    pub page_fetcher: Arc<dyn BasePageFetcher>,
    /// Where display bookkeeping for directory cards is written
    pub exposure_store: Arc<dyn ExposureStore>,
    /// Shared with the flush loop started in `main`
    pub view_buffer: ViewCountBuffer,
    pub ranking: RankingConfig,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        ai: Arc<dyn BaseAI>,
        page_fetcher: Arc<dyn BasePageFetcher>,
        exposure_store: Arc<dyn ExposureStore>,
        view_buffer: ViewCountBuffer,
        ranking: RankingConfig,
    ) -> Self {
        Self {
            db_pool,
            ai,
            page_fetcher,
            exposure_store,
            view_buffer,
            ranking,
        }
    }
}
