//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod page_fetcher;
pub mod test_dependencies;
pub mod traits;
pub mod view_buffer;

/// Default chat model for ingestion
pub const GPT_4O_MINI: &str = "gpt-4o-mini";

pub use ai::OpenAIService;
pub use deps::ServerDeps;
pub use page_fetcher::HttpPageFetcher;
pub use test_dependencies::TestDependencies;
pub use traits::*;
pub use view_buffer::{
    FlushLoopHandle, FlushReport, PgViewCountSink, ViewCountBuffer, ViewCountSink, ViewTarget,
};
