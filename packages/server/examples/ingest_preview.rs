//! Run the ingestion pipeline against a live page and print the record an
//! editor would review. Nothing is stored.
//!
//! ```text
//! OPENAI_API_KEY=... cargo run -p portal-server --example ingest_preview -- https://www.bangkokpost.com/...
//! ```

use anyhow::{Context, Result};
use openai_client::OpenAIClient;
use portal_core::domains::news::ingestion::ingest;
use portal_core::domains::news::IngestSource;
use portal_core::kernel::{HttpPageFetcher, OpenAIService, GPT_4O_MINI};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,portal_core=debug".into()),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .context("usage: ingest_preview <url>")?;

    let client = OpenAIClient::from_env().context("OPENAI_API_KEY must be set")?;
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| GPT_4O_MINI.to_string());
    let ai = OpenAIService::new(client, model);
    let fetcher = HttpPageFetcher::new()?;

    let outcome = ingest(IngestSource::Url(url), &fetcher, &ai).await?;

    if outcome.used_fallback {
        println!("(model output unusable, showing fallback record)");
    }
    println!("{}", serde_json::to_string_pretty(&outcome.record)?);
    if let Some(image) = outcome.image_url {
        println!("image: {image}");
    }
    Ok(())
}
