// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for and how to read the answer lives in the domain layers.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BasePageFetcher)

use async_trait::async_trait;
use thiserror::Error;

// =============================================================================
// AI Trait (Infrastructure - text understanding capability)
// =============================================================================

/// Failure of the text-generation service itself.
///
/// A response that arrives but is not the requested JSON is NOT an `AiError`;
/// callers handle that case themselves.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider error: {0}")]
    Provider(#[from] openai_client::OpenAIError),

    #[error("AI service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Run a system + user prompt asking for a JSON object. Returns the raw
    /// text of the reply, which may or may not parse.
    async fn complete_json(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, AiError>;

    /// Same as `complete_json` with an image attached to the user turn.
    /// `image_data_url` is a `data:<mime>;base64,...` URL.
    async fn complete_json_with_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image_data_url: &str,
    ) -> Result<String, AiError>;
}

// =============================================================================
// Page Fetcher Trait (Infrastructure - HTTP GET)
// =============================================================================

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
}

/// Raw HTML returned by a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    pub html: String,
}

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// GET a document. Any non-2xx status is an error; no retries.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}
