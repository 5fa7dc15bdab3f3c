// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::{
    AiError, BaseAI, BasePageFetcher, FetchError, FetchedPage, ServerDeps, ViewCountBuffer,
    ViewCountSink, ViewTarget,
};
use crate::common::EntryId;
use crate::domains::directory::{ExposureStore, RankingConfig};

// =============================================================================
// Mock AI
// =============================================================================

/// Arguments captured from one AI call
#[derive(Debug, Clone)]
pub struct AiCall {
    pub system_prompt: String,
    pub user_prompt: String,
    pub image_data_url: Option<String>,
}

pub struct MockAI {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<AiCall>>>,
    fail: bool,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.responses.lock().unwrap().push(json);
        self
    }

    /// Every call fails with `AiError::Unavailable`
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all calls that were made
    pub fn calls(&self) -> Vec<AiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a user prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.user_prompt.contains(text))
    }

    fn respond(&self, call: AiCall) -> Result<String, AiError> {
        self.calls.lock().unwrap().push(call);

        if self.fail {
            return Err(AiError::Unavailable("mock failure".to_string()));
        }

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            // Not JSON: exercises the fallback path
            Ok("Mock AI response".to_string())
        }
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AiError> {
        self.respond(AiCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            image_data_url: None,
        })
    }

    async fn complete_json_with_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image_data_url: &str,
    ) -> Result<String, AiError> {
        self.respond(AiCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            image_data_url: Some(image_data_url.to_string()),
        })
    }
}

// =============================================================================
// Mock Page Fetcher
// =============================================================================

pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, String>>>,
    statuses: Arc<Mutex<HashMap<String, u16>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
            statuses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serve `html` for `url`
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Answer `url` with a non-2xx status
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.statuses.lock().unwrap().insert(url.to_string(), status);
        self
    }

    /// Get all URLs that were fetched
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(status) = self.statuses.lock().unwrap().get(url) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            });
        }

        match self.pages.lock().unwrap().get(url) {
            Some(html) => Ok(FetchedPage {
                url: url.to_string(),
                html: html.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

// =============================================================================
// Mock Exposure Store
// =============================================================================

pub struct MockExposureStore {
    calls: Arc<Mutex<Vec<(EntryId, DateTime<Utc>)>>>,
    failing: HashSet<EntryId>,
}

impl MockExposureStore {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: HashSet::new(),
        }
    }

    /// Writes for `id` fail
    pub fn failing_for(mut self, id: EntryId) -> Self {
        self.failing.insert(id);
        self
    }

    /// Every attempted write, in order
    pub fn calls(&self) -> Vec<(EntryId, DateTime<Utc>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids whose write succeeded, in order
    pub fn recorded_ids(&self) -> Vec<EntryId> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !self.failing.contains(id))
            .collect()
    }
}

impl Default for MockExposureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExposureStore for MockExposureStore {
    async fn record_exposure(&self, id: EntryId, at: DateTime<Utc>) -> Result<()> {
        self.calls.lock().unwrap().push((id, at));
        if self.failing.contains(&id) {
            return Err(anyhow!("mock exposure write failed for {id}"));
        }
        Ok(())
    }
}

// =============================================================================
// Recording View Sink
// =============================================================================

pub struct RecordingViewSink {
    totals: Arc<Mutex<HashMap<ViewTarget, i64>>>,
    call_count: Arc<Mutex<usize>>,
    failing: HashSet<ViewTarget>,
}

impl RecordingViewSink {
    pub fn new() -> Self {
        Self {
            totals: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            failing: HashSet::new(),
        }
    }

    /// Writes for `target` fail
    pub fn failing_for(mut self, target: ViewTarget) -> Self {
        self.failing.insert(target);
        self
    }

    /// Sum of increments successfully written for `target`
    pub fn total_for(&self, target: ViewTarget) -> i64 {
        self.totals
            .lock()
            .unwrap()
            .get(&target)
            .copied()
            .unwrap_or(0)
    }

    /// Number of `add_views` calls, failed ones included
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for RecordingViewSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ViewCountSink for RecordingViewSink {
    async fn add_views(&self, target: ViewTarget, count: i64) -> Result<()> {
        *self.call_count.lock().unwrap() += 1;
        if self.failing.contains(&target) {
            return Err(anyhow!("mock view write failed for {target:?}"));
        }
        *self.totals.lock().unwrap().entry(target).or_insert(0) += count;
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub page_fetcher: Arc<MockPageFetcher>,
    pub exposure_store: Arc<MockExposureStore>,
    pub view_buffer: ViewCountBuffer,
    pub ranking: RankingConfig,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            page_fetcher: Arc::new(MockPageFetcher::new()),
            exposure_store: Arc::new(MockExposureStore::new()),
            view_buffer: ViewCountBuffer::new(),
            ranking: RankingConfig::default(),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set a mock page fetcher
    pub fn mock_fetcher(mut self, fetcher: MockPageFetcher) -> Self {
        self.page_fetcher = Arc::new(fetcher);
        self
    }

    /// Set a mock exposure store
    pub fn mock_exposures(mut self, store: MockExposureStore) -> Self {
        self.exposure_store = Arc::new(store);
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_server_deps(self, db_pool: PgPool) -> ServerDeps {
        ServerDeps::new(
            db_pool,
            self.ai,
            self.page_fetcher,
            self.exposure_store,
            self.view_buffer,
            self.ranking,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
