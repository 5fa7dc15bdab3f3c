// AI implementation using OpenAI
//
// This is the infrastructure implementation of BaseAI.
// Business logic (what to prompt for) lives in domain layers.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};

use super::{AiError, BaseAI};

/// Upper bound on generated tokens; a normalized article fits well inside it.
const MAX_COMPLETION_TOKENS: u32 = 4096;

/// OpenAI implementation of AI capabilities
#[derive(Clone)]
pub struct OpenAIService {
    client: OpenAIClient,
    model: String,
}

impl OpenAIService {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn run(&self, request: ChatRequest) -> Result<String, AiError> {
        tracing::info!(model = %self.model, "Calling OpenAI API");

        let response = self.client.chat_completion(request).await.map_err(|e| {
            tracing::error!(error = %e, model = %self.model, "OpenAI API call failed");
            AiError::from(e)
        })?;

        tracing::info!(
            response_length = response.content.len(),
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            model = %self.model,
            "OpenAI API response received"
        );

        Ok(response.content)
    }

    fn base_request(&self, system_prompt: &str) -> ChatRequest {
        ChatRequest::new(self.model.clone())
            .message(Message::system(system_prompt))
            .token_limit(MAX_COMPLETION_TOKENS)
            .json_mode()
    }
}

#[async_trait]
impl BaseAI for OpenAIService {
    async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AiError> {
        tracing::debug!(
            prompt_length = user_prompt.len(),
            model = %self.model,
            "Building OpenAI JSON completion"
        );

        let request = self
            .base_request(system_prompt)
            .message(Message::user(user_prompt));
        self.run(request).await
    }

    async fn complete_json_with_image(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        image_data_url: &str,
    ) -> Result<String, AiError> {
        tracing::debug!(
            image_payload_length = image_data_url.len(),
            model = %self.model,
            "Building OpenAI vision completion"
        );

        let request = self
            .base_request(system_prompt)
            .message(Message::user_with_image(user_prompt, image_data_url));
        self.run(request).await
    }
}
