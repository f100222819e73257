//! OpenAI-compatible provider implementation.

use crate::client::ApiClient;
use crate::retry::RetryConfig;
use std::future::Future;
use std::pin::Pin;
use tl_types::provider::{ChunkStream, Provider};
use tl_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};

/// Provider backed by any endpoint speaking the OpenAI chat-completion
/// protocol. Retry logic stays in `ApiClient`.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: ApiClient,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(api_key, base_url)?,
        })
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.client = self.client.with_retry_config(config);
        self
    }
}

impl Provider for OpenAiProvider {
    fn create_chat_completion<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChatCompletionResponse, ApiError>> + Send + 'a>> {
        Box::pin(self.client.create_chat_completion(request))
    }

    fn create_chat_completion_stream<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChunkStream, ApiError>> + Send + 'a>> {
        Box::pin(async move {
            let stream = self.client.create_chat_completion_stream(request).await?;
            Ok(Box::pin(stream) as ChunkStream)
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
