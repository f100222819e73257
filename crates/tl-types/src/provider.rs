//! Provider trait for chat-completion backends.

use crate::{ApiError, ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};
use futures_core::Stream;
use std::future::Future;
use std::pin::Pin;

/// A boxed async stream of chunks from a streaming completion.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, ApiError>> + Send>>;

/// Trait for chat-completion providers.
///
/// Dyn-compatible so the translator works with `Arc<dyn Provider>`.
pub trait Provider: Send + Sync {
    /// Send a request and wait for the whole reply.
    fn create_chat_completion<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChatCompletionResponse, ApiError>> + Send + 'a>>;

    /// Send a streaming request, returning a stream of chunks.
    fn create_chat_completion_stream<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChunkStream, ApiError>> + Send + 'a>>;

    /// Provider name for logging/display (e.g., "openai").
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn provider_is_dyn_compatible() {
        fn _accept(_p: &dyn Provider) {}
    }

    #[test]
    fn arc_provider_is_send_sync() {
        fn _assert_send_sync<T: Send + Sync>() {}
        _assert_send_sync::<Arc<dyn Provider>>();
    }
}
