//! OpenAI-compatible chat-completion client with SSE streaming for tl.

mod client;
mod provider;
mod retry;
mod sse;
mod stream;

pub use client::ApiClient;
pub use provider::OpenAiProvider;
pub use retry::RetryConfig;
pub use stream::ChatStream;
