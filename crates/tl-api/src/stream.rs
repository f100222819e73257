//! Async stream that converts SSE events into typed chat-completion chunks.

use crate::sse::{SseEvent, SseParser};
use futures_core::Stream;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tl_types::{ApiError, ApiErrorResponse, ChatCompletionChunk};

/// Sentinel payload that terminates an OpenAI-style stream.
const DONE_SENTINEL: &str = "[DONE]";

pin_project! {
    /// An async stream of [`ChatCompletionChunk`]s from a streaming completion.
    pub struct ChatStream {
        #[pin]
        inner: Pin<Box<dyn Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send>>,
        parser: SseParser,
        pending: VecDeque<Result<ChatCompletionChunk, ApiError>>,
        done: bool,
    }
}

impl ChatStream {
    /// Create a new ChatStream from a reqwest byte stream.
    pub fn new(
        byte_stream: impl Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
    ) -> Self {
        Self {
            inner: Box::pin(byte_stream),
            parser: SseParser::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }
}

impl Stream for ChatStream {
    type Item = Result<ChatCompletionChunk, ApiError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(item) = this.pending.pop_front() {
                return Poll::Ready(Some(item));
            }
            if *this.done {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    for event in this.parser.feed(&bytes) {
                        if !enqueue(this.pending, &event) {
                            *this.done = true;
                            break;
                        }
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.done = true;
                    let err = if e.is_timeout() {
                        ApiError::Timeout
                    } else {
                        ApiError::Network(e.to_string())
                    };
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    if let Some(event) = this.parser.finish() {
                        enqueue(this.pending, &event);
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Parse an SSE event and queue the result. Returns `false` once the
/// `[DONE]` sentinel has been seen.
fn enqueue(
    pending: &mut VecDeque<Result<ChatCompletionChunk, ApiError>>,
    event: &SseEvent,
) -> bool {
    match parse_chunk(event) {
        Ok(Some(chunk)) => {
            pending.push_back(Ok(chunk));
            true
        }
        Ok(None) => false,
        Err(e) => {
            pending.push_back(Err(e));
            true
        }
    }
}

/// Parse an SSE event into a chunk; `Ok(None)` marks the end of the stream.
fn parse_chunk(event: &SseEvent) -> Result<Option<ChatCompletionChunk>, ApiError> {
    let data = event.data.trim();
    if data == DONE_SENTINEL {
        return Ok(None);
    }

    #[derive(serde::Deserialize)]
    struct ErrorEnvelope {
        error: ApiErrorResponse,
    }

    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(data) {
        return Err(ApiError::Stream(envelope.error.message));
    }
    if event.event_type.as_deref() == Some("error") {
        return Err(ApiError::Stream(data.to_string()));
    }

    serde_json::from_str(data)
        .map(Some)
        .map_err(|e| ApiError::StreamParse(format!("{e}: {data}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(data: &str) -> SseEvent {
        SseEvent {
            event_type: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn done_sentinel_ends_stream() {
        assert!(parse_chunk(&event("[DONE]")).unwrap().is_none());
    }

    #[test]
    fn content_delta_parsed() {
        let chunk = parse_chunk(&event(
            r#"{"choices":[{"index":0,"delta":{"content":"你好"}}]}"#,
        ))
        .unwrap()
        .unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("你好"));
    }

    #[test]
    fn error_payload_becomes_stream_error() {
        let err = parse_chunk(&event(
            r#"{"error":{"message":"context length exceeded","type":"invalid_request_error"}}"#,
        ))
        .unwrap_err();
        match err {
            ApiError::Stream(message) => assert_eq!(message, "context length exceeded"),
            other => panic!("Expected Stream, got {other:?}"),
        }
    }

    #[test]
    fn error_event_type_with_plain_text() {
        let err = parse_chunk(&SseEvent {
            event_type: Some("error".into()),
            data: "upstream went away".into(),
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::Stream(ref m) if m == "upstream went away"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = parse_chunk(&event("{not json")).unwrap_err();
        assert!(matches!(err, ApiError::StreamParse(_)));
    }
}
