//! Error hierarchy for tl.

use thiserror::Error;

use crate::TextKind;

/// Top-level error type for all tl operations.
#[derive(Debug, Error)]
pub enum TlError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("analyze text kind failed: {0}")]
    Classify(#[from] ClassifyError),

    #[error("unsupported text kind: {0}")]
    UnsupportedKind(TextKind),

    #[error("translate {label} failed: {source}")]
    Translate {
        label: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("translation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Errors from the chat-completion API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Server error: {status} {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Stream parse error: {0}")]
    StreamParse(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Request timeout")]
    Timeout,
}

/// Errors from the granularity classification call.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("classifier returned no answer")]
    EmptyReply,

    #[error("invalid text kind: {0}")]
    UnknownKind(String),
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file parse error at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Config file read error at {path}: {message}")]
    Read { path: String, message: String },

    #[error("Missing required configuration: {key}")]
    MissingKey { key: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
