//! Shared types and error hierarchy for tl.

pub mod error;
pub mod kind;
pub mod message;
pub mod provider;

pub use error::{ApiError, ClassifyError, ConfigError, TlError};
pub use kind::TextKind;
pub use message::*;
