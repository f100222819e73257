//! Granularity classification and streaming translation for tl.

pub mod prompts;
mod translator;

pub use translator::{TranslateEvent, Translator, TranslatorOptions};
