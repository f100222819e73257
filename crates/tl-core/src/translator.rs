//! Classify-then-translate orchestration over a chat-completion provider.

use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tl_types::provider::Provider;
use tl_types::{
    ApiError, ChatCompletionRequest, ChatMessage, ClassifyError, StreamOptions, TextKind, TlError,
    Usage,
};
use tokio_util::sync::CancellationToken;

use crate::prompts;

/// Fixed sampling seed so repeated lookups of the same text read alike.
const SEED: i64 = 1;

/// Events emitted while a text is being translated.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateEvent {
    /// The classifier assigned a granularity to the text.
    Classified { kind: TextKind },
    /// A piece of translated output, in arrival order.
    TextDelta(String),
    /// Token usage reported by the API.
    Usage(Usage),
    /// The translation of one text is complete.
    Done,
}

/// Per-run translation settings.
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    pub model: String,
    pub temperature: f32,
    /// Classify each text first; otherwise use the generic prompt.
    pub classify: bool,
    /// Upper bound for classifying plus streaming one text.
    pub timeout: Duration,
}

/// Translates English text into formatted Chinese through a [`Provider`].
pub struct Translator {
    provider: Arc<dyn Provider>,
    options: TranslatorOptions,
}

impl Translator {
    pub fn new(provider: Arc<dyn Provider>, options: TranslatorOptions) -> Self {
        Self { provider, options }
    }

    /// Ask the model which granularity `text` has.
    ///
    /// Uses a non-streaming call at temperature 0 so the answer is a single
    /// stable token.
    pub async fn analyze_kind(&self, text: &str) -> Result<TextKind, ClassifyError> {
        self.classify(text).await.map(|(kind, _)| kind)
    }

    async fn classify(&self, text: &str) -> Result<(TextKind, Option<Usage>), ClassifyError> {
        let request = self.request(prompts::CLASSIFIER, text, 0.0);
        let response = self.provider.create_chat_completion(&request).await?;

        let reply = response
            .first_content()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ClassifyError::EmptyReply)?;

        let kind = reply.parse::<TextKind>();
        tracing::debug!(
            provider = self.provider.name(),
            reply,
            ?kind,
            "classified input"
        );
        Ok((kind?, response.usage.clone()))
    }

    /// Translate one text, reporting progress through `on_event`.
    ///
    /// Returns the token usage of the calls made for this text.
    pub async fn translate<F>(
        &self,
        text: &str,
        cancel: &CancellationToken,
        on_event: &mut F,
    ) -> Result<Usage, TlError>
    where
        F: FnMut(TranslateEvent),
    {
        let seconds = self.options.timeout.as_secs();
        let work = self.classify_and_stream(text, on_event);

        let usage = tokio::select! {
            _ = cancel.cancelled() => return Err(TlError::Cancelled),
            result = tokio::time::timeout(self.options.timeout, work) => {
                result.map_err(|_| TlError::Timeout { seconds })??
            }
        };

        on_event(TranslateEvent::Done);
        Ok(usage)
    }

    /// Translate each text in order, stopping at the first failure.
    pub async fn translate_all<S, F>(
        &self,
        texts: &[S],
        cancel: &CancellationToken,
        on_event: &mut F,
    ) -> Result<Usage, TlError>
    where
        S: AsRef<str>,
        F: FnMut(TranslateEvent),
    {
        let mut total = Usage::default();
        for text in texts {
            let usage = self.translate(text.as_ref(), cancel, on_event).await?;
            total.add(&usage);
        }
        Ok(total)
    }

    async fn classify_and_stream<F>(&self, text: &str, on_event: &mut F) -> Result<Usage, TlError>
    where
        F: FnMut(TranslateEvent),
    {
        if !self.options.classify {
            return self.stream(prompts::AUTO, "auto", text, on_event).await;
        }

        let (kind, classify_usage) = self.classify(text).await?;
        if let Some(u) = &classify_usage {
            on_event(TranslateEvent::Usage(u.clone()));
        }
        on_event(TranslateEvent::Classified { kind });
        let prompt = prompts::for_kind(kind).ok_or(TlError::UnsupportedKind(kind))?;

        let mut usage = self.stream(prompt, kind.label(), text, on_event).await?;
        if let Some(u) = &classify_usage {
            usage.add(u);
        }
        Ok(usage)
    }

    /// Stream a translation of `text` under `system_prompt`, forwarding every
    /// content delta.
    async fn stream<F>(
        &self,
        system_prompt: &str,
        label: &'static str,
        text: &str,
        on_event: &mut F,
    ) -> Result<Usage, TlError>
    where
        F: FnMut(TranslateEvent),
    {
        let wrap = |source: ApiError| TlError::Translate { label, source };

        let mut request = self.request(system_prompt, text, self.options.temperature);
        request.stream = true;
        request.stream_options = Some(StreamOptions {
            include_usage: true,
        });
        let mut stream = self
            .provider
            .create_chat_completion_stream(&request)
            .await
            .map_err(wrap)?;

        let mut usage = Usage::default();
        while let Some(item) = stream.next().await {
            let chunk = item.map_err(wrap)?;
            if let Some(u) = &chunk.usage {
                usage.add(u);
                on_event(TranslateEvent::Usage(u.clone()));
            }
            for choice in chunk.choices {
                if let Some(content) = choice.delta.content.filter(|c| !c.is_empty()) {
                    on_event(TranslateEvent::TextDelta(content));
                }
            }
        }

        Ok(usage)
    }

    fn request(&self, system_prompt: &str, text: &str, temperature: f32) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.options.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(text)],
            temperature: Some(temperature),
            seed: Some(SEED),
            max_tokens: None,
            stream: false,
            stream_options: None,
        }
    }
}
