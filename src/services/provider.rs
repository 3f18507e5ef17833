use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{ProviderBackend, ProviderSettings};
use crate::services::gemini::{GeminiBackend, DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};
use crate::services::openai::{OpenAiBackend, DEFAULT_OPENAI_ENDPOINT, DEFAULT_OPENAI_MODEL};

/// Errors that can occur when asking a backend for a score
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider unavailable: no credential configured for {backend}")]
    Unavailable { backend: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unparseable score response: {0}")]
    Parse(String),

    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// Sampling parameters sent with every scoring prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 10,
        }
    }
}

/// A text-generation backend: accepts a prompt, returns text
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}

/// Build the evaluation prompt for a requirement/specification pair
pub fn build_prompt(requirement_text: &str, specification_text: &str) -> String {
    format!(
        "You are an expert technical evaluator. Analyze the match between an RFP requirement and a product specification.

RFP Requirement:
{requirement_text}

Product Specification:
{specification_text}

Evaluate how well the product specification matches the RFP requirement. Consider:
- Technical compatibility
- Feature alignment
- Performance requirements
- Compliance and standards
- Overall fit

Respond with ONLY a single number between 0 and 100 representing the match percentage. Do not include any explanation, just the number."
    )
}

/// Parse the leading number of a backend response
///
/// Accepts an optional sign, digits and an optional fraction; anything after
/// the number (a `%`, a newline, stray words) is ignored.
pub fn parse_score(text: &str) -> Result<f64, ProviderError> {
    let trimmed = text.trim();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        if fraction_end > fraction_start {
            has_digits = true;
            end = fraction_end;
        }
    }

    if !has_digits {
        return Err(ProviderError::Parse(truncate(trimmed)));
    }

    let value: f64 = trimmed[..end]
        .parse()
        .map_err(|_| ProviderError::Parse(truncate(trimmed)))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProviderError::Parse(truncate(trimmed)))
    }
}

fn truncate(text: &str) -> String {
    const MAX: usize = 64;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head)
    }
}

/// Construct the configured backend, or `None` when no credential is present
pub fn build_backend(settings: &ProviderSettings, timeout: Duration) -> Option<Arc<dyn TextBackend>> {
    let api_key = settings.credential()?.to_string();

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new());

    let backend: Arc<dyn TextBackend> = match settings.backend {
        ProviderBackend::Gemini => Arc::new(GeminiBackend::new(
            client,
            settings
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string()),
            api_key,
            settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        )),
        ProviderBackend::OpenAi => Arc::new(OpenAiBackend::new(
            client,
            settings
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_ENDPOINT.to_string()),
            api_key,
            settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        )),
    };

    Some(backend)
}

/// Scores a requirement/specification pair through a text backend
///
/// A provider without a backend reports `ProviderError::Unavailable` on every
/// call so the caller can fall back without treating it as a hard failure.
#[derive(Clone)]
pub struct ScoreProvider {
    backend: Option<Arc<dyn TextBackend>>,
    params: GenerationParams,
    label: String,
}

impl ScoreProvider {
    pub fn new(backend: Arc<dyn TextBackend>, params: GenerationParams) -> Self {
        let label = backend.name().to_string();
        Self {
            backend: Some(backend),
            params,
            label,
        }
    }

    /// Build the provider selected by configuration
    ///
    /// Without a credential the provider is constructed as unavailable; that
    /// is not an error, scoring just falls back.
    pub fn from_settings(settings: &ProviderSettings, timeout: Duration) -> Self {
        let params = GenerationParams {
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        };

        match build_backend(settings, timeout) {
            Some(backend) => Self::new(backend, params),
            None => {
                tracing::warn!(
                    "{} not set, {} provider unavailable; scores will use fallbacks",
                    settings.backend.env_key(),
                    settings.backend.name()
                );
                Self::unavailable(settings.backend.name())
            }
        }
    }

    /// Provider for a backend that has no credential configured
    pub fn unavailable(backend: impl Into<String>) -> Self {
        Self {
            backend: None,
            params: GenerationParams::default(),
            label: backend.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> &str {
        &self.label
    }

    /// Ask the backend for a raw (unclamped) match percentage
    pub async fn score(
        &self,
        requirement_text: &str,
        specification_text: &str,
    ) -> Result<f64, ProviderError> {
        let backend = self.backend.as_ref().ok_or_else(|| ProviderError::Unavailable {
            backend: self.label.clone(),
        })?;

        let prompt = build_prompt(requirement_text, specification_text);
        tracing::debug!("Requesting spec match score from {}", self.label);

        let text = backend.generate(&prompt, &self.params).await?;
        parse_score(&text)
    }
}

impl std::fmt::Debug for ScoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreProvider")
            .field("backend", &self.label)
            .field("available", &self.is_available())
            .field("params", &self.params)
            .finish()
    }
}
