//! crates/tutor_core/src/ports.rs
//!
//! Defines the service contracts (traits) the operation handlers depend on.
//! The hosted generative model and the usage ledger are external collaborators;
//! the core only sees these traits, and concrete adapters live in the service.

use crate::domain::UsageRecord;
use crate::prompt::Prompt;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

//=========================================================================================
// Provider Error and Result Types
//=========================================================================================

/// Failures of a generative model call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Could not reach the AI provider: {0}")]
    Transport(String),
    #[error("The AI provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("The AI provider returned no content.")]
    Empty,
    #[error("The response was blocked by content safety filters ({0}).")]
    Blocked(String),
    #[error("The AI provider returned {received} content, but {requested} was requested.")]
    UnsupportedModality { requested: String, received: String },
    #[error("No image was generated.")]
    NoImage,
    #[error("No media returned from TTS model.")]
    NoAudio,
    #[error("The AI provider returned an unusable result: {0}")]
    InvalidOutput(String),
}

/// A convenience type alias for `Result<T, ProviderError>`.
pub type ProviderResult<T> = Result<T, ProviderError>;

//=========================================================================================
// Model Configuration
//=========================================================================================

/// A category of content a model can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    Text,
    Image,
    Audio,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Text => write!(f, "TEXT"),
            Modality::Image => write!(f, "IMAGE"),
            Modality::Audio => write!(f, "AUDIO"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Speech synthesis settings for audio-producing models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    pub voice_name: String,
}

/// Model-specific configuration sent with a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelConfig {
    /// Empty means the provider default (text).
    pub response_modalities: Vec<Modality>,
    pub safety_settings: Vec<SafetySetting>,
    pub speech: Option<SpeechConfig>,
}

impl ModelConfig {
    /// The modalities a response may legitimately contain.
    pub fn allowed_modalities(&self) -> Vec<Modality> {
        if self.response_modalities.is_empty() {
            vec![Modality::Text]
        } else {
            self.response_modalities.clone()
        }
    }
}

//=========================================================================================
// Requests and Responses
//=========================================================================================

/// One inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Identifies the prompt template the prompt was rendered from, for logging.
    pub template_id: &'static str,
    pub model: &'static str,
    pub prompt: Prompt,
    pub config: ModelConfig,
    /// Declared output shape; when present the provider is asked for JSON
    /// matching it and the adapter fills [`GenerateResponse::output`].
    pub output_schema: Option<Value>,
}

/// Inline media returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// A `data:<mime>;base64,<payload>` URI.
    pub url: String,
    pub content_type: Option<String>,
}

/// Everything a single call produced. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub media: Option<Media>,
    pub output: Option<Value>,
}

impl GenerateResponse {
    /// Deserializes the structured output, falling back to parsing the text.
    pub fn parse_output<T: DeserializeOwned>(&self) -> ProviderResult<T> {
        let value = match (&self.output, &self.text) {
            (Some(output), _) => output.clone(),
            (None, Some(text)) => serde_json::from_str(strip_code_fence(text))
                .map_err(|e| ProviderError::InvalidOutput(e.to_string()))?,
            (None, None) => return Err(ProviderError::Empty),
        };
        serde_json::from_value(value).map_err(|e| ProviderError::InvalidOutput(e.to_string()))
    }
}

/// Models sometimes wrap JSON in a markdown code fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|inner| inner.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The hosted generative model: prompt in, structured output out.
/// Implementations make exactly one call per invocation, with no retry and no cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> ProviderResult<GenerateResponse>;
}

/// Source of aggregate usage statistics.
#[async_trait]
pub trait UsageHistoryService: Send + Sync {
    async fn usage_history(&self) -> Vec<UsageRecord>;
}
