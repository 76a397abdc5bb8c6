//! crates/tutor_core/src/domain.rs
//!
//! Defines the transient request and response records exchanged between the
//! action layer and the operation handlers. Nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Lowest school grade served by the tutor.
pub const GRADE_MIN: u8 = 1;
/// Highest school grade served by the tutor.
pub const GRADE_MAX: u8 = 10;

//=========================================================================================
// Languages
//=========================================================================================

/// The fixed allow-list of translation targets, identified by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Hindi,
    Telugu,
    Tamil,
    #[serde(rename = "Chinese (Simplified)")]
    ChineseSimplified,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Hindi,
        Language::Telugu,
        Language::Tamil,
        Language::ChineseSimplified,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Tamil => "Tamil",
            Language::ChineseSimplified => "Chinese (Simplified)",
        }
    }

    /// Looks a language up by the exact display name the UI shows.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|language| language.display_name() == name)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

//=========================================================================================
// Operation Inputs and Outputs
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaInput {
    pub question: String,
    pub grade: u8,
    pub emotional_tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QaOutput {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionInput {
    pub query: String,
    pub emotion: String,
    pub grade_level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmotionOutput {
    pub adapted_response: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeInput {
    pub textbook_content: String,
    pub grade_level: u8,
    pub student_query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummarizeOutput {
    pub summary: String,
    pub progress: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagineInput {
    pub textbook_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagineOutput {
    /// A `data:image/...;base64,...` URI.
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechToTextInput {
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SpeechToTextOutput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToSpeechInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TextToSpeechOutput {
    /// Always `data:audio/wav;base64,...`.
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateInput {
    pub text: String,
    pub target_language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateOutput {
    pub translated_text: String,
}

/// Aggregate feature usage for one named time bucket (a day label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UsageRecord {
    pub name: String,
    pub qa: u32,
    pub summarize: u32,
    pub imagine: u32,
    pub translate: u32,
}

impl UsageRecord {
    pub fn new(name: &str, qa: u32, summarize: u32, imagine: u32, translate: u32) -> Self {
        Self {
            name: name.to_string(),
            qa,
            summarize,
            imagine,
            translate,
        }
    }
}

//=========================================================================================
// Tagged Request / Result
//=========================================================================================

/// The kinds of operation the tutor performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Qa,
    AdaptToEmotion,
    Summarize,
    Imagine,
    SpeechToText,
    TextToSpeech,
    Translate,
    UsageHistory,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Qa => "qa",
            OperationKind::AdaptToEmotion => "adaptToEmotion",
            OperationKind::Summarize => "summarize",
            OperationKind::Imagine => "imagine",
            OperationKind::SpeechToText => "speechToText",
            OperationKind::TextToSpeech => "textToSpeech",
            OperationKind::Translate => "translate",
            OperationKind::UsageHistory => "usageHistory",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user action, tagged by operation kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Qa(QaInput),
    AdaptToEmotion(EmotionInput),
    Summarize(SummarizeInput),
    Imagine(ImagineInput),
    SpeechToText(SpeechToTextInput),
    TextToSpeech(TextToSpeechInput),
    Translate(TranslateInput),
    UsageHistory,
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRequest::Qa(_) => OperationKind::Qa,
            OperationRequest::AdaptToEmotion(_) => OperationKind::AdaptToEmotion,
            OperationRequest::Summarize(_) => OperationKind::Summarize,
            OperationRequest::Imagine(_) => OperationKind::Imagine,
            OperationRequest::SpeechToText(_) => OperationKind::SpeechToText,
            OperationRequest::TextToSpeech(_) => OperationKind::TextToSpeech,
            OperationRequest::Translate(_) => OperationKind::Translate,
            OperationRequest::UsageHistory => OperationKind::UsageHistory,
        }
    }
}

/// The artifact produced for an [`OperationRequest`], mirroring its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    Qa(QaOutput),
    AdaptToEmotion(EmotionOutput),
    Summarize(SummarizeOutput),
    Imagine(ImagineOutput),
    SpeechToText(SpeechToTextOutput),
    TextToSpeech(TextToSpeechOutput),
    Translate(TranslateOutput),
    UsageHistory(Vec<UsageRecord>),
}

impl OperationResult {
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationResult::Qa(_) => OperationKind::Qa,
            OperationResult::AdaptToEmotion(_) => OperationKind::AdaptToEmotion,
            OperationResult::Summarize(_) => OperationKind::Summarize,
            OperationResult::Imagine(_) => OperationKind::Imagine,
            OperationResult::SpeechToText(_) => OperationKind::SpeechToText,
            OperationResult::TextToSpeech(_) => OperationKind::TextToSpeech,
            OperationResult::Translate(_) => OperationKind::Translate,
            OperationResult::UsageHistory(_) => OperationKind::UsageHistory,
        }
    }
}
