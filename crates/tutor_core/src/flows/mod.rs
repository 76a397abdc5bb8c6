//! crates/tutor_core/src/flows/mod.rs
//!
//! Operation handlers. Each one validates its input, renders its single prompt
//! template, makes one call to the [`GenerativeModel`], and verifies the shape of
//! what came back. Any failure ends the handler and propagates unchanged.

pub mod emotion;
pub mod imagine;
pub mod qa;
pub mod speech_to_text;
pub mod summarize;
pub mod text_to_speech;
pub mod translate;
pub mod usage_history;

use crate::domain::{OperationRequest, OperationResult};
use crate::error::FlowResult;
use crate::ports::{GenerativeModel, ProviderError, ProviderResult, UsageHistoryService};
use serde_json::{json, Map, Value};
use tracing::info;

/// Model used for all text and transcription work.
pub const TEXT_MODEL: &str = "gemini-2.0-flash";
/// The only model able to produce images; it must be asked for TEXT and IMAGE together.
pub const IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
/// Speech synthesis model.
pub const SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
/// Prebuilt voice used for every synthesis request.
pub const SPEECH_VOICE: &str = "Algenib";

/// Runs whichever handler matches the request kind.
pub async fn run(
    model: &dyn GenerativeModel,
    usage: &dyn UsageHistoryService,
    request: OperationRequest,
) -> FlowResult<OperationResult> {
    info!(operation = %request.kind(), "Running operation.");
    match request {
        OperationRequest::Qa(input) => qa::answer_question(model, input)
            .await
            .map(OperationResult::Qa),
        OperationRequest::AdaptToEmotion(input) => emotion::adapt_to_emotion(model, input)
            .await
            .map(OperationResult::AdaptToEmotion),
        OperationRequest::Summarize(input) => summarize::summarize_content(model, input)
            .await
            .map(OperationResult::Summarize),
        OperationRequest::Imagine(input) => imagine::generate_image(model, input)
            .await
            .map(OperationResult::Imagine),
        OperationRequest::SpeechToText(input) => speech_to_text::speech_to_text(model, input)
            .await
            .map(OperationResult::SpeechToText),
        OperationRequest::TextToSpeech(input) => text_to_speech::text_to_speech(model, input)
            .await
            .map(OperationResult::TextToSpeech),
        OperationRequest::Translate(input) => translate::translate_text(model, input)
            .await
            .map(OperationResult::Translate),
        OperationRequest::UsageHistory => Ok(OperationResult::UsageHistory(
            usage_history::usage_history(usage).await,
        )),
    }
}

/// An object schema whose properties are all required strings.
pub(crate) fn string_object_schema(fields: &[(&str, &str)]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "STRING", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

/// Rejects a declared output field that came back blank.
pub(crate) fn ensure_non_empty(field: &str, value: &str) -> ProviderResult<()> {
    if value.trim().is_empty() {
        return Err(ProviderError::InvalidOutput(format!("'{}' is empty", field)));
    }
    Ok(())
}
