//! crates/tutor_core/src/flows/speech_to_text.rs
//!
//! Transcription of recorded audio.

use super::{string_object_schema, TEXT_MODEL};
use crate::domain::{SpeechToTextInput, SpeechToTextOutput};
use crate::error::FlowResult;
use crate::media::DataUri;
use crate::ports::{GenerateRequest, GenerativeModel, ModelConfig};
use crate::prompt::{Prompt, PromptBuilder};
use crate::validation::Validate;
use tracing::info;

pub const TEMPLATE_ID: &str = "convertSpeechToText";

const INSTRUCTIONS: &str = "Convert the following audio to text:\n";

pub(crate) fn render_prompt(input: &SpeechToTextInput) -> Prompt {
    let content_type = DataUri::parse(&input.audio_data_uri).map(|uri| uri.mime_type);
    PromptBuilder::new(INSTRUCTIONS)
        .media(input.audio_data_uri.clone(), content_type)
        .build()
}

/// Transcribes an audio data URI. Silence transcribes to an empty string.
pub async fn speech_to_text(
    model: &dyn GenerativeModel,
    input: SpeechToTextInput,
) -> FlowResult<SpeechToTextOutput> {
    input.validate()?;
    info!(
        audio_bytes = input.audio_data_uri.len(),
        "Transcribing audio."
    );

    let request = GenerateRequest {
        template_id: TEMPLATE_ID,
        model: TEXT_MODEL,
        prompt: render_prompt(&input),
        config: ModelConfig::default(),
        output_schema: Some(string_object_schema(&[(
            "text",
            "The converted text from the audio.",
        )])),
    };

    Ok(model.generate(request).await?.parse_output()?)
}
