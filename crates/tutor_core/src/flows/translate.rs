//! crates/tutor_core/src/flows/translate.rs
//!
//! Free-text translation into one of the allowed target languages.

use super::{ensure_non_empty, string_object_schema, TEXT_MODEL};
use crate::domain::{TranslateInput, TranslateOutput};
use crate::error::FlowResult;
use crate::ports::{GenerateRequest, GenerativeModel, ModelConfig};
use crate::prompt::{Prompt, PromptBuilder};
use crate::validation::Validate;
use tracing::info;

pub const TEMPLATE_ID: &str = "translateText";

const INSTRUCTIONS: &str = "You are a careful translator helping school students.
Translate the text below into {targetLanguage}. Preserve its meaning, tone and formatting.
Respond only with the translation, without notes or explanations.
";

pub(crate) fn render_prompt(input: &TranslateInput) -> Prompt {
    PromptBuilder::new(INSTRUCTIONS)
        .var("targetLanguage", input.target_language)
        .var("text", &input.text)
        .section("Text:\n{text}")
        .build()
}

pub async fn translate_text(
    model: &dyn GenerativeModel,
    input: TranslateInput,
) -> FlowResult<TranslateOutput> {
    input.validate()?;
    info!(
        target = %input.target_language,
        text_chars = input.text.chars().count(),
        "Translating text."
    );

    let request = GenerateRequest {
        template_id: TEMPLATE_ID,
        model: TEXT_MODEL,
        prompt: render_prompt(&input),
        config: ModelConfig::default(),
        output_schema: Some(string_object_schema(&[(
            "translatedText",
            "The text translated into the target language.",
        )])),
    };

    let output: TranslateOutput = model.generate(request).await?.parse_output()?;
    ensure_non_empty("translatedText", &output.translated_text)?;
    Ok(output)
}
