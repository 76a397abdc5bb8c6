//! crates/tutor_core/src/flows/imagine.rs
//!
//! Illustrations generated from textbook descriptions.

use super::IMAGE_MODEL;
use crate::domain::{ImagineInput, ImagineOutput};
use crate::error::FlowResult;
use crate::ports::{GenerateRequest, GenerativeModel, Modality, ModelConfig, ProviderError};
use crate::prompt::{Prompt, PromptBuilder};
use crate::validation::Validate;
use tracing::info;

pub const TEMPLATE_ID: &str = "generateImageFromTextbook";

const INSTRUCTIONS: &str = "You are an AI that generates images based on textbook descriptions.

Generate an image based on the following description:";

pub(crate) fn render_prompt(input: &ImagineInput) -> Prompt {
    PromptBuilder::new(INSTRUCTIONS)
        .var("textbookDescription", &input.textbook_description)
        .section("{textbookDescription}")
        .build()
}

pub async fn generate_image(
    model: &dyn GenerativeModel,
    input: ImagineInput,
) -> FlowResult<ImagineOutput> {
    input.validate()?;
    info!(
        description_chars = input.textbook_description.chars().count(),
        "Generating image."
    );

    let request = GenerateRequest {
        template_id: TEMPLATE_ID,
        model: IMAGE_MODEL,
        prompt: render_prompt(&input),
        config: ModelConfig {
            // The image model refuses IMAGE on its own.
            response_modalities: vec![Modality::Text, Modality::Image],
            ..Default::default()
        },
        output_schema: None,
    };

    let response = model.generate(request).await?;
    let image_url = response
        .media
        .map(|media| media.url)
        .filter(|url| !url.is_empty())
        .ok_or(ProviderError::NoImage)?;

    Ok(ImagineOutput { image_url })
}
