//! crates/tutor_core/src/flows/emotion.rs
//!
//! Responses adapted to the student's emotional state.

use super::{ensure_non_empty, string_object_schema, TEXT_MODEL};
use crate::domain::{EmotionInput, EmotionOutput};
use crate::error::FlowResult;
use crate::ports::{GenerateRequest, GenerativeModel, ModelConfig};
use crate::prompt::{Prompt, PromptBuilder};
use crate::validation::Validate;
use tracing::info;

pub const TEMPLATE_ID: &str = "adaptAiToUserEmotion";

const INSTRUCTIONS: &str = "You are an AI tutor helping students learn from Telangana state textbooks for grades 1-10.
Respond in a way that takes the student's emotional state into account, adapting your language so that it supports them.
The response must be in Telugu.
";

pub(crate) fn render_prompt(input: &EmotionInput) -> Prompt {
    PromptBuilder::new(INSTRUCTIONS)
        .var("gradeLevel", input.grade_level)
        .var("emotion", &input.emotion)
        .var("query", &input.query)
        .section("Grade Level: {gradeLevel}")
        .section("Student Emotion: {emotion}")
        .section("Student Query: {query}")
        .section("\nAdapted Response:")
        .build()
}

pub async fn adapt_to_emotion(
    model: &dyn GenerativeModel,
    input: EmotionInput,
) -> FlowResult<EmotionOutput> {
    input.validate()?;
    info!(grade = input.grade_level, emotion = %input.emotion, "Adapting response to emotion.");

    let request = GenerateRequest {
        template_id: TEMPLATE_ID,
        model: TEXT_MODEL,
        prompt: render_prompt(&input),
        config: ModelConfig::default(),
        output_schema: Some(string_object_schema(&[(
            "adaptedResponse",
            "The response adapted to the student's emotion and grade level.",
        )])),
    };

    let output: EmotionOutput = model.generate(request).await?.parse_output()?;
    ensure_non_empty("adaptedResponse", &output.adapted_response)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{GenerateResponse, MockGenerativeModel};
    use serde_json::json;

    #[tokio::test]
    async fn test_adapts_response() {
        let mut model = MockGenerativeModel::new();
        model
            .expect_generate()
            .withf(|request| {
                let text = request.prompt.text();
                request.template_id == TEMPLATE_ID
                    && text.contains("Grade Level: 4")
                    && text.contains("Student Emotion: sad")
                    && text.contains("Student Query: I failed my test")
            })
            .times(1)
            .returning(|_| {
                Ok(GenerateResponse {
                    output: Some(json!({ "adaptedResponse": "పర్వాలేదు, మళ్ళీ ప్రయత్నిద్దాం." })),
                    ..Default::default()
                })
            });

        let output = adapt_to_emotion(
            &model,
            EmotionInput {
                query: "I failed my test".to_string(),
                emotion: "sad".to_string(),
                grade_level: 4,
            },
        )
        .await
        .unwrap();
        assert_eq!(output.adapted_response, "పర్వాలేదు, మళ్ళీ ప్రయత్నిద్దాం.");
    }

    #[tokio::test]
    async fn test_empty_emotion_is_rejected() {
        let model = MockGenerativeModel::new();
        let err = adapt_to_emotion(
            &model,
            EmotionInput {
                query: "hi".to_string(),
                emotion: String::new(),
                grade_level: 4,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Emotion cannot be empty.");
    }
}
