//! crates/tutor_core/src/flows/qa.rs
//!
//! Question answering for Telangana state board textbooks.

use super::{ensure_non_empty, string_object_schema, TEXT_MODEL};
use crate::domain::{QaInput, QaOutput};
use crate::error::FlowResult;
use crate::ports::{
    GenerateRequest, GenerativeModel, HarmBlockThreshold, HarmCategory, ModelConfig,
    SafetySetting,
};
use crate::prompt::{Prompt, PromptBuilder};
use crate::validation::Validate;
use tracing::{debug, info};

pub const TEMPLATE_ID: &str = "answerQuestionsFromTextbook";

const INSTRUCTIONS: &str = "You are a helpful AI assistant that answers questions from Telangana state board textbooks for students in grades 1-10.
Tailor every answer to the student's grade level and emotional tone. Use simple Telugu words.
The response must be in Telugu.
";

pub(crate) fn render_prompt(input: &QaInput) -> Prompt {
    PromptBuilder::new(INSTRUCTIONS)
        .var("question", &input.question)
        .var("grade", input.grade)
        .section("Question: {question}")
        .section("Grade: {grade}")
        .section_if(
            "emotionalTone",
            input.emotional_tone.as_deref(),
            "Emotional Tone: {emotionalTone}",
        )
        .section("\nAnswer:")
        .build()
}

/// The content-safety policy applied to student questions.
pub fn safety_settings() -> Vec<SafetySetting> {
    vec![
        SafetySetting {
            category: HarmCategory::HateSpeech,
            threshold: HarmBlockThreshold::BlockOnlyHigh,
        },
        SafetySetting {
            category: HarmCategory::DangerousContent,
            threshold: HarmBlockThreshold::BlockNone,
        },
        SafetySetting {
            category: HarmCategory::Harassment,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        },
        SafetySetting {
            category: HarmCategory::SexuallyExplicit,
            threshold: HarmBlockThreshold::BlockLowAndAbove,
        },
    ]
}

/// Answers a student's question in Telugu, adapted to grade and tone.
pub async fn answer_question(model: &dyn GenerativeModel, input: QaInput) -> FlowResult<QaOutput> {
    input.validate()?;
    info!(
        grade = input.grade,
        has_tone = input.emotional_tone.is_some(),
        "Answering question."
    );

    let request = GenerateRequest {
        template_id: TEMPLATE_ID,
        model: TEXT_MODEL,
        prompt: render_prompt(&input),
        config: ModelConfig {
            safety_settings: safety_settings(),
            ..Default::default()
        },
        output_schema: Some(string_object_schema(&[(
            "answer",
            "The answer to the question.",
        )])),
    };

    let response = model.generate(request).await?;
    debug!("Question answered by provider.");
    let output: QaOutput = response.parse_output()?;
    ensure_non_empty("answer", &output.answer)?;
    Ok(output)
}
