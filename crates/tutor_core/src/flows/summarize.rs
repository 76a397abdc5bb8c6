//! crates/tutor_core/src/flows/summarize.rs
//!
//! Grade-appropriate Telugu summaries of textbook content.

use super::{ensure_non_empty, string_object_schema, TEXT_MODEL};
use crate::domain::{SummarizeInput, SummarizeOutput};
use crate::error::FlowResult;
use crate::ports::{GenerateRequest, GenerativeModel, ModelConfig};
use crate::prompt::{Prompt, PromptBuilder};
use crate::validation::Validate;
use serde::Deserialize;
use tracing::info;

pub const TEMPLATE_ID: &str = "summarizeTextbookContent";

/// Attached to every successful summary.
pub const PROGRESS_NOTE: &str =
    "పాఠ్యపుస్తకంలోని కంటెంట్ విద్యార్థికి అనువైన కీలక అంశాలలో సంగ్రహించబడింది.";

const INSTRUCTIONS: &str = "You are an expert summarizer for Telangana state board textbooks who writes simple Telugu summaries for students. Respond only in Telugu.

Provide a concise summary of the following textbook content for a student in grade {gradeLevel}. Use simple Telugu that the student can easily understand.
";

const CLOSING: &str = "
Focus on the core concepts. Keep the summary concise without losing key details, and format it so it is easy to read.";

#[derive(Deserialize)]
struct ModelSummary {
    summary: String,
}

pub(crate) fn render_prompt(input: &SummarizeInput) -> Prompt {
    PromptBuilder::new(INSTRUCTIONS)
        .var("gradeLevel", input.grade_level)
        .var("textbookContent", &input.textbook_content)
        .section("Textbook content:\n{textbookContent}")
        .section_if(
            "studentQuery",
            input.student_query.as_deref(),
            "\nThe student has this specific query: {studentQuery}",
        )
        .section(CLOSING)
        .build()
}

pub async fn summarize_content(
    model: &dyn GenerativeModel,
    input: SummarizeInput,
) -> FlowResult<SummarizeOutput> {
    input.validate()?;
    info!(
        grade = input.grade_level,
        content_chars = input.textbook_content.chars().count(),
        has_query = input.student_query.is_some(),
        "Summarizing textbook content."
    );

    let request = GenerateRequest {
        template_id: TEMPLATE_ID,
        model: TEXT_MODEL,
        prompt: render_prompt(&input),
        config: ModelConfig::default(),
        output_schema: Some(string_object_schema(&[(
            "summary",
            "The summarized content of the textbook.",
        )])),
    };

    let ModelSummary { summary } = model.generate(request).await?.parse_output()?;
    ensure_non_empty("summary", &summary)?;
    Ok(SummarizeOutput {
        summary,
        progress: PROGRESS_NOTE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{GenerateResponse, MockGenerativeModel};
    use serde_json::json;

    fn input(query: Option<&str>) -> SummarizeInput {
        SummarizeInput {
            textbook_content: "Plants make food using sunlight, water and carbon dioxide.".to_string(),
            grade_level: 6,
            student_query: query.map(str::to_string),
        }
    }

    #[test]
    fn test_prompt_binds_grade_in_instructions() {
        let text = render_prompt(&input(None)).text();
        assert!(text.contains("for a student in grade 6."));
        assert!(text.contains("Plants make food"));
        assert!(!text.contains("specific query"));

        let text = render_prompt(&input(Some("why sunlight?"))).text();
        assert!(text.contains("specific query: why sunlight?"));
    }

    #[tokio::test]
    async fn test_progress_note_always_attached() {
        let mut model = MockGenerativeModel::new();
        model.expect_generate().times(1).returning(|_| {
            Ok(GenerateResponse {
                // Any progress the model volunteers is replaced.
                output: Some(json!({ "summary": "మొక్కలు ఆహారం తయారు చేస్తాయి.", "progress": "done" })),
                ..Default::default()
            })
        });

        let output = summarize_content(&model, input(None)).await.unwrap();
        assert_eq!(output.summary, "మొక్కలు ఆహారం తయారు చేస్తాయి.");
        assert_eq!(output.progress, PROGRESS_NOTE);
        assert!(!output.progress.is_empty());
    }
}
