//! services/api/src/actions.rs
//!
//! The Action Layer: the only boundary the UI calls. Every action re-validates its
//! raw payload, runs the matching operation handler, and returns the handler's
//! result unchanged. Failures are collapsed into a single [`ActionError`] that
//! carries the underlying message as-is.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use tutor_core::flows;
use tutor_core::validation::{
    self, check_data_uri, check_grade, normalize_optional, require, ValidationResult,
};
use tutor_core::{
    EmotionInput, EmotionOutput, FlowError, GenerativeModel, ImagineInput, ImagineOutput,
    Language, OperationRequest, OperationResult, QaInput, QaOutput, SpeechToTextInput,
    SpeechToTextOutput, SummarizeInput, SummarizeOutput, TextToSpeechInput, TextToSpeechOutput,
    TranslateInput, TranslateOutput, UsageHistoryService, UsageRecord, Validate,
    ValidationError,
};
use utoipa::ToSchema;

//=========================================================================================
// Action Error
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActionErrorKind {
    Validation,
    Provider,
    Codec,
    Internal,
}

/// The generic error every action fails with. `message` is the display text of
/// the underlying error, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    pub kind: ActionErrorKind,
    pub message: String,
}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        Self {
            kind: ActionErrorKind::Validation,
            message: err.to_string(),
        }
    }
}

/// A body that is not JSON, or not the payload's shape, is bad input too.
impl From<JsonRejection> for ActionError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        warn!(error = %message, "Rejected request body.");
        Self {
            kind: ActionErrorKind::Validation,
            message,
        }
    }
}

impl From<FlowError> for ActionError {
    fn from(err: FlowError) -> Self {
        let kind = match &err {
            FlowError::Validation(_) => ActionErrorKind::Validation,
            FlowError::Provider(_) => ActionErrorKind::Provider,
            FlowError::Codec(_) => ActionErrorKind::Codec,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// The JSON body returned for a failed action.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = match self.kind {
            ActionErrorKind::Validation => StatusCode::BAD_REQUEST,
            ActionErrorKind::Provider => StatusCode::BAD_GATEWAY,
            ActionErrorKind::Codec | ActionErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(ErrorResponse {
                message: self.message,
            }),
        )
            .into_response()
    }
}

pub type ActionResult<T> = Result<T, ActionError>;

/// Logs a failure once, at the boundary, and converts it.
fn failed(action: &'static str, err: FlowError) -> ActionError {
    match &err {
        FlowError::Validation(e) => warn!(action, field = e.field(), error = %e, "Rejected input."),
        FlowError::Provider(e) => error!(action, error = %e, "AI provider call failed."),
        FlowError::Codec(e) => error!(action, error = %e, "Audio encoding failed."),
    }
    err.into()
}

fn rejected(action: &'static str, err: ValidationError) -> ActionError {
    failed(action, err.into())
}

//=========================================================================================
// Action Payloads
//=========================================================================================
//
// Every field is optional on the wire so that a missing field is reported by the
// validator as `Missing { field }` instead of as a JSON rejection.

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    pub question: Option<String>,
    pub grade: Option<i64>,
    pub emotional_tone: Option<String>,
}

impl AnswerPayload {
    pub fn into_input(self) -> ValidationResult<QaInput> {
        let question = require("question", self.question)?;
        validation::QUESTION.check(&question)?;
        let grade = check_grade("grade", require("grade", self.grade)?)?;
        let input = QaInput {
            question,
            grade,
            emotional_tone: normalize_optional(self.emotional_tone),
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmotionPayload {
    pub query: Option<String>,
    pub emotion: Option<String>,
    pub grade_level: Option<i64>,
}

impl EmotionPayload {
    pub fn into_input(self) -> ValidationResult<EmotionInput> {
        let query = require("query", self.query)?;
        validation::QUERY.check(&query)?;
        let emotion = require("emotion", self.emotion)?;
        validation::EMOTION.check(&emotion)?;
        let grade_level = check_grade("gradeLevel", require("gradeLevel", self.grade_level)?)?;
        let input = EmotionInput {
            query,
            emotion,
            grade_level,
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizePayload {
    pub textbook_content: Option<String>,
    pub grade_level: Option<i64>,
    pub student_query: Option<String>,
}

impl SummarizePayload {
    pub fn into_input(self) -> ValidationResult<SummarizeInput> {
        let textbook_content = require("textbookContent", self.textbook_content)?;
        validation::TEXTBOOK_CONTENT.check(&textbook_content)?;
        let grade_level = check_grade("gradeLevel", require("gradeLevel", self.grade_level)?)?;
        let input = SummarizeInput {
            textbook_content,
            grade_level,
            student_query: normalize_optional(self.student_query),
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImaginePayload {
    pub textbook_description: Option<String>,
}

impl ImaginePayload {
    pub fn into_input(self) -> ValidationResult<ImagineInput> {
        let textbook_description = require("textbookDescription", self.textbook_description)?;
        validation::TEXTBOOK_DESCRIPTION.check(&textbook_description)?;
        let input = ImagineInput {
            textbook_description,
        };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpeechToTextPayload {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub audio_data_uri: Option<String>,
}

impl SpeechToTextPayload {
    pub fn into_input(self) -> ValidationResult<SpeechToTextInput> {
        let audio_data_uri = require("audioDataUri", self.audio_data_uri)?;
        check_data_uri("audioDataUri", &audio_data_uri)?;
        let input = SpeechToTextInput { audio_data_uri };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TextToSpeechPayload {
    pub text: Option<String>,
}

impl TextToSpeechPayload {
    pub fn into_input(self) -> ValidationResult<TextToSpeechInput> {
        let text = require("text", self.text)?;
        validation::SPEECH_TEXT.check(&text)?;
        let input = TextToSpeechInput { text };
        input.validate()?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslatePayload {
    pub text: Option<String>,
    /// One of the names listed by `GET /api/languages`.
    pub target_language: Option<String>,
}

impl TranslatePayload {
    pub fn into_input(self) -> ValidationResult<TranslateInput> {
        let text = require("text", self.text)?;
        validation::TRANSLATE_TEXT.check(&text)?;
        let name = require("targetLanguage", self.target_language)?;
        let target_language =
            Language::from_display_name(&name).ok_or_else(|| ValidationError::Invalid {
                field: "targetLanguage",
                reason: format!("'{}' is not a supported language", name),
            })?;
        let input = TranslateInput {
            text,
            target_language,
        };
        input.validate()?;
        Ok(input)
    }
}

//=========================================================================================
// Actions
//=========================================================================================

/// One async method per operation. Stateless apart from its two collaborators.
#[derive(Clone)]
pub struct Actions {
    model: Arc<dyn GenerativeModel>,
    usage: Arc<dyn UsageHistoryService>,
}

impl Actions {
    pub fn new(model: Arc<dyn GenerativeModel>, usage: Arc<dyn UsageHistoryService>) -> Self {
        Self { model, usage }
    }

    /// Runs one validated request through the core dispatcher and unpacks the
    /// result variant the caller expects.
    async fn perform<T>(
        &self,
        action: &'static str,
        request: OperationRequest,
        unpack: fn(OperationResult) -> Option<T>,
    ) -> ActionResult<T> {
        let kind = request.kind();
        let result = flows::run(self.model.as_ref(), self.usage.as_ref(), request)
            .await
            .map_err(|e| failed(action, e))?;
        let returned = result.kind();
        unpack(result).ok_or_else(|| {
            error!(action, requested = %kind, %returned, "Handler returned the wrong result kind.");
            ActionError {
                kind: ActionErrorKind::Internal,
                message: format!("The {} operation returned a {} result.", kind, returned),
            }
        })
    }

    pub async fn get_answer(&self, payload: AnswerPayload) -> ActionResult<QaOutput> {
        let input = payload
            .into_input()
            .map_err(|e| rejected("getAnswer", e))?;
        self.perform("getAnswer", OperationRequest::Qa(input), |result| match result {
            OperationResult::Qa(output) => Some(output),
            _ => None,
        })
        .await
    }

    pub async fn adapt_to_emotion(&self, payload: EmotionPayload) -> ActionResult<EmotionOutput> {
        let input = payload
            .into_input()
            .map_err(|e| rejected("adaptToEmotion", e))?;
        self.perform(
            "adaptToEmotion",
            OperationRequest::AdaptToEmotion(input),
            |result| match result {
                OperationResult::AdaptToEmotion(output) => Some(output),
                _ => None,
            },
        )
        .await
    }

    pub async fn summarize_content(
        &self,
        payload: SummarizePayload,
    ) -> ActionResult<SummarizeOutput> {
        let input = payload
            .into_input()
            .map_err(|e| rejected("summarizeContent", e))?;
        self.perform(
            "summarizeContent",
            OperationRequest::Summarize(input),
            |result| match result {
                OperationResult::Summarize(output) => Some(output),
                _ => None,
            },
        )
        .await
    }

    pub async fn generate_image(&self, payload: ImaginePayload) -> ActionResult<ImagineOutput> {
        let input = payload
            .into_input()
            .map_err(|e| rejected("generateImage", e))?;
        self.perform("generateImage", OperationRequest::Imagine(input), |result| {
            match result {
                OperationResult::Imagine(output) => Some(output),
                _ => None,
            }
        })
        .await
    }

    pub async fn speech_to_text(
        &self,
        payload: SpeechToTextPayload,
    ) -> ActionResult<SpeechToTextOutput> {
        let input = payload
            .into_input()
            .map_err(|e| rejected("speechToText", e))?;
        self.perform(
            "speechToText",
            OperationRequest::SpeechToText(input),
            |result| match result {
                OperationResult::SpeechToText(output) => Some(output),
                _ => None,
            },
        )
        .await
    }

    pub async fn text_to_speech(
        &self,
        payload: TextToSpeechPayload,
    ) -> ActionResult<TextToSpeechOutput> {
        let input = payload
            .into_input()
            .map_err(|e| rejected("textToSpeech", e))?;
        self.perform(
            "textToSpeech",
            OperationRequest::TextToSpeech(input),
            |result| match result {
                OperationResult::TextToSpeech(output) => Some(output),
                _ => None,
            },
        )
        .await
    }

    pub async fn translate_text(&self, payload: TranslatePayload) -> ActionResult<TranslateOutput> {
        let input = payload
            .into_input()
            .map_err(|e| rejected("translateText", e))?;
        self.perform(
            "translateText",
            OperationRequest::Translate(input),
            |result| match result {
                OperationResult::Translate(output) => Some(output),
                _ => None,
            },
        )
        .await
    }

    pub async fn get_usage_history(&self) -> ActionResult<Vec<UsageRecord>> {
        self.perform(
            "getUsageHistory",
            OperationRequest::UsageHistory,
            |result| match result {
                OperationResult::UsageHistory(records) => Some(records),
                _ => None,
            },
        )
        .await
    }

    /// The translation targets, in display order.
    pub fn languages(&self) -> Vec<&'static str> {
        Language::ALL.iter().map(Language::display_name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tutor_core::flows::usage_history::StaticUsageHistory;
    use tutor_core::flows::{qa, summarize};
    use tutor_core::ports::{GenerateRequest, GenerateResponse, Media, ProviderError, ProviderResult};

    type Reply = fn(&GenerateRequest) -> ProviderResult<GenerateResponse>;

    /// A deterministic model that counts its calls.
    struct StubModel {
        reply: Reply,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeModel for StubModel {
        async fn generate(&self, request: GenerateRequest) -> ProviderResult<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)(&request)
        }
    }

    fn actions_with(reply: Reply) -> (Actions, Arc<StubModel>) {
        let model = Arc::new(StubModel {
            reply,
            calls: AtomicUsize::new(0),
        });
        let actions = Actions::new(model.clone(), Arc::new(StaticUsageHistory));
        (actions, model)
    }

    fn structured(output: serde_json::Value) -> ProviderResult<GenerateResponse> {
        Ok(GenerateResponse {
            output: Some(output),
            ..Default::default()
        })
    }

    fn answer_payload(question: &str, grade: i64) -> AnswerPayload {
        AnswerPayload {
            question: Some(question.to_string()),
            grade: Some(grade),
            emotional_tone: None,
        }
    }

    #[tokio::test]
    async fn test_get_answer_returns_flow_result_unchanged() {
        let (actions, model) = actions_with(|request| {
            assert_eq!(request.template_id, qa::TEMPLATE_ID);
            structured(json!({ "answer": "కిరణజన్య సంయోగక్రియ" }))
        });
        let output = actions
            .get_answer(answer_payload("What is photosynthesis?", 6))
            .await
            .unwrap();
        assert_eq!(output.answer, "కిరణజన్య సంయోగక్రియ");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_grade_out_of_range_never_reaches_the_model() {
        let (actions, model) = actions_with(|_| panic!("model must not be called"));
        for grade in [0, 11] {
            let err = actions
                .get_answer(answer_payload("Why is the sky blue?", grade))
                .await
                .unwrap_err();
            assert_eq!(err.kind, ActionErrorKind::Validation);
            assert!(err.message.contains("grade"));
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported_by_name() {
        let (actions, _) = actions_with(|_| panic!("model must not be called"));

        let err = actions
            .get_answer(AnswerPayload {
                question: Some("Hi".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Required field 'grade' is missing.");

        let err = actions
            .summarize_content(SummarizePayload::default())
            .await
            .unwrap_err();
        assert_eq!(err.message, "Required field 'textbookContent' is missing.");
    }

    #[tokio::test]
    async fn test_empty_content_message() {
        let (actions, _) = actions_with(|_| panic!("model must not be called"));
        let err = actions
            .summarize_content(SummarizePayload {
                textbook_content: Some(String::new()),
                grade_level: Some(5),
                student_query: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ActionErrorKind::Validation);
        assert_eq!(err.message, "Content cannot be empty.");
    }

    #[tokio::test]
    async fn test_summarize_attaches_progress_note() {
        let (actions, _) = actions_with(|_| structured(json!({ "summary": "సారాంశం" })));
        let output = actions
            .summarize_content(SummarizePayload {
                textbook_content: Some("Plants make food using sunlight.".to_string()),
                grade_level: Some(4),
                student_query: Some("   ".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(output.summary, "సారాంశం");
        assert_eq!(output.progress, summarize::PROGRESS_NOTE);
    }

    #[tokio::test]
    async fn test_translate_rejects_unknown_language() {
        let (actions, _) = actions_with(|_| panic!("model must not be called"));
        let err = actions
            .translate_text(TranslatePayload {
                text: Some("Hello".to_string()),
                target_language: Some("Klingon".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ActionErrorKind::Validation);
        assert!(err.message.contains("Klingon"));
    }

    #[tokio::test]
    async fn test_translate_text() {
        let (actions, _) = actions_with(|_| structured(json!({ "translatedText": "Hola" })));
        let output = actions
            .translate_text(TranslatePayload {
                text: Some("Hello".to_string()),
                target_language: Some("Spanish".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(output.translated_text, "Hola");
    }

    #[tokio::test]
    async fn test_speech_to_text_requires_data_uri() {
        let (actions, _) = actions_with(|_| panic!("model must not be called"));
        let err = actions
            .speech_to_text(SpeechToTextPayload {
                audio_data_uri: Some("hello".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ActionErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_text_to_speech_without_media_surfaces_unchanged() {
        let (actions, _) = actions_with(|_| Ok(GenerateResponse::default()));
        let err = actions
            .text_to_speech(TextToSpeechPayload {
                text: Some("Hello".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ActionErrorKind::Provider);
        assert_eq!(err.message, "No media returned from TTS model.");
    }

    #[tokio::test]
    async fn test_text_to_speech_returns_wav() {
        let (actions, _) = actions_with(|_| {
            Ok(GenerateResponse {
                media: Some(Media {
                    url: "data:audio/L16;codec=pcm;rate=24000;base64,AAABAA==".to_string(),
                    content_type: Some("audio/L16;codec=pcm;rate=24000".to_string()),
                }),
                ..Default::default()
            })
        });
        let output = actions
            .text_to_speech(TextToSpeechPayload {
                text: Some("Hello".to_string()),
            })
            .await
            .unwrap();
        assert!(output.audio_data_uri.starts_with("data:audio/wav;base64,UklGR"));
    }

    #[tokio::test]
    async fn test_generate_image_without_image_fails() {
        let (actions, _) = actions_with(|_| {
            Ok(GenerateResponse {
                text: Some("I cannot draw that.".to_string()),
                ..Default::default()
            })
        });
        let err = actions
            .generate_image(ImaginePayload {
                textbook_description: Some("The water cycle".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ActionErrorKind::Provider);
        assert_eq!(err.message, "No image was generated.");
    }

    #[tokio::test]
    async fn test_provider_errors_pass_through() {
        let (actions, _) = actions_with(|_| Err(ProviderError::Blocked("SAFETY".to_string())));
        let err = actions
            .adapt_to_emotion(EmotionPayload {
                query: Some("I don't get fractions".to_string()),
                emotion: Some("frustrated".to_string()),
                grade_level: Some(5),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ActionErrorKind::Provider);
        assert_eq!(
            err.message,
            ProviderError::Blocked("SAFETY".to_string()).to_string()
        );
    }

    #[tokio::test]
    async fn test_usage_history_and_languages() {
        let (actions, model) = actions_with(|_| panic!("model must not be called"));
        let records = actions.get_usage_history().await.unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0], UsageRecord::new("Mon", 4, 3, 2, 1));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);

        let languages = actions.languages();
        assert_eq!(languages.len(), 8);
        assert!(languages.contains(&"Chinese (Simplified)"));
    }

    struct SingleDay;

    #[async_trait]
    impl UsageHistoryService for SingleDay {
        async fn usage_history(&self) -> Vec<UsageRecord> {
            vec![UsageRecord::new("Sat", 9, 0, 0, 0)]
        }
    }

    #[tokio::test]
    async fn test_usage_history_comes_from_the_injected_service() {
        let model = Arc::new(StubModel {
            reply: |_| panic!("model must not be called"),
            calls: AtomicUsize::new(0),
        });
        let actions = Actions::new(model, Arc::new(SingleDay));
        let records = actions.get_usage_history().await.unwrap();
        assert_eq!(records, vec![UsageRecord::new("Sat", 9, 0, 0, 0)]);
    }

    #[tokio::test]
    async fn test_perform_rejects_a_mismatched_result() {
        let (actions, _) = actions_with(|_| panic!("model must not be called"));
        let err = actions
            .perform("getAnswer", OperationRequest::UsageHistory, |result| match result {
                OperationResult::Qa(output) => Some(output),
                _ => None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ActionErrorKind::Internal);
        assert_eq!(
            err.message,
            "The usageHistory operation returned a usageHistory result."
        );
    }

    #[test]
    fn test_error_status_codes() {
        let validation: ActionError = ValidationError::Missing { field: "text" }.into();
        assert_eq!(validation.into_response().status(), StatusCode::BAD_REQUEST);

        let provider: ActionError = FlowError::from(ProviderError::Empty).into();
        assert_eq!(provider.into_response().status(), StatusCode::BAD_GATEWAY);

        let internal = ActionError {
            kind: ActionErrorKind::Internal,
            message: "mismatch".to_string(),
        };
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
