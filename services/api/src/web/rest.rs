//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. Handlers are thin: each one hands
//! its payload to the matching action and serializes the result.

use crate::actions::{
    ActionResult, AnswerPayload, EmotionPayload, ErrorResponse, ImaginePayload,
    SpeechToTextPayload, SummarizePayload, TextToSpeechPayload, TranslatePayload,
};
use crate::error::ApiError;
use crate::web::{extract::ActionJson, state::AppState};
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;
use tutor_core::{
    EmotionOutput, ImagineOutput, QaOutput, SpeechToTextOutput, SummarizeOutput,
    TextToSpeechOutput, TranslateOutput, UsageRecord,
};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        answer_handler,
        adapt_to_emotion_handler,
        summarize_handler,
        imagine_handler,
        speech_to_text_handler,
        text_to_speech_handler,
        translate_handler,
        usage_history_handler,
        languages_handler,
        health_handler,
    ),
    components(
        schemas(
            AnswerPayload, EmotionPayload, SummarizePayload, ImaginePayload,
            SpeechToTextPayload, TextToSpeechPayload, TranslatePayload,
            QaOutput, EmotionOutput, SummarizeOutput, ImagineOutput,
            SpeechToTextOutput, TextToSpeechOutput, TranslateOutput, UsageRecord,
            ErrorResponse, LanguagesResponse, HealthResponse
        )
    ),
    tags(
        (name = "Textbook Tutor API", description = "Grade-aware tutoring over Telangana state textbooks.")
    )
)]
pub struct ApiDoc;

/// The document served at `/api-docs/openapi.json` and written by the `openapi` binary.
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = "Textbook Tutor API".to_string();
    doc.info.description = Some(
        "Answers, summaries, illustrations, translation and speech for Telangana state textbooks."
            .to_string(),
    );
    doc
}

/// Renders [`openapi_document`] as pretty-printed JSON.
pub fn openapi_json() -> Result<String, ApiError> {
    openapi_document().to_pretty_json().map_err(|e| {
        ApiError::Internal(format!("Could not serialize the OpenAPI document: {}", e))
    })
}

//=========================================================================================
// API Response Structs
//=========================================================================================

/// The languages `POST /api/translate` accepts as `targetLanguage`.
#[derive(Serialize, ToSchema)]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Answer a question about textbook content, in Telugu, pitched at the student's grade.
///
/// When `emotionalTone` is given the answer's tone is adapted to it.
#[utoipa::path(
    post,
    path = "/api/answer",
    request_body = AnswerPayload,
    responses(
        (status = 200, description = "The answer", body = QaOutput),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "The AI provider failed", body = ErrorResponse)
    )
)]
pub async fn answer_handler(
    State(app_state): State<Arc<AppState>>,
    ActionJson(payload): ActionJson<AnswerPayload>,
) -> ActionResult<Json<QaOutput>> {
    app_state.actions.get_answer(payload).await.map(Json)
}

/// Respond to a query in Telugu, adapted to the student's emotional state.
#[utoipa::path(
    post,
    path = "/api/adapt-to-emotion",
    request_body = EmotionPayload,
    responses(
        (status = 200, description = "The adapted response", body = EmotionOutput),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "The AI provider failed", body = ErrorResponse)
    )
)]
pub async fn adapt_to_emotion_handler(
    State(app_state): State<Arc<AppState>>,
    ActionJson(payload): ActionJson<EmotionPayload>,
) -> ActionResult<Json<EmotionOutput>> {
    app_state.actions.adapt_to_emotion(payload).await.map(Json)
}

/// Summarize textbook content into key points in Telugu.
#[utoipa::path(
    post,
    path = "/api/summarize",
    request_body = SummarizePayload,
    responses(
        (status = 200, description = "The summary and a progress note", body = SummarizeOutput),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "The AI provider failed", body = ErrorResponse)
    )
)]
pub async fn summarize_handler(
    State(app_state): State<Arc<AppState>>,
    ActionJson(payload): ActionJson<SummarizePayload>,
) -> ActionResult<Json<SummarizeOutput>> {
    app_state.actions.summarize_content(payload).await.map(Json)
}

/// Generate an illustration for a textbook description.
#[utoipa::path(
    post,
    path = "/api/imagine",
    request_body = ImaginePayload,
    responses(
        (status = 200, description = "A data URI of the generated image", body = ImagineOutput),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "No image was generated", body = ErrorResponse)
    )
)]
pub async fn imagine_handler(
    State(app_state): State<Arc<AppState>>,
    ActionJson(payload): ActionJson<ImaginePayload>,
) -> ActionResult<Json<ImagineOutput>> {
    app_state.actions.generate_image(payload).await.map(Json)
}

/// Transcribe recorded audio.
#[utoipa::path(
    post,
    path = "/api/speech-to-text",
    request_body = SpeechToTextPayload,
    responses(
        (status = 200, description = "The transcript", body = SpeechToTextOutput),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 502, description = "The AI provider failed", body = ErrorResponse)
    )
)]
pub async fn speech_to_text_handler(
    State(app_state): State<Arc<AppState>>,
    ActionJson(payload): ActionJson<SpeechToTextPayload>,
) -> ActionResult<Json<SpeechToTextOutput>> {
    app_state.actions.speech_to_text(payload).await.map(Json)
}

/// Read text aloud. The audio comes back as a WAV data URI.
#[utoipa::path(
    post,
    path = "/api/text-to-speech",
    request_body = TextToSpeechPayload,
    responses(
        (status = 200, description = "A data URI of WAV audio", body = TextToSpeechOutput),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "The audio could not be encoded", body = ErrorResponse),
        (status = 502, description = "The AI provider failed", body = ErrorResponse)
    )
)]
pub async fn text_to_speech_handler(
    State(app_state): State<Arc<AppState>>,
    ActionJson(payload): ActionJson<TextToSpeechPayload>,
) -> ActionResult<Json<TextToSpeechOutput>> {
    app_state.actions.text_to_speech(payload).await.map(Json)
}

/// Translate text into one of the supported languages.
#[utoipa::path(
    post,
    path = "/api/translate",
    request_body = TranslatePayload,
    responses(
        (status = 200, description = "The translation", body = TranslateOutput),
        (status = 400, description = "Invalid input or unsupported language", body = ErrorResponse),
        (status = 502, description = "The AI provider failed", body = ErrorResponse)
    )
)]
pub async fn translate_handler(
    State(app_state): State<Arc<AppState>>,
    ActionJson(payload): ActionJson<TranslatePayload>,
) -> ActionResult<Json<TranslateOutput>> {
    app_state.actions.translate_text(payload).await.map(Json)
}

/// Weekly feature usage, one record per day.
#[utoipa::path(
    get,
    path = "/api/usage-history",
    responses(
        (status = 200, description = "Usage per day", body = Vec<UsageRecord>),
        (status = 500, description = "The usage table could not be read", body = ErrorResponse)
    )
)]
pub async fn usage_history_handler(
    State(app_state): State<Arc<AppState>>,
) -> ActionResult<Json<Vec<UsageRecord>>> {
    app_state.actions.get_usage_history().await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/languages",
    responses(
        (status = 200, description = "Supported translation targets", body = LanguagesResponse)
    )
)]
pub async fn languages_handler(State(app_state): State<Arc<AppState>>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: app_state
            .actions
            .languages()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "The service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
