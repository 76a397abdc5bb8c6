//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for Google's Gemini `generateContent` REST API.
//! It implements the `GenerativeModel` port from the `core` crate.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, warn};
use tutor_core::media::DataUri;
use tutor_core::ports::{
    GenerateRequest, GenerateResponse, GenerativeModel, Media, Modality, ProviderError,
    ProviderResult,
};
use tutor_core::prompt::PromptPart;

/// Finish reasons that mean the candidate was withheld by a content filter.
const SAFETY_FINISH_REASONS: [&str; 5] = [
    "SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
    "IMAGE_SAFETY",
];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `GenerativeModel` port using the Gemini REST API.
#[derive(Clone)]
pub struct GeminiAdapter {
    http: Client,
    api_base: String,
    api_key: String,
}

impl GeminiAdapter {
    /// Creates a new `GeminiAdapter`. The HTTP client is built once and shared.
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

//=========================================================================================
// Request Building
//=========================================================================================

fn prompt_part(part: &PromptPart) -> Value {
    match part {
        PromptPart::Text(text) => json!({ "text": text }),
        PromptPart::Media { url, content_type } => match DataUri::parse(url) {
            Some(data_uri) => json!({
                "inlineData": {
                    "mimeType": content_type.as_deref().unwrap_or(data_uri.mime_type),
                    "data": data_uri.payload,
                }
            }),
            None => json!({
                "fileData": {
                    "mimeType": content_type.as_deref().unwrap_or("application/octet-stream"),
                    "fileUri": url,
                }
            }),
        },
    }
}

/// Builds the JSON body of a `generateContent` call.
pub(crate) fn build_payload(request: &GenerateRequest) -> Value {
    let parts: Vec<Value> = request.prompt.parts().iter().map(prompt_part).collect();

    let mut payload = Map::new();
    payload.insert(
        "contents".to_string(),
        json!([{ "role": "user", "parts": parts }]),
    );

    let config = &request.config;
    let mut generation_config = Map::new();
    if !config.response_modalities.is_empty() {
        generation_config.insert(
            "responseModalities".to_string(),
            json!(config.response_modalities),
        );
    }
    if let Some(speech) = &config.speech {
        generation_config.insert(
            "speechConfig".to_string(),
            json!({
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": speech.voice_name }
                }
            }),
        );
    }
    if let Some(schema) = &request.output_schema {
        generation_config.insert(
            "responseMimeType".to_string(),
            Value::String("application/json".to_string()),
        );
        generation_config.insert("responseSchema".to_string(), schema.clone());
    }
    if !generation_config.is_empty() {
        payload.insert(
            "generationConfig".to_string(),
            Value::Object(generation_config),
        );
    }

    if !config.safety_settings.is_empty() {
        payload.insert(
            "safetySettings".to_string(),
            json!(config.safety_settings),
        );
    }

    Value::Object(payload)
}

//=========================================================================================
// Response Parsing
//=========================================================================================

fn modality_of_mime(mime_type: &str) -> Modality {
    if mime_type.starts_with("image/") {
        Modality::Image
    } else if mime_type.starts_with("audio/") {
        Modality::Audio
    } else {
        Modality::Text
    }
}

fn join_modalities(modalities: &[Modality]) -> String {
    modalities
        .iter()
        .map(Modality::to_string)
        .collect::<Vec<_>>()
        .join("+")
}

/// Shapes a `generateContent` response body into a [`GenerateResponse`].
pub(crate) fn parse_response(
    payload: &Value,
    request: &GenerateRequest,
) -> ProviderResult<GenerateResponse> {
    if let Some(reason) = payload
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(ProviderError::Blocked(reason.to_string()));
    }

    let candidate = payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or(ProviderError::Empty)?;

    if let Some(reason) = candidate.get("finishReason").and_then(Value::as_str) {
        if SAFETY_FINISH_REASONS.contains(&reason) {
            return Err(ProviderError::Blocked(reason.to_string()));
        }
    }

    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut texts: Vec<String> = Vec::new();
    let mut media: Option<Media> = None;
    let mut received: Vec<Modality> = Vec::new();

    for part in &parts {
        if let Some(text) = part.get("text").and_then(Value::as_str) {
            if part.get("thought").and_then(Value::as_bool) == Some(true) {
                continue;
            }
            texts.push(text.to_string());
            if !received.contains(&Modality::Text) {
                received.push(Modality::Text);
            }
            continue;
        }

        let inline = part.get("inlineData").or_else(|| part.get("inline_data"));
        if let Some(inline) = inline {
            let data = inline.get("data").and_then(Value::as_str).unwrap_or_default();
            let mime_type = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(Value::as_str)
                .unwrap_or("application/octet-stream");
            let modality = modality_of_mime(mime_type);
            if !received.contains(&modality) {
                received.push(modality);
            }
            if media.is_none() && !data.is_empty() {
                media = Some(Media {
                    url: format!("data:{};base64,{}", mime_type, data),
                    content_type: Some(mime_type.to_string()),
                });
            }
        }
    }

    if received.is_empty() {
        return Err(ProviderError::Empty);
    }

    let allowed = request.config.allowed_modalities();
    if !received.iter().any(|modality| allowed.contains(modality)) {
        return Err(ProviderError::UnsupportedModality {
            requested: join_modalities(&allowed),
            received: join_modalities(&received),
        });
    }

    let text = if texts.is_empty() {
        None
    } else {
        Some(texts.concat())
    };

    let output = match (&request.output_schema, &text) {
        (Some(_), Some(text)) => serde_json::from_str::<Value>(text).ok(),
        _ => None,
    };

    Ok(GenerateResponse {
        text,
        media,
        output,
    })
}

/// Pulls the human-readable message out of a Gemini error body.
fn api_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).chars().take(500).collect())
}

//=========================================================================================
// `GenerativeModel` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerativeModel for GeminiAdapter {
    /// Makes exactly one `generateContent` call.
    async fn generate(&self, request: GenerateRequest) -> ProviderResult<GenerateResponse> {
        let endpoint = self.endpoint_for_model(request.model);
        let payload = build_payload(&request);
        debug!(
            model = request.model,
            template = request.template_id,
            "Calling Gemini."
        );

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let body: Bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = api_error_message(&body);
            warn!(status = status.as_u16(), %message, "Gemini returned an error.");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidOutput(format!("response is not JSON: {}", e)))?;
        parse_response(&value, &request)
    }
}
