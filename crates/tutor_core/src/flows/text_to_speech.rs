//! crates/tutor_core/src/flows/text_to_speech.rs
//!
//! Speech synthesis. The model returns raw PCM, which is wrapped in WAV here.

use super::{SPEECH_MODEL, SPEECH_VOICE};
use crate::audio::{pcm_to_wav_data_uri, CodecError, PcmFormat};
use crate::domain::{TextToSpeechInput, TextToSpeechOutput};
use crate::error::FlowResult;
use crate::media::payload_after_comma;
use crate::ports::{
    GenerateRequest, GenerativeModel, Modality, ModelConfig, ProviderError, SpeechConfig,
};
use crate::prompt::{Prompt, PromptBuilder};
use crate::validation::Validate;
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, info};

pub const TEMPLATE_ID: &str = "convertTextToSpeech";

pub(crate) fn render_prompt(input: &TextToSpeechInput) -> Prompt {
    PromptBuilder::new("{text}")
        .var("text", &input.text)
        .build()
}

pub async fn text_to_speech(
    model: &dyn GenerativeModel,
    input: TextToSpeechInput,
) -> FlowResult<TextToSpeechOutput> {
    input.validate()?;
    info!(text_chars = input.text.chars().count(), "Synthesizing speech.");

    let request = GenerateRequest {
        template_id: TEMPLATE_ID,
        model: SPEECH_MODEL,
        prompt: render_prompt(&input),
        config: ModelConfig {
            response_modalities: vec![Modality::Audio],
            speech: Some(SpeechConfig {
                voice_name: SPEECH_VOICE.to_string(),
            }),
            ..Default::default()
        },
        output_schema: None,
    };

    let media = model
        .generate(request)
        .await?
        .media
        .ok_or(ProviderError::NoAudio)?;

    let pcm = STANDARD
        .decode(payload_after_comma(&media.url).trim())
        .map_err(CodecError::from)?;
    debug!(pcm_bytes = pcm.len(), "Wrapping synthesized PCM in WAV.");

    let audio_data_uri = pcm_to_wav_data_uri(&pcm, PcmFormat::SPEECH)?;
    Ok(TextToSpeechOutput { audio_data_uri })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::media::DataUri;
    use crate::ports::{GenerateResponse, Media, MockGenerativeModel};

    fn hello() -> TextToSpeechInput {
        TextToSpeechInput {
            text: "నమస్కారం".to_string(),
        }
    }

    #[tokio::test]
    async fn test_wraps_pcm_in_wav_data_uri() {
        let pcm: Vec<u8> = [0i16, 1000, -1000, 32767]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let payload = STANDARD.encode(&pcm);

        let mut model = MockGenerativeModel::new();
        model
            .expect_generate()
            .withf(|request| {
                request.model == SPEECH_MODEL
                    && request.config.response_modalities == vec![Modality::Audio]
                    && request.config.speech.as_ref().map(|s| s.voice_name.as_str())
                        == Some(SPEECH_VOICE)
                    && request.prompt.text() == "నమస్కారం"
            })
            .times(1)
            .returning(move |_| {
                Ok(GenerateResponse {
                    media: Some(Media {
                        url: format!("data:audio/L16;codec=pcm;rate=24000;base64,{}", payload),
                        content_type: Some("audio/L16;codec=pcm;rate=24000".to_string()),
                    }),
                    ..Default::default()
                })
            });

        let output = text_to_speech(&model, hello()).await.unwrap();
        let uri = DataUri::parse(&output.audio_data_uri).unwrap();
        assert_eq!(uri.mime_type, "audio/wav");

        let wav = uri.decode().unwrap();
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[44..], pcm.as_slice());
    }

    #[tokio::test]
    async fn test_no_media_is_a_domain_error() {
        let mut model = MockGenerativeModel::new();
        model.expect_generate().times(1).returning(|_| {
            Ok(GenerateResponse {
                text: Some("sorry".to_string()),
                ..Default::default()
            })
        });
        let err = text_to_speech(&model, hello()).await.unwrap_err();
        assert!(matches!(err, FlowError::Provider(ProviderError::NoAudio)));
        assert_eq!(err.to_string(), "No media returned from TTS model.");
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_a_codec_error() {
        let mut model = MockGenerativeModel::new();
        model.expect_generate().times(1).returning(|_| {
            Ok(GenerateResponse {
                media: Some(Media {
                    url: "data:audio/L16;base64,@@@".to_string(),
                    content_type: None,
                }),
                ..Default::default()
            })
        });
        let err = text_to_speech(&model, hello()).await.unwrap_err();
        assert!(matches!(err, FlowError::Codec(CodecError::Base64(_))));
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let model = MockGenerativeModel::new();
        let err = text_to_speech(
            &model,
            TextToSpeechInput {
                text: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
    }
}
