// src/synth/gemini.rs
//! Blocking client for the Gemini `generateContent` speech endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{SpeechSynthesizer, SynthesisError, SynthesisErrorKind, SynthesisRequest};
use crate::config::SynthSettings;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Pull the base64 audio out of a successful response.
pub(crate) fn extract_audio(response: GenerateContentResponse) -> Result<String, SynthesisError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(SynthesisError::new(
            SynthesisErrorKind::ContentBlocked,
            format!("prompt blocked: {}", reason),
        ));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(SynthesisError::new(
            SynthesisErrorKind::EmptyResponse,
            "response has no candidate",
        ));
    };

    let audio = candidate
        .content
        .into_iter()
        .flat_map(|c| c.parts)
        .filter_map(|p| p.inline_data)
        .map(|d| d.data)
        .find(|d| !d.is_empty());

    match (audio, candidate.finish_reason.as_deref()) {
        (Some(data), _) => Ok(data),
        (None, Some("SAFETY")) => Err(SynthesisError::new(
            SynthesisErrorKind::ContentBlocked,
            "candidate finished for safety",
        )),
        (None, _) => Err(SynthesisError::new(
            SynthesisErrorKind::EmptyResponse,
            "No audio data received",
        )),
    }
}

/// Map a non-success HTTP reply to a category, preferring the status code
/// and falling back to the API's error message.
pub(crate) fn classify_http_failure(status: u16, body: &str) -> SynthesisError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    let detail = format!("HTTP {}: {}", status, message);
    match SynthesisErrorKind::from_status(status) {
        Some(kind) => SynthesisError::new(kind, detail),
        None => SynthesisError::from_message(detail),
    }
}

fn classify_transport_failure(err: &reqwest::Error) -> SynthesisError {
    let kind = if err.is_timeout() || err.is_connect() || err.is_request() {
        SynthesisErrorKind::Network
    } else if err.is_decode() {
        SynthesisErrorKind::EmptyResponse
    } else {
        SynthesisErrorKind::Unknown
    };
    SynthesisError::new(kind, err.to_string())
}

/// Speech synthesizer backed by the hosted Gemini TTS model.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, settings: &SynthSettings) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(concat!("neoflow-speech/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        let url = format!(
            "{}/models/{}:generateContent",
            settings.endpoint.trim_end_matches('/'),
            settings.model
        );
        Ok(Self {
            http,
            url,
            api_key: api_key.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SpeechSynthesizer for GeminiClient {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(SynthesisError::new(
                SynthesisErrorKind::InvalidRequest,
                "text is empty",
            ));
        }

        let body = GenerateContentRequest {
            contents: [Content {
                parts: [TextPart { text }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: request.voice.name(),
                        },
                    },
                },
            },
        };

        tracing::info!(voice = %request.voice, chars = text.chars().count(), "requesting speech");
        let resp = self
            .http
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| classify_transport_failure(&e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let err = classify_http_failure(status.as_u16(), &body);
            tracing::warn!("speech request failed: {}", err.detail);
            return Err(err);
        }

        let parsed: GenerateContentResponse = resp.json().map_err(|e| classify_transport_failure(&e))?;
        let audio = extract_audio(parsed)?;
        tracing::info!(bytes = audio.len(), "speech received");
        Ok(audio)
    }
}
