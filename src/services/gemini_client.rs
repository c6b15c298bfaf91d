//! Client for the Gemini `generateContent` REST endpoint.
//!
//! A single attempt is made per call. Failures are reported, never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini blocked the prompt: {reason}")]
    Blocked { reason: String },

    #[error("Gemini returned an empty response")]
    EmptyResponse,
}

/// A hosted text model: prompt in, free-form text out.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn into_text(self) -> Result<String, ModelError> {
        if let Some(text) = self.text() {
            return Ok(text);
        }
        match self.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(ModelError::Blocked { reason }),
            None => Err(ModelError::EmptyResponse),
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        api_base: String,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ModelError> {
        match &config.gemini_api_key {
            Some(key) => Self::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_api_base.clone(),
                Duration::from_secs(config.request_timeout_seconds),
            )
            .map(Some),
            None => Ok(None),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "Gemini API returned an error: {}", message);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        if let Some(reason) = parsed.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            debug!(finish_reason = reason, "Gemini call finished");
        }
        parsed.into_text()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
