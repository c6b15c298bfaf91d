use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::AnalysisResult;
use crate::services::gemini_client::{GenerativeModel, ModelError};

// A whole backtick run is consumed at once, which keeps stripping idempotent.
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)`{3,}(?:json)?").expect("code fence pattern is valid"));

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("Gemini returned invalid JSON")]
    InvalidJson { raw: String },
}

/// Removes Markdown code fences (```` ``` ```` and ```` ```json ````) and
/// surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Parses cleaned model output into an [`AnalysisResult`].
pub fn parse_analysis(cleaned: &str) -> Result<AnalysisResult, AnalysisError> {
    let value: Value = serde_json::from_str(cleaned).map_err(|e| {
        warn!(error = %e, raw_chars = cleaned.len(), "Model output is not valid JSON");
        AnalysisError::InvalidJson {
            raw: cleaned.to_string(),
        }
    })?;

    AnalysisResult::from_model_json(value).ok_or_else(|| {
        warn!("Model output is JSON but not an object");
        AnalysisError::InvalidJson {
            raw: cleaned.to_string(),
        }
    })
}

/// Sends a prompt to the model and turns the reply into an analysis.
#[derive(Clone)]
pub struct AnalysisClient {
    model: Arc<dyn GenerativeModel>,
}

impl AnalysisClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn analyze(&self, prompt: &str) -> Result<AnalysisResult, AnalysisError> {
        let raw = self.model.generate(prompt).await?;
        let cleaned = strip_code_fences(&raw);

        debug!(
            model = self.model.model_name(),
            raw_chars = raw.len(),
            cleaned_chars = cleaned.len(),
            "Received model output"
        );

        parse_analysis(&cleaned)
    }
}
