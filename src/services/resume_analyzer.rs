//! Upload → text → prompt → model → analysis.
//!
//! Each step runs once and in order; the first failure ends the request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AnalysisResult, UploadedFile};
use crate::services::analysis_client::AnalysisClient;
use crate::services::gemini_client::{GeminiClient, GenerativeModel};
use crate::services::pdf_processor::{extract_on_blocking_pool, PdfProcessor, TextExtractor};
use crate::services::prompt_builder::build_prompt;

pub struct ResumeAnalyzer {
    extractor: Arc<dyn TextExtractor>,
    model: Option<Arc<dyn GenerativeModel>>,
    max_file_size_mb: usize,
}

impl ResumeAnalyzer {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        model: Option<Arc<dyn GenerativeModel>>,
        max_file_size_mb: usize,
    ) -> Self {
        Self {
            extractor,
            model,
            max_file_size_mb,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let model = GeminiClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn GenerativeModel>);

        Ok(Self::new(
            Arc::new(PdfProcessor::new()),
            model,
            config.max_file_size_mb,
        ))
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model_name())
    }

    pub fn extractor_available(&self) -> bool {
        self.extractor.is_available()
    }

    /// Fails with [`AppError::MissingApiKey`] when no model is configured.
    /// Checked before the upload is read.
    pub fn analysis_client(&self) -> AppResult<AnalysisClient> {
        self.model
            .clone()
            .map(AnalysisClient::new)
            .ok_or(AppError::MissingApiKey)
    }

    pub fn validate_upload(&self, file: Option<UploadedFile>) -> AppResult<UploadedFile> {
        let file = file.ok_or(AppError::MissingFile)?;

        if file.is_empty() {
            return Err(AppError::EmptyFile);
        }

        let max_size_bytes = self.max_file_size_mb.saturating_mul(1024 * 1024);
        if file.size > max_size_bytes {
            warn!(
                file_size = file.size,
                max_size_bytes, "Upload exceeds the size limit"
            );
            return Err(AppError::FileTooLarge {
                limit: self.max_file_size_mb,
            });
        }

        if !file.is_pdf() {
            return Err(AppError::invalid_file("File is not a valid PDF document"));
        }

        Ok(file)
    }

    /// Extracted text, trimmed. Empty text is rejected.
    pub async fn extract_text(&self, file: &UploadedFile) -> AppResult<String> {
        let text = extract_on_blocking_pool(self.extractor.clone(), file.content.clone()).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::NoTextExtracted);
        }
        Ok(text.to_string())
    }

    pub async fn analyze(
        &self,
        client: &AnalysisClient,
        file: Option<UploadedFile>,
        request_id: &str,
    ) -> AppResult<AnalysisResult> {
        let start = Instant::now();

        let file = self.validate_upload(file).map_err(|e| {
            warn!(request_id = %request_id, error = %e, "Upload rejected");
            e
        })?;

        info!(
            request_id = %request_id,
            file_name = %file.name,
            file_size = file.size,
            "Extracting resume text"
        );

        let text = self.extract_text(&file).await?;
        let prompt = build_prompt(&text);

        info!(
            request_id = %request_id,
            text_length = text.len(),
            prompt_length = prompt.len(),
            "Requesting analysis from model"
        );

        let analysis = client.analyze(&prompt).await?;

        info!(
            request_id = %request_id,
            ats_score = analysis.ats_score,
            points = analysis.detailed_points.len(),
            total_time_ms = start.elapsed().as_millis() as u64,
            "Analysis completed"
        );

        Ok(analysis)
    }
}
