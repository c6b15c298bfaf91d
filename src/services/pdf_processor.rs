use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use lopdf::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("file is not a parseable PDF document ({0})")]
    Unparseable(String),

    #[error("PDF parser aborted while reading the document: {0}")]
    Aborted(String),
}

/// Turns raw upload bytes into plain text. Implementations are blocking.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, content: &[u8]) -> Result<String, ExtractionError>;

    fn is_available(&self) -> bool {
        true
    }
}

/// Runs the extractor on the blocking pool. A panic inside the PDF parser
/// surfaces as [`ExtractionError::Aborted`] instead of taking the worker down.
pub async fn extract_on_blocking_pool(
    extractor: Arc<dyn TextExtractor>,
    content: Bytes,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extractor.extract(&content))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))?
}

/// `pdf-extract` backed extractor.
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    fn count_pages(&self, pdf_content: &[u8]) -> Option<usize> {
        Document::load_mem(pdf_content)
            .ok()
            .map(|doc| doc.get_pages().len())
    }
}

impl TextExtractor for PdfProcessor {
    fn extract(&self, content: &[u8]) -> Result<String, ExtractionError> {
        let start = Instant::now();

        tracing::debug!("Starting PDF text extraction ({} bytes)", content.len());

        let pages = self.count_pages(content);
        if pages.is_none() {
            tracing::warn!("PDF structure validation failed, trying text extraction anyway");
        }

        let text = pdf_extract::extract_text_from_mem(content).map_err(|e| {
            tracing::warn!("PDF text extraction failed: {:?}", e);
            ExtractionError::Unparseable(format!("{:?}", e))
        })?;

        tracing::info!(
            pages = ?pages,
            characters = text.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "PDF text extraction completed"
        );

        Ok(text)
    }
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}
