use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::analysis_client::AnalysisError;
use crate::services::gemini_client::ModelError;
use crate::services::pdf_processor::ExtractionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Gemini API key not configured")]
    MissingApiKey,

    #[error("No file uploaded")]
    MissingFile,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Invalid file format: {message}")]
    InvalidFile { message: String },

    #[error("File too large: exceeds limit of {limit}MB")]
    FileTooLarge { limit: usize },

    #[error("Could not read PDF: {message}")]
    ExtractionFailed { message: String },

    #[error("Could not extract text from PDF")]
    NoTextExtracted,

    #[error("{message}")]
    UpstreamUnavailable { message: String },

    #[error("Gemini returned invalid JSON")]
    InvalidModelOutput { raw: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingApiKey => "CONFIG_ERROR",
            AppError::MissingFile => "MISSING_FILE",
            AppError::EmptyFile => "EMPTY_FILE",
            AppError::InvalidFile { .. } => "INVALID_FILE",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::ExtractionFailed { .. } => "EXTRACTION_ERROR",
            AppError::NoTextExtracted => "NO_TEXT_EXTRACTED",
            AppError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            AppError::InvalidModelOutput { .. } => "UPSTREAM_FORMAT_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::EmptyFile => StatusCode::BAD_REQUEST,
            AppError::InvalidFile { .. } => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ExtractionFailed { .. } => StatusCode::BAD_REQUEST,
            AppError::NoTextExtracted => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidModelOutput { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Cleaned model output attached to format errors for diagnostics.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            AppError::InvalidModelOutput { raw } => Some(raw),
            _ => None,
        }
    }

    /// Client-correctable errors are the ones in the 4xx range.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                error_message = %message,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                error_code = error_code,
                status_code = %status,
                error_message = %message,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            raw: self.raw_output().map(str::to_string),
            error: message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::ExtractionFailed {
            message: err.to_string(),
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::UpstreamUnavailable {
            message: err.to_string(),
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Model(e) => e.into(),
            AnalysisError::InvalidJson { raw } => AppError::InvalidModelOutput { raw },
        }
    }
}

impl AppError {
    pub fn invalid_file(message: impl Into<String>) -> Self {
        AppError::InvalidFile {
            message: message.into(),
        }
    }
}
