use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    response::Json,
};
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id_from;
use crate::models::{AnalyzeResponse, UploadedFile};
use crate::state::AppState;

/// `POST /api/ats`: multipart upload with a `file` field.
pub async fn analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let request_id = request_id_from(&headers);

    info!(request_id = %request_id, "Starting resume analysis request");

    // The credential is checked before the upload is read.
    let client = state.analyzer.analysis_client()?;

    let mut multipart = multipart.map_err(|e| {
        AppError::invalid_file(format!("Expected a multipart form upload: {}", e))
    })?;

    let file = match read_file_field(&mut multipart, state.config.max_file_size_mb).await {
        Ok(file) => file,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Failed to read multipart upload");
            return Err(e);
        }
    };

    let analysis = state.analyzer.analyze(&client, file, &request_id).await?;

    Ok(Json(AnalyzeResponse::new(analysis)))
}

/// Reads the `file` field. Other fields are skipped; a missing field is
/// `Ok(None)`. Hitting the body limit while streaming is
/// [`AppError::FileTooLarge`].
pub async fn read_file_field(
    multipart: &mut Multipart,
    max_file_size_mb: usize,
) -> AppResult<Option<UploadedFile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size_mb, "Failed to read multipart field"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_file_size_mb, "Failed to read file data"))?;

        let mut file = UploadedFile::new(file_name, data);
        if let Some(mime_type) = content_type {
            file = file.with_mime_type(mime_type);
        }

        debug!(
            "Read upload: {} ({} bytes, type: {:?})",
            file.name,
            file.size,
            file.mime_type
        );

        return Ok(Some(file));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError, max_file_size_mb: usize, context: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::FileTooLarge {
            limit: max_file_size_mb,
        };
    }
    AppError::InvalidFile {
        message: format!("{}: {}", context, err),
    }
}
