use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::Html,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::handlers::analyze::read_file_field;
use crate::middleware::request_id_from;
use crate::models::PDF_MIME_TYPE;
use crate::presentation::{render_page, Session, Tab};
use crate::state::AppState;

/// `?tab=` on the page routes picks the results tab shown first.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub tab: Option<String>,
}

impl PageQuery {
    /// Unknown ids fall back to the default tab.
    pub fn tab(&self) -> Tab {
        self.tab.as_deref().and_then(Tab::from_id).unwrap_or_default()
    }
}

/// `GET /`: the upload page with nothing selected.
pub async fn index_handler(Query(query): Query<PageQuery>) -> Html<String> {
    let mut session = Session::new();
    session.set_active_tab(query.tab());
    Html(render_page(&session))
}

/// `POST /`: the page's own form submission. Drives a fresh [`Session`]
/// through selection, submission and resolution, then renders it.
pub async fn submit_page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Html<String>) {
    let request_id = request_id_from(&headers);
    let mut session = Session::new();

    let upload = match multipart {
        Ok(mut multipart) => match read_file_field(&mut multipart, state.config.max_file_size_mb).await {
            Ok(upload) => upload.filter(|file| !(file.name.is_empty() && file.is_empty())),
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Unreadable form submission");
                return render_failure(session, Some(&request_id), e);
            }
        },
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Form submission was not multipart");
            None
        }
    };

    if let Some(file) = &upload {
        let content_type = file.mime_type.as_deref().unwrap_or(PDF_MIME_TYPE);
        if !session.select_file(file.name.clone(), content_type) {
            info!(request_id = %request_id, content_type, "Rejected non-PDF selection");
            return (StatusCode::OK, Html(render_page(&session)));
        }
    }

    if session.submit().is_none() {
        return (StatusCode::OK, Html(render_page(&session)));
    }

    let result = match state.analyzer.analysis_client() {
        Ok(client) => state.analyzer.analyze(&client, upload, &request_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(analysis) => {
            session.resolve(analysis);
            session.set_active_tab(query.tab());
            (StatusCode::OK, Html(render_page(&session)))
        }
        Err(e) => render_failure(session, Some(&request_id), e),
    }
}

fn render_failure(
    mut session: Session,
    request_id: Option<&str>,
    err: AppError,
) -> (StatusCode, Html<String>) {
    let status = err.status_code();
    if err.is_client_error() {
        warn!(request_id = ?request_id, error_code = err.error_code(), error = %err, "Analysis rejected");
    } else {
        tracing::error!(request_id = ?request_id, error_code = err.error_code(), error = %err, "Analysis failed");
    }

    if !session.fail(err.to_string()) {
        session.report_error(err.to_string());
    }

    (status, Html(render_page(&session)))
}
