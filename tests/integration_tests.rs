//! Integration tests for the ATS resume checker service

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use atscheck::{
    config::Config,
    create_router,
    models::{AnalysisResult, AnalyzeResponse, Category, ErrorResponse},
    presentation::{view, ScoreBand, Tab},
    services::{
        ExtractionError, GeminiClient, GenerativeModel, ModelError, ResumeAnalyzer, TextExtractor,
    },
    AppState,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use tower::ServiceExt;

const BOUNDARY: &str = "ats-test-boundary";

const EXAMPLE_REPLY: &str = r#"{"ats_score":62,"summary":"Decent","detailed_points":[{"section":"Experience","category":"weakness","status":"red","issue":"Vague bullet","correction":"Led team of 10 to grow sales 25%","explanation":"STAR method"}]}"#;

struct StubExtractor {
    text: Result<&'static str, &'static str>,
    calls: Arc<AtomicUsize>,
}

impl TextExtractor for StubExtractor {
    fn extract(&self, _content: &[u8]) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .map(str::to_string)
            .map_err(|e| ExtractionError::Unparseable(e.to_string()))
    }
}

struct StubModel {
    reply: Result<&'static str, &'static str>,
    calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.reply.map(str::to_string).map_err(|message| ModelError::Api {
            status: 503,
            message: message.to_string(),
        })
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

struct Harness {
    app: Router,
    extractor_calls: Arc<AtomicUsize>,
    model_calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

fn harness(
    text: Result<&'static str, &'static str>,
    reply: Option<Result<&'static str, &'static str>>,
) -> Harness {
    harness_with_config(text, reply, Config::default())
}

fn harness_with_config(
    text: Result<&'static str, &'static str>,
    reply: Option<Result<&'static str, &'static str>>,
    config: Config,
) -> Harness {
    let extractor_calls = Arc::new(AtomicUsize::new(0));
    let model_calls = Arc::new(AtomicUsize::new(0));
    let last_prompt = Arc::new(Mutex::new(None));

    let extractor = Arc::new(StubExtractor {
        text,
        calls: extractor_calls.clone(),
    });
    let model = reply.map(|reply| {
        Arc::new(StubModel {
            reply,
            calls: model_calls.clone(),
            last_prompt: last_prompt.clone(),
        }) as Arc<dyn GenerativeModel>
    });

    let analyzer = ResumeAnalyzer::new(extractor, model, config.max_file_size_mb);

    Harness {
        app: create_router(AppState::new(config, analyzer)),
        extractor_calls,
        model_calls,
        last_prompt,
    }
}

fn multipart_body(file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n"
        )
        .as_bytes(),
    );
    if let Some((name, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(uri: &str, file: Option<(&str, &str, &[u8])>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(file)))
        .unwrap()
}

fn pdf_upload(uri: &str) -> Request<Body> {
    upload(uri, Some(("resume.pdf", "application/pdf", b"%PDF-1.4 fake")))
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn error_body(response: Response) -> ErrorResponse {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn missing_api_key_fails_before_reading_upload() {
    let h = harness(Ok("text"), None);

    let response = h.app.oneshot(pdf_upload("/api/ats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_body(response).await.error, "Gemini API key not configured");
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_file_field_is_bad_request() {
    let h = harness(Ok("text"), Some(Ok(EXAMPLE_REPLY)));

    let response = h.app.oneshot(upload("/api/ats", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.error, "No file uploaded");
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_file_is_bad_request() {
    let h = harness(Ok("text"), Some(Ok(EXAMPLE_REPLY)));

    let response = h
        .app
        .oneshot(upload("/api/ats", Some(("resume.pdf", "application/pdf", b""))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_pdf_upload_is_bad_request() {
    let h = harness(Ok("text"), Some(Ok(EXAMPLE_REPLY)));

    let response = h
        .app
        .oneshot(upload("/api/ats", Some(("notes.txt", "text/plain", b"hello"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
}

fn one_megabyte_limit() -> Harness {
    harness_with_config(
        Ok("text"),
        Some(Ok(EXAMPLE_REPLY)),
        Config {
            max_file_size_mb: 1,
            ..Config::default()
        },
    )
}

fn pdf_of_size(size: usize) -> Vec<u8> {
    let mut content = b"%PDF-1.4\n".to_vec();
    content.resize(size, b'a');
    content
}

#[tokio::test]
async fn file_just_over_the_limit_is_payload_too_large() {
    let h = one_megabyte_limit();
    let content = pdf_of_size(1024 * 1024 + 10 * 1024);

    let response = h
        .app
        .oneshot(upload("/api/ats", Some(("resume.pdf", "application/pdf", &content))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_body(response).await.error, "File too large: exceeds limit of 1MB");
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn body_well_over_the_limit_is_payload_too_large() {
    let h = one_megabyte_limit();
    let content = pdf_of_size(3 * 1024 * 1024);

    let response = h
        .app
        .oneshot(upload("/api/ats", Some(("resume.pdf", "application/pdf", &content))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_body(response).await.error, "File too large: exceeds limit of 1MB");
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn page_reports_oversized_upload() {
    let h = one_megabyte_limit();
    let content = pdf_of_size(3 * 1024 * 1024);

    let response = h
        .app
        .oneshot(upload("/", Some(("resume.pdf", "application/pdf", &content))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Error: File too large: exceeds limit of 1MB"));
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_extraction_never_reaches_the_model() {
    let h = harness(Ok("  \n\t "), Some(Ok(EXAMPLE_REPLY)));

    let response = h.app.oneshot(pdf_upload("/api/ats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_body(response).await.error, "Could not extract text from PDF");
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unparseable_pdf_is_a_client_error() {
    let h = harness(Err("bad xref"), Some(Ok(EXAMPLE_REPLY)));

    let response = h.app.oneshot(pdf_upload("/api/ats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(error_body(response).await.error.contains("bad xref"));
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn example_resume_is_scored_medium_with_a_weakness_rewrite() {
    let h = harness(
        Ok("Responsible for managing a team and doing sales."),
        Some(Ok(EXAMPLE_REPLY)),
    );

    let response = h.app.oneshot(pdf_upload("/api/ats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 1);
    let prompt = h.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.ends_with("Responsible for managing a team and doing sales."));

    let body: AnalyzeResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(body.success);

    let ats: AnalysisResult = body.ats;
    assert_eq!(ScoreBand::from_score(ats.ats_score), ScoreBand::Medium);

    let point = &ats.detailed_points[0];
    assert_eq!(point.category, Some(Category::Weakness));
    assert_eq!(view::tab_for(point), Some(Tab::Weaknesses));
    assert!(matches!(
        view::card_for(point).body,
        view::CardBody::Comparison { after: "Led team of 10 to grow sales 25%", .. }
    ));
}

#[tokio::test]
async fn fenced_model_output_is_accepted() {
    let h = harness(
        Ok("Rust engineer"),
        Some(Ok("```json\n{\"ats_score\": 91, \"summary\": \"Great\"}\n```")),
    );

    let response = h.app.oneshot(pdf_upload("/api/ats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["ats"]["ats_score"], 91);
    assert_eq!(body["ats"]["detailed_points"], serde_json::json!([]));
}

#[tokio::test]
async fn prose_model_output_returns_raw_text() {
    let h = harness(
        Ok("Rust engineer"),
        Some(Ok("Sure! Here is my review: the resume is fine.")),
    );

    let response = h.app.oneshot(pdf_upload("/api/ats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_body(response).await;
    assert_eq!(body.error, "Gemini returned invalid JSON");
    assert_eq!(body.raw.as_deref(), Some("Sure! Here is my review: the resume is fine."));
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn model_failure_is_a_server_error_with_message() {
    let h = harness(Ok("Rust engineer"), Some(Err("The model is overloaded.")));

    let response = h.app.oneshot(pdf_upload("/api/ats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_body(response).await;
    assert!(body.error.contains("The model is overloaded."));
    assert!(body.raw.is_none());
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let h = harness(Ok("text"), None);

    let response = h
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc123");
}

#[tokio::test]
async fn unreadable_request_id_is_replaced() {
    let h = harness(Ok("text"), None);

    let response = h
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", HeaderValue::from_bytes(b"\xffid").unwrap())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(id.len(), 8);
}

#[tokio::test]
async fn health_reports_missing_key_as_degraded() {
    let h = harness(Ok("text"), None);

    let response = h
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["model_configured"], false);

    let ready = h
        .app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn ready_when_configured() {
    let h = harness(Ok("text"), Some(Ok(EXAMPLE_REPLY)));

    let ready = h
        .app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn index_page_renders_upload_form() {
    let h = harness(Ok("text"), None);

    let response = h
        .app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("AI-Powered ATS Resume Analyzer"));
    assert!(html.contains(r#"name="file""#));
}

#[tokio::test]
async fn page_submission_renders_results() {
    let h = harness(
        Ok("Responsible for managing a team and doing sales."),
        Some(Ok(EXAMPLE_REPLY)),
    );

    let response = h.app.oneshot(pdf_upload("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("score-medium"));
    assert!(html.contains("Work Experience Optimization"));
    assert!(html.contains("Led team of 10 to grow sales 25%"));
    assert!(html.contains("No items found for this category."));
}

#[tokio::test]
async fn page_opens_on_the_requested_tab() {
    let h = harness(
        Ok("Responsible for managing a team and doing sales."),
        Some(Ok(EXAMPLE_REPLY)),
    );

    let response = h.app.oneshot(pdf_upload("/?tab=suggestions")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains(r#"data-panel="suggestions">"#));
    assert!(html.contains(r#"data-panel="strengths" hidden>"#));
    assert!(html.contains(r#"class="tab-btn active" data-tab="suggestions""#));
    assert!(html.contains(r#"action="/?tab=suggestions""#));
}

#[tokio::test]
async fn page_rejects_non_pdf_without_calling_out() {
    let h = harness(Ok("text"), Some(Ok(EXAMPLE_REPLY)));

    let response = h
        .app
        .oneshot(upload("/", Some(("photo.png", "image/png", b"\x89PNG"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Please upload a PDF file."));
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.model_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn page_without_file_asks_for_one() {
    let h = harness(Ok("text"), Some(Ok(EXAMPLE_REPLY)));

    let response = h
        .app
        .oneshot(upload("/", Some(("", "application/octet-stream", b""))))
        .await
        .unwrap();

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Please select a file first."));
    assert_eq!(h.extractor_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn page_shows_server_errors_in_banner() {
    let h = harness(Ok("text"), Some(Ok("not json at all")));

    let response = h.app.oneshot(pdf_upload("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Error: Gemini returned invalid JSON"));
}

async fn spawn_mock_gemini(
    status: StatusCode,
    body: &'static str,
) -> (String, Arc<Mutex<Option<String>>>) {
    let seen_key = Arc::new(Mutex::new(None));
    let recorder = seen_key.clone();

    let app = Router::new().route(
        "/v1beta/models/:action",
        post(move |headers: HeaderMap| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = headers
                    .get("x-goog-api-key")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1beta", addr), seen_key)
}

#[tokio::test]
async fn gemini_client_reads_candidate_text() {
    let (base, seen_key) = spawn_mock_gemini(
        StatusCode::OK,
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"ats_score\": 75}"}]},"finishReason":"STOP"}]}"#,
    )
    .await;

    let client = GeminiClient::new(
        "test-key".to_string(),
        "gemini-2.5-flash".to_string(),
        base,
        Duration::from_secs(5),
    )
    .unwrap();

    let text = client.generate("prompt").await.unwrap();
    assert_eq!(text, r#"{"ats_score": 75}"#);
    assert_eq!(seen_key.lock().unwrap().as_deref(), Some("test-key"));
}

#[tokio::test]
async fn gemini_client_surfaces_api_errors() {
    let (base, _) = spawn_mock_gemini(
        StatusCode::FORBIDDEN,
        r#"{"error":{"code":403,"message":"API key not valid. Please pass a valid API key.","status":"PERMISSION_DENIED"}}"#,
    )
    .await;

    let client = GeminiClient::new(
        "bad-key".to_string(),
        "gemini-2.5-flash".to_string(),
        base,
        Duration::from_secs(5),
    )
    .unwrap();

    match client.generate("prompt").await {
        Err(ModelError::Api { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid. Please pass a valid API key.");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
