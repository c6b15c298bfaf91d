use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub ats: AnalysisResult,
}

impl AnalyzeResponse {
    pub fn new(ats: AnalysisResult) -> Self {
        Self { success: true, ats }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub services: ServiceStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub pdf_processor: bool,
    pub model_configured: bool,
    pub model: String,
}
