use std::sync::Arc;

use crate::config::Config;
use crate::services::ResumeAnalyzer;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<ResumeAnalyzer>,
}

impl AppState {
    pub fn new(config: Config, analyzer: ResumeAnalyzer) -> Self {
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let analyzer = ResumeAnalyzer::from_config(&config)?;
        Ok(Self::new(config, analyzer))
    }
}
