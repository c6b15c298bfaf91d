use std::env;
use anyhow::{Result, Context};
use tracing::{info, warn};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const MAX_FILE_SIZE_LIMIT_MB: usize = 1024;
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub request_timeout_seconds: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
}

// The API key never reaches the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base", &self.gemini_api_base)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            max_file_size_mb: 10,
            request_timeout_seconds: 120,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let defaults = Config::default();

        let config = Config {
            server_host: Self::string_env_var("SERVER_HOST", &defaults.server_host),
            server_port: Self::parse_env_var("SERVER_PORT", defaults.server_port)
                .context("Failed to parse SERVER_PORT")?,
            max_file_size_mb: Self::parse_env_var("MAX_FILE_SIZE_MB", defaults.max_file_size_mb)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            request_timeout_seconds: Self::parse_env_var(
                "REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            )
            .context("Failed to parse REQUEST_TIMEOUT_SECONDS")?,
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            gemini_model: Self::string_env_var("GEMINI_MODEL", &defaults.gemini_model),
            gemini_api_base: Self::string_env_var("GEMINI_API_BASE", &defaults.gemini_api_base),
        };

        config.validate()?;

        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; analysis requests will fail until it is configured");
        }

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn string_env_var(var_name: &str, default: &str) -> String {
        match env::var(var_name) {
            Ok(val) if !val.trim().is_empty() => val.trim().to_string(),
            _ => {
                info!("{} not set, using default: {}", var_name, default);
                default.to_string()
            }
        }
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_file_size_mb > MAX_FILE_SIZE_LIMIT_MB {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB must not exceed {}",
                MAX_FILE_SIZE_LIMIT_MB
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.gemini_model.is_empty() {
            return Err(anyhow::anyhow!("GEMINI_MODEL must not be empty"));
        }
        if self.gemini_api_base.is_empty() {
            return Err(anyhow::anyhow!("GEMINI_API_BASE must not be empty"));
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn has_api_key(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}
