//! ATS résumé checker
//!
//! Accepts a PDF résumé, extracts its text, asks Gemini for a structured
//! ATS audit and serves the result as JSON or as a tabbed HTML page.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod presentation;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use state::AppState;
