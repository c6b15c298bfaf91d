pub mod analysis_client;
pub mod gemini_client;
pub mod pdf_processor;
pub mod prompt_builder;
pub mod resume_analyzer;

pub use analysis_client::{AnalysisClient, AnalysisError};
pub use gemini_client::{GeminiClient, GenerativeModel, ModelError};
pub use pdf_processor::{ExtractionError, PdfProcessor, TextExtractor};
pub use prompt_builder::build_prompt;
pub use resume_analyzer::ResumeAnalyzer;
