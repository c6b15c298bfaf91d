//! Client-side upload flow: which file is held, whether a request is in
//! flight, and the last analysis or error.

use tracing::debug;

use crate::models::{AnalysisResult, PDF_MIME_TYPE};
use crate::presentation::view::Tab;

pub const NOT_A_PDF: &str = "Please upload a PDF file.";
pub const NO_FILE_SELECTED: &str = "Please select a file first.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    FileSelected {
        file: SelectedFile,
    },
    Submitting {
        file: SelectedFile,
    },
    Resolved {
        file: SelectedFile,
        analysis: AnalysisResult,
    },
    Errored {
        file: Option<SelectedFile>,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    active_tab: Tab,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            active_tab: Tab::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::FileSelected { file }
            | SessionState::Submitting { file }
            | SessionState::Resolved { file, .. } => Some(file),
            SessionState::Errored { file, .. } => file.as_ref(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Submitting { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Errored { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SessionState::Resolved { analysis, .. } => Some(analysis),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.file().is_some() && !self.is_loading()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Returns whether the file was accepted. Only `application/pdf` is;
    /// anything else sets an error and keeps the previously held file.
    pub fn select_file(&mut self, name: impl Into<String>, content_type: &str) -> bool {
        if self.is_loading() {
            debug!("Ignoring file selection while a submission is in flight");
            return false;
        }

        if !content_type.trim().eq_ignore_ascii_case(PDF_MIME_TYPE) {
            let file = self.file().cloned();
            self.state = SessionState::Errored {
                file,
                message: NOT_A_PDF.to_string(),
            };
            return false;
        }

        self.state = SessionState::FileSelected {
            file: SelectedFile {
                name: name.into(),
                content_type: PDF_MIME_TYPE.to_string(),
            },
        };
        true
    }

    /// Starts a submission. Returns the file to upload, or `None` when the
    /// submission is refused and no request must be sent.
    pub fn submit(&mut self) -> Option<SelectedFile> {
        if self.is_loading() {
            debug!("Submission already in flight");
            return None;
        }

        match self.file().cloned() {
            Some(file) => {
                self.state = SessionState::Submitting { file: file.clone() };
                Some(file)
            }
            None => {
                self.state = SessionState::Errored {
                    file: None,
                    message: NO_FILE_SELECTED.to_string(),
                };
                None
            }
        }
    }

    /// Stores a finished analysis. Ignored unless a submission is in flight.
    pub fn resolve(&mut self, analysis: AnalysisResult) -> bool {
        let file = match &self.state {
            SessionState::Submitting { file } => file.clone(),
            _ => return false,
        };
        self.state = SessionState::Resolved { file, analysis };
        self.active_tab = Tab::default();
        true
    }

    /// Errors raised outside a submission, such as an unreadable form.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let file = self.file().cloned();
        self.state = SessionState::Errored {
            file,
            message: message.into(),
        };
    }

    /// Records a failed submission. Ignored unless a submission is in flight.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        let file = match &self.state {
            SessionState::Submitting { file } => file.clone(),
            _ => return false,
        };
        self.state = SessionState::Errored {
            file: Some(file),
            message: message.into(),
        };
        true
    }
}
