//! Core state types for the learning platform view.
//!
//! Everything here is process-lifetime only. A page load builds a fresh
//! [`AppState`] and nothing is ever written to disk.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Top-level content panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Upload,
    Assessment,
    Analytics,
    Recommendations,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 4] = [
        Tab::Upload,
        Tab::Assessment,
        Tab::Analytics,
        Tab::Recommendations,
    ];

    /// Key used in `data-tab` attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Upload => "upload",
            Tab::Assessment => "assessment",
            Tab::Analytics => "analytics",
            Tab::Recommendations => "recommendations",
        }
    }

    /// Label shown on the tab button.
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Upload => "Document Processing",
            Tab::Assessment => "Assessment Generation",
            Tab::Analytics => "Progress Analytics",
            Tab::Recommendations => "AI Recommendations",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Tab::Upload),
            "assessment" => Ok(Tab::Assessment),
            "analytics" => Ok(Tab::Analytics),
            "recommendations" => Ok(Tab::Recommendations),
            other => Err(AppError::UnknownTab(other.to_string())),
        }
    }
}

/// Simulated processing status. There is no error state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Processing,
    Complete,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Idle => "idle",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(ProcessingStatus::Idle),
            "processing" => Ok(ProcessingStatus::Processing),
            "complete" => Ok(ProcessingStatus::Complete),
            other => Err(AppError::UnknownStatus(other.to_string())),
        }
    }
}

/// UI state owned by one view controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    /// Selected file names, in selection order. Append-only, duplicates kept.
    pub uploaded_files: Vec<String>,
    pub processing_status: ProcessingStatus,
    /// Highlighted file row.
    pub selected_file: Option<String>,
    pub current_tab: Tab,
    /// Bumped once per render-triggering change.
    pub revision: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the assessment buttons are enabled.
    pub fn has_files(&self) -> bool {
        !self.uploaded_files.is_empty()
    }

    /// Whether the "assessment ready" panel is shown on the assessment tab.
    pub fn assessment_ready(&self) -> bool {
        self.processing_status == ProcessingStatus::Complete && self.has_files()
    }
}

/// A user interaction, as delivered by the page's delegated listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    SelectTab { tab: Tab },
    ReceiveFiles {
        #[serde(default)]
        files: Vec<String>,
    },
    GenerateQuiz,
    SelectFile { name: String },
}

impl Action {
    /// Value of the `data-action` attribute bound to this action.
    pub fn binding(&self) -> &'static str {
        match self {
            Action::SelectTab { .. } => "select-tab",
            Action::ReceiveFiles { .. } => "receive-files",
            Action::GenerateQuiz => "generate-quiz",
            Action::SelectFile { .. } => "select-file",
        }
    }
}
