//! Editor configuration
//!
//! Settings that change how lines are classified and how new lines are
//! written. All of it is serializable so a device can keep its editor
//! settings next to the file they apply to.

use crate::chars;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where comment characters end the logical content of a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentMode {
    /// `;` and `#` end the content anywhere on the line
    #[default]
    Inline,
    /// `;` and `#` only comment out a line when they lead it
    FullLine,
}

impl CommentMode {
    /// Returns true if `b` ends the logical content once content has started
    pub fn ends_content(self, b: u8) -> bool {
        match self {
            CommentMode::Inline => chars::is_line_stop(b),
            CommentMode::FullLine => chars::is_eol(b),
        }
    }
}

/// Terminator written after inserted lines and in the JSON dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    #[default]
    CrLf,
    Lf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::CrLf => b"\r\n",
            LineEnding::Lf => b"\n",
        }
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub comment_mode: CommentMode,
    pub line_ending: LineEnding,
    /// Pre-scan the whole file when a window is configured
    pub validate_window: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            comment_mode: CommentMode::Inline,
            line_ending: LineEnding::CrLf,
            validate_window: true,
        }
    }
}

/// Errors that can occur while loading a configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse editor config: {0}")]
    Parse(String),

    #[error("Failed to serialize editor config: {0}")]
    Serialize(String),
}

impl EditorConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}
