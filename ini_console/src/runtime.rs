//! # Console Runtime
//!
//! Opens the target file, hands the editor a window of the configured size
//! and executes one [`Command`], writing results to the given output.

use crate::commands::Command;
use hal::{FileStore, StoreError};
use ini_editor::{EditorConfig, IniEditor, IniError, WriteOutcome};
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Window size used when none is given on the command line
pub const DEFAULT_WINDOW: usize = 256;

/// Console runtime errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Cannot open {path}: {source}")]
    Open { path: String, source: StoreError },

    #[error(transparent)]
    Ini(#[from] IniError),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// File to operate on
    pub path: PathBuf,

    /// Window size in bytes
    pub window: usize,

    /// Editor behaviour
    pub editor: EditorConfig,

    /// Debug-level logging
    pub verbose: bool,
}

impl ConsoleConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            window: DEFAULT_WINDOW,
            editor: EditorConfig::default(),
            verbose: false,
        }
    }
}

/// Runs one command against the configured file
pub fn run<W: Write>(
    config: &ConsoleConfig,
    command: &Command,
    out: &mut W,
) -> Result<(), ConsoleError> {
    let store = FileStore::open(&config.path).map_err(|source| ConsoleError::Open {
        path: config.path.display().to_string(),
        source,
    })?;

    let mut editor_config = config.editor.clone();
    if *command == Command::Check {
        editor_config.validate_window = true;
    }

    let mut window = vec![0u8; config.window];
    let mut editor = IniEditor::with_config(store, editor_config);
    editor.set_window(&mut window)?;
    tracing::debug!(path = %config.path.display(), window = config.window, "file opened");

    match command {
        Command::Get { section, key } => {
            open_section(&mut editor, section.as_deref())?;
            let value = editor
                .get_value(Some(key.as_str()))?
                .ok_or_else(|| ConsoleError::KeyNotFound(key.clone()))?;
            out.write_all(value)?;
            out.write_all(b"\n")?;
        }
        Command::Set {
            section,
            key,
            value,
            reserve,
        } => {
            open_section(&mut editor, section.as_deref())?;
            let outcome = editor.set_value(key, value, *reserve)?;
            match outcome {
                WriteOutcome::InPlace { offset, len } => {
                    tracing::info!(key = %key, offset, len, "value written in place")
                }
                WriteOutcome::Grown { offset, growth } => {
                    tracing::info!(key = %key, offset, growth, "value grown")
                }
                WriteOutcome::Inserted { offset, len } => {
                    tracing::info!(key = %key, offset, len, "value inserted")
                }
            }
        }
        Command::Sections => {
            for name in editor.sections()? {
                writeln!(out, "{}", name)?;
            }
        }
        Command::Keys { section } => {
            open_section(&mut editor, section.as_deref())?;
            for (key, value) in editor.entries()? {
                writeln!(out, "{}={}", key, value)?;
            }
        }
        Command::Dump => {
            editor.print_json(out)?;
            out.write_all(b"\n")?;
        }
        Command::Cat => {
            editor.print_ini(out)?;
        }
        Command::Check => {
            writeln!(out, "ok: every line fits a {} byte window", config.window)?;
        }
    }

    if command.is_write() {
        tracing::debug!(path = %config.path.display(), "file updated");
    }
    out.flush()?;
    Ok(())
}

fn open_section(
    editor: &mut IniEditor<'_, FileStore>,
    section: Option<&str>,
) -> Result<(), ConsoleError> {
    if editor.open_section(section)? {
        Ok(())
    } else {
        Err(ConsoleError::SectionNotFound(
            section.unwrap_or_default().to_string(),
        ))
    }
}
