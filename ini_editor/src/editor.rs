//! Editor session
//!
//! [`IniEditor`] owns a byte store and borrows a caller-supplied window for
//! the lifetime of the session. Every operation returns an [`IniResult`];
//! "not found" and "end of file" are `Ok(false)` / `Ok(None)`, never errors.
//! Failures are also kept in a sticky last-error field until
//! [`IniEditor::reset_error`] is called.
//!
//! Views returned by lookups borrow the window, so the borrow checker
//! guarantees they are dropped before the next scan reloads it.

use crate::chars;
use crate::config::{CommentMode, EditorConfig};
use crate::cursor::{Cursor, Span};
use crate::error::{IniError, IniResult};
use crate::mutator::WriteOutcome;
use crate::scanner::{LineScanner, MIN_WINDOW};
use crate::value::ValueMatch;
use hal::ByteStore;

/// Streaming INI editor over a byte store
pub struct IniEditor<'w, S: ByteStore> {
    pub(crate) store: S,
    pub(crate) window: Option<&'w mut [u8]>,
    pub(crate) config: EditorConfig,
    pub(crate) cursor: Cursor,
    /// False after a failed `open_section` until a section is opened again
    pub(crate) section_open: bool,
    pub(crate) last_name: Span,
    pub(crate) last_error: Option<IniError>,
}

impl<'w, S: ByteStore> IniEditor<'w, S> {
    /// Create an editor with the default configuration and no window
    pub fn new(store: S) -> Self {
        Self::with_config(store, EditorConfig::default())
    }

    pub fn with_config(store: S, config: EditorConfig) -> Self {
        Self {
            store,
            window: None,
            config,
            cursor: Cursor::default_section(),
            section_open: true,
            last_name: Span::EMPTY,
            last_error: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_comment_mode(&mut self, mode: CommentMode) {
        self.config.comment_mode = mode;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ------------------ window ---------------

    /// Hand the editor its working window
    ///
    /// When `validate_window` is set, the whole file is scanned once and the
    /// window is rejected if any line does not fit. A rejected window is not
    /// kept; the editor is left without one. The cursor is reset to the
    /// default section either way.
    pub fn set_window(&mut self, window: &'w mut [u8]) -> IniResult<()> {
        self.window = None;
        self.cursor = Cursor::default_section();
        self.section_open = true;
        self.last_name = Span::EMPTY;

        let capacity = window.len();
        if capacity < MIN_WINDOW {
            return self.record(Err(IniError::WindowTooSmall { capacity }));
        }
        self.window = Some(window);

        if self.config.validate_window {
            let result = self.scanner().and_then(|mut scanner| scanner.validate());
            if let Err(e) = result {
                tracing::warn!(capacity, error = %e, "window rejected");
                self.window = None;
                return self.record(Err(e));
            }
        }
        Ok(())
    }

    /// Window capacity, or 0 without a window
    pub fn window_capacity(&self) -> usize {
        self.window.as_deref().map_or(0, <[u8]>::len)
    }

    pub(crate) fn window_bytes(&self) -> &[u8] {
        self.window.as_deref().unwrap_or(&[])
    }

    /// Bytes a span covers in the current window
    pub fn span_bytes(&self, span: Span) -> &[u8] {
        span.slice(self.window_bytes())
    }

    pub(crate) fn scanner(&mut self) -> IniResult<LineScanner<'_, S>> {
        let window = self.window.as_deref_mut().ok_or(IniError::NoWindow)?;
        Ok(LineScanner::new(
            &mut self.store,
            window,
            self.config.comment_mode,
        ))
    }

    // ------------------ cursor ---------------

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Resume scanning from a previously saved cursor
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.section_open = true;
    }

    // ------------------ sections -------------

    /// Open the unnamed section at the top of the file
    pub fn open_default_section(&mut self) {
        self.cursor = Cursor::default_section();
        self.section_open = true;
        self.last_name = Span::EMPTY;
    }

    /// Open a named section, or the default section for `None`
    ///
    /// Returns `Ok(false)` if no such section exists; the cursor is then at
    /// end of file and writes fail with `NoSection` until another section is
    /// opened.
    pub fn open_section(&mut self, name: Option<&str>) -> IniResult<bool> {
        let Some(name) = name else {
            self.open_default_section();
            return Ok(true);
        };
        let mut start = 0;
        let result = self.seek_section(Some(name.as_bytes()), &mut start);
        self.cursor = Cursor::at_section(start);
        self.section_open = matches!(result, Ok(true));
        result
    }

    /// Advance to the next section header after the current section's start
    pub fn next_section(&mut self) -> IniResult<bool> {
        let mut start = self.cursor.section_start;
        let result = self.seek_section(None, &mut start);
        self.cursor = Cursor::at_section(start);
        self.section_open = matches!(result, Ok(true));
        result
    }

    /// Restart value enumeration at the top of the current section
    pub fn reset_section(&mut self) {
        self.cursor.rewind();
    }

    fn seek_section(&mut self, name: Option<&[u8]>, pos: &mut u64) -> IniResult<bool> {
        let result = self
            .scanner()
            .and_then(|mut scanner| scanner.seek_section(name, pos));
        self.last_name = match &result {
            Ok(Some(span)) => *span,
            _ => Span::EMPTY,
        };
        self.record(result).map(|found| found.is_some())
    }

    // ------------------ values ---------------

    /// Look up `key` in the current section, or the next value for `None`
    ///
    /// A concrete key is searched from the top of the section every time; a
    /// wildcard continues where the previous wildcard call stopped.
    pub fn find_value(&mut self, key: Option<&str>) -> IniResult<Option<ValueMatch>> {
        let mut cursor = self.cursor;
        if key.is_some() {
            cursor.rewind();
        }
        let result = self.scanner().and_then(|mut scanner| {
            scanner.seek_value(key.map(str::as_bytes), &mut cursor.value_pos)
        });
        self.cursor = cursor;
        self.last_name = match &result {
            Ok(Some(m)) => m.key,
            _ => Span::EMPTY,
        };
        self.record(result)
    }

    /// Trimmed value bytes for `key`, borrowed from the window
    pub fn get_value(&mut self, key: Option<&str>) -> IniResult<Option<&[u8]>> {
        let found = self.find_value(key)?;
        Ok(found.map(|m| self.span_bytes(m.value)))
    }

    /// Owned value for `key`, or `default` when it is missing or the lookup fails
    ///
    /// A failure is still recorded in the last-error field.
    pub fn get_value_or(&mut self, key: Option<&str>, default: &str) -> String {
        match self.get_value(key) {
            Ok(Some(value)) => String::from_utf8_lossy(value).into_owned(),
            _ => default.to_string(),
        }
    }

    /// Copy the trimmed value for `key` into `dest` and return its length
    ///
    /// The value is copied without any terminator. A destination shorter than
    /// the value is an `OutOfBuffer` error and `dest` is left untouched.
    pub fn get_value_copy(&mut self, key: Option<&str>, dest: &mut [u8]) -> IniResult<Option<usize>> {
        let Some(m) = self.find_value(key)? else {
            return Ok(None);
        };
        let len = m.value.len;
        if len > dest.len() {
            return self.record(Err(IniError::OutOfBuffer {
                needed: len,
                capacity: dest.len(),
            }));
        }
        dest[..len].copy_from_slice(self.span_bytes(m.value));
        Ok(Some(len))
    }

    /// Write `value` for `key` in the current section, creating the key if needed
    ///
    /// `reserve` pads a grown or newly created placeholder to at least that
    /// many bytes, so later updates up to that width are done in place.
    pub fn set_value(&mut self, key: &str, value: &str, reserve: usize) -> IniResult<WriteOutcome> {
        let result = self.write_value(key, value, reserve);
        self.last_name = Span::EMPTY;
        self.record(result)
    }

    fn write_value(&mut self, key: &str, value: &str, reserve: usize) -> IniResult<WriteOutcome> {
        validate_write_args(key.as_bytes(), value.as_bytes(), self.config.comment_mode)?;
        if !self.section_open {
            return Err(IniError::NoSection);
        }
        let mut cursor = self.cursor;
        let line_ending = self.config.line_ending;
        let result = self.scanner().and_then(|mut scanner| {
            scanner.set_value(
                &mut cursor,
                key.as_bytes(),
                value.as_bytes(),
                reserve,
                line_ending,
            )
        });
        self.cursor = cursor;
        result
    }

    // ------------------ names and errors ---------------

    /// Name of the most recently matched section or key
    ///
    /// Empty after a failed lookup and for the default section.
    pub fn last_name(&self) -> &[u8] {
        self.span_bytes(self.last_name)
    }

    pub fn last_name_string(&self) -> String {
        String::from_utf8_lossy(self.last_name()).into_owned()
    }

    pub fn last_error(&self) -> Option<&IniError> {
        self.last_error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn reset_error(&mut self) {
        self.last_error = None;
    }

    pub(crate) fn record<T>(&mut self, result: IniResult<T>) -> IniResult<T> {
        if let Err(e) = &result {
            tracing::warn!(error = %e, "ini operation failed");
            self.last_error = Some(e.clone());
        }
        result
    }

    // ------------------ enumeration ---------------

    /// Names of all sections in file order
    ///
    /// The cursor is restored afterwards.
    pub fn sections(&mut self) -> IniResult<Vec<String>> {
        let saved = (self.cursor, self.section_open);
        self.open_default_section();
        let mut names = Vec::new();
        let result = loop {
            match self.next_section() {
                Ok(true) => names.push(self.last_name_string()),
                Ok(false) => break Ok(names),
                Err(e) => break Err(e),
            }
        };
        (self.cursor, self.section_open) = saved;
        result
    }

    /// All key/value pairs of the current section in file order
    ///
    /// Value enumeration is left rewound to the top of the section.
    pub fn entries(&mut self) -> IniResult<Vec<(String, String)>> {
        self.reset_section();
        let mut entries = Vec::new();
        while let Some(m) = self.find_value(None)? {
            let key = String::from_utf8_lossy(self.span_bytes(m.key)).into_owned();
            let value = String::from_utf8_lossy(self.span_bytes(m.value)).into_owned();
            entries.push((key, value));
        }
        self.reset_section();
        Ok(entries)
    }
}

/// Reject keys and values that would break the line structure on write
fn validate_write_args(key: &[u8], value: &[u8], mode: CommentMode) -> IniResult<()> {
    if key.is_empty() {
        return Err(IniError::InvalidArguments("key is empty"));
    }
    if key[0] == chars::SECTION_OPEN || chars::is_space(key[0]) {
        return Err(IniError::InvalidArguments("key starts with '[' or whitespace"));
    }
    if chars::is_space(key[key.len() - 1]) {
        return Err(IniError::InvalidArguments("key ends with whitespace"));
    }
    if key
        .iter()
        .any(|&b| chars::is_separator(b) || chars::is_line_stop(b))
    {
        return Err(IniError::InvalidArguments(
            "key contains a separator, comment or line break",
        ));
    }
    if value.iter().any(|&b| chars::is_eol(b)) {
        return Err(IniError::InvalidArguments("value contains a line break"));
    }
    if mode == CommentMode::Inline && value.iter().any(|&b| chars::is_comment(b)) {
        return Err(IniError::InvalidArguments(
            "value contains a comment character",
        ));
    }
    Ok(())
}
