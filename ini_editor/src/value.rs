//! Value locator
//!
//! Finds `key<sep>value` lines inside the current section. Besides the
//! trimmed key and value views it reports the placeholder: the raw file
//! range behind the value, padding included, which is what the mutator
//! overwrites.

use crate::chars;
use crate::cursor::Span;
use crate::error::IniResult;
use crate::scanner::LineScanner;
use hal::ByteStore;

/// Raw file byte range holding a value's text
///
/// Starts right after the separator and ends where the line's content ends
/// (comment or end of line). Stale after any write that changes the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub offset: u64,
    pub len: usize,
}

impl Placeholder {
    pub fn end(&self) -> u64 {
        self.offset + self.len as u64
    }
}

/// One matched key/value line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueMatch {
    /// Key with trailing whitespace removed, in window coordinates
    pub key: Span,
    /// Value with surrounding whitespace removed, in window coordinates
    pub value: Span,
    pub placeholder: Placeholder,
    /// File offset of the line holding the value
    pub line_start: u64,
    /// Bytes the line needs in the window: content through its first
    /// end-of-line byte, or to end of file for an unterminated last line
    pub line_len: usize,
}

impl<S: ByteStore> LineScanner<'_, S> {
    /// Find the next value line matching `key` (or any value line) at or after `pos`
    ///
    /// Lines without a separator are skipped. A section header ends the
    /// search: `Ok(None)` is returned and `pos` is left on the header so that
    /// repeated wildcard calls keep reporting the end of the section.
    pub fn seek_value(
        &mut self,
        key: Option<&[u8]>,
        pos: &mut u64,
    ) -> IniResult<Option<ValueMatch>> {
        loop {
            let line_start = *pos;
            let Some(line) = self.read_line(pos)? else {
                tracing::debug!(
                    key = ?key.map(String::from_utf8_lossy),
                    "value not found before end of file"
                );
                return Ok(None);
            };
            let window: &[u8] = self.window;

            if line.is_section_start(window) {
                *pos = line_start;
                tracing::debug!(
                    key = ?key.map(String::from_utf8_lossy),
                    offset = line_start,
                    "section end reached"
                );
                return Ok(None);
            }

            let (begin, end) = (line.data_begin, line.data_end);
            let Some(sep) = chars::find(window, begin, end, chars::is_separator) else {
                continue;
            };

            let key_span = Span::between(begin, chars::trim_end(window, begin, sep));
            if let Some(wanted) = key {
                if wanted != key_span.slice(window) {
                    continue;
                }
            }

            let raw_start = sep + 1;
            let placeholder = Placeholder {
                offset: line_start + raw_start as u64,
                len: line.data_end - raw_start,
            };
            let value_start = chars::skip(window, raw_start, line.data_end, chars::is_space);
            let value_end = chars::trim_end(window, value_start, line.data_end);
            let value = Span::between(value_start, value_end);
            let first_eol = chars::find(window, line.data_end, line.line_end, chars::is_eol)
                .map_or(line.line_end, |eol| eol + 1);
            let line_len = first_eol.min((*pos - line_start) as usize);

            tracing::debug!(
                key = %String::from_utf8_lossy(key_span.slice(window)),
                value = %String::from_utf8_lossy(value.slice(window)),
                placeholder = placeholder.offset,
                placeholder_len = placeholder.len,
                "value found"
            );
            return Ok(Some(ValueMatch {
                key: key_span,
                value,
                placeholder,
                line_start,
                line_len,
            }));
        }
    }
}
