//! Section locator
//!
//! Walks forward line by line looking for a `[name]` header. A wildcard
//! search (no name) stops at the first header, which is how sections are
//! enumerated in file order.

use crate::chars;
use crate::cursor::Span;
use crate::error::IniResult;
use crate::scanner::{LineRecord, LineScanner};
use hal::ByteStore;

impl<S: ByteStore> LineScanner<'_, S> {
    /// Find the next section header named `name` (or any header) at or after `pos`
    ///
    /// On success `pos` is the first byte of the section body and the
    /// returned span is the header name in the window. On end of file `pos`
    /// is at end of file and `Ok(None)` is returned.
    pub fn seek_section(
        &mut self,
        name: Option<&[u8]>,
        pos: &mut u64,
    ) -> IniResult<Option<Span>> {
        while let Some(line) = self.read_line(pos)? {
            let Some(span) = section_name(self.window, &line) else {
                continue;
            };
            let found = span.slice(self.window);
            if name.map_or(true, |wanted| wanted == found) {
                tracing::debug!(
                    section = %String::from_utf8_lossy(found),
                    body = *pos,
                    "section found"
                );
                return Ok(Some(span));
            }
        }
        tracing::debug!(
            section = ?name.map(String::from_utf8_lossy),
            "section not found before end of file"
        );
        Ok(None)
    }
}

/// Name span of a section header line, or `None` if the line is not a header
///
/// The name is the text between `[` and the first `]` on the line, with
/// surrounding whitespace removed. A `[` line without a closing bracket is
/// not a header.
pub fn section_name(window: &[u8], line: &LineRecord) -> Option<Span> {
    if !line.is_section_start(window) {
        return None;
    }
    let name_start = chars::skip(window, line.data_begin + 1, line.data_end, chars::is_space);
    let close = chars::find(window, name_start, line.data_end, |b| {
        b == chars::SECTION_CLOSE
    })?;
    let name_end = chars::trim_end(window, name_start, close);
    Some(Span::between(name_start, name_end))
}
