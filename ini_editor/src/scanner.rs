//! Line scanner
//!
//! Loads one window of bytes at a time and cuts exactly one logical line out
//! of it. Nothing outside the window is ever held: a line that does not fit
//! in the window is an error, not something to reassemble.
//!
//! The section locator, value locator and value mutator are all built on
//! [`LineScanner`] and live in their own modules as further `impl` blocks.

use crate::chars;
use crate::config::CommentMode;
use crate::cursor::Span;
use crate::error::{IniError, IniResult};
use hal::ByteStore;

/// Smallest usable window: the shortest complete line is `a=x\n`
pub const MIN_WINDOW: usize = 4;

/// Boundaries of one scanned line, as offsets into the window
///
/// Valid only until the next window load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRecord {
    /// First byte after leading whitespace
    pub data_begin: usize,
    /// End of the logical content (comment start or end of line)
    pub data_end: usize,
    /// First byte after the end-of-line run
    pub line_end: usize,
}

impl LineRecord {
    pub fn data(&self) -> Span {
        Span::between(self.data_begin, self.data_end)
    }

    /// First content byte, if the line has any content
    pub fn lead_byte(&self, window: &[u8]) -> Option<u8> {
        if self.data_begin < self.data_end {
            Some(window[self.data_begin])
        } else {
            None
        }
    }

    /// Returns true if the line opens a section (`[` is its first content byte)
    pub fn is_section_start(&self, window: &[u8]) -> bool {
        self.lead_byte(window) == Some(chars::SECTION_OPEN)
    }
}

/// Scanner over a byte store through a caller-owned window
pub struct LineScanner<'a, S: ByteStore> {
    pub(crate) store: &'a mut S,
    pub(crate) window: &'a mut [u8],
    pub(crate) mode: CommentMode,
}

impl<'a, S: ByteStore> LineScanner<'a, S> {
    pub fn new(store: &'a mut S, window: &'a mut [u8], mode: CommentMode) -> Self {
        Self {
            store,
            window,
            mode,
        }
    }

    pub fn capacity(&self) -> usize {
        self.window.len()
    }

    pub fn window(&self) -> &[u8] {
        self.window
    }

    /// Read the line starting at `pos` and advance `pos` to the next line
    ///
    /// Returns `Ok(None)` at end of file; `pos` is left unchanged then.
    /// `pos` never moves past the end of the store.
    ///
    /// # Errors
    /// `WindowTooSmall` before any I/O if the window is below [`MIN_WINDOW`].
    /// `LineOverflow` if no end of line is found inside a full window.
    pub fn read_line(&mut self, pos: &mut u64) -> IniResult<Option<LineRecord>> {
        let capacity = self.window.len();
        if capacity < MIN_WINDOW {
            return Err(IniError::WindowTooSmall { capacity });
        }

        let start = *pos;
        self.seek_to(start)?;
        let loaded = self
            .store
            .read(self.window)
            .map_err(|source| IniError::Read {
                offset: start,
                source,
            })?;
        if loaded == 0 {
            tracing::trace!(offset = start, "end of file");
            return Ok(None);
        }

        // A short load means the end of file is inside the window: close the
        // last line with a synthetic line feed so it needs no special casing.
        let end = if loaded < capacity {
            self.window[loaded] = b'\n';
            loaded + 1
        } else {
            loaded
        };
        let bytes = &self.window[..end];

        let data_begin = chars::skip(bytes, 0, end, chars::is_space);
        let data_end = if data_begin < end && !chars::is_line_stop(bytes[data_begin]) {
            let mode = self.mode;
            chars::find(bytes, data_begin + 1, end, |b| mode.ends_content(b)).unwrap_or(end)
        } else {
            data_begin
        };

        let line_end = match chars::find(bytes, data_end, end, chars::is_eol) {
            Some(eol) => chars::skip(bytes, eol, end, chars::is_eol),
            // The line fills the window exactly and ends at end of file
            None if start + loaded as u64 >= self.store.size() => end,
            None => {
                tracing::debug!(offset = start, capacity, "line does not fit in window");
                return Err(IniError::LineOverflow {
                    offset: start,
                    capacity,
                });
            }
        };

        *pos = (start + line_end as u64).min(self.store.size());
        tracing::trace!(
            offset = start,
            next = *pos,
            data = %String::from_utf8_lossy(&bytes[data_begin..data_end]),
            "line"
        );

        Ok(Some(LineRecord {
            data_begin,
            data_end,
            line_end,
        }))
    }

    /// Scan every line of the file once
    ///
    /// Succeeds only if every line fits the window and the scan reaches end
    /// of file.
    pub fn validate(&mut self) -> IniResult<()> {
        let mut pos = 0;
        let mut lines = 0usize;
        while self.read_line(&mut pos)?.is_some() {
            lines += 1;
        }
        tracing::debug!(lines, size = self.store.size(), "window validated");
        Ok(())
    }

    pub(crate) fn seek_to(&mut self, offset: u64) -> IniResult<()> {
        self.store
            .seek(offset)
            .map_err(|source| IniError::Seek { offset, source })
    }

    /// Fill `buffer` from `offset`; a short read is an error
    pub(crate) fn read_exact_at(&mut self, offset: u64, buffer: &mut [u8]) -> IniResult<()> {
        self.seek_to(offset)?;
        let mut filled = 0;
        while filled < buffer.len() {
            let n = self
                .store
                .read(&mut buffer[filled..])
                .map_err(|source| IniError::Read {
                    offset: offset + filled as u64,
                    source,
                })?;
            if n == 0 {
                return Err(IniError::ShortRead {
                    offset,
                    read: filled,
                    expected: buffer.len(),
                });
            }
            filled += n;
        }
        Ok(())
    }

    /// Write all of `bytes` at the current store position
    pub(crate) fn write_all(&mut self, bytes: &[u8]) -> IniResult<()> {
        let offset = self.store.position();
        let written = self
            .store
            .write(bytes)
            .map_err(|source| IniError::Write { offset, source })?;
        if written != bytes.len() {
            return Err(IniError::ShortWrite {
                offset,
                written,
                expected: bytes.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> IniResult<()> {
        let offset = self.store.position();
        self.store
            .flush()
            .map_err(|source| IniError::Write { offset, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use hal::{FailingStore, FailurePolicy, RamFile};

    fn scan_all(text: &[u8], capacity: usize, mode: CommentMode) -> IniResult<Vec<(String, u64)>> {
        let mut file = RamFile::from_bytes(text.to_vec());
        let mut window = vec![0u8; capacity];
        let mut scanner = LineScanner::new(&mut file, &mut window, mode);
        let mut pos = 0;
        let mut lines = Vec::new();
        while let Some(line) = scanner.read_line(&mut pos)? {
            let data = line.data().slice(scanner.window());
            lines.push((String::from_utf8_lossy(data).into_owned(), pos));
        }
        Ok(lines)
    }

    #[test]
    fn test_read_lines_crlf() {
        let lines = scan_all(b"[a]\r\nx=1\r\n", 32, CommentMode::Inline).unwrap();
        assert_eq!(
            lines,
            vec![("[a]".to_string(), 5), ("x=1".to_string(), 10)]
        );
    }

    #[test]
    fn test_blank_lines_collapse() {
        let lines = scan_all(b"a=1\n\n\r\n\nb=2\n", 32, CommentMode::Inline).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], ("a=1".to_string(), 8));
        assert_eq!(lines[1].0, "b=2");
    }

    #[test]
    fn test_last_line_without_terminator() {
        let lines = scan_all(b"a=1\nb=2", 32, CommentMode::Inline).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], ("b=2".to_string(), 7));
    }

    #[test]
    fn test_leading_whitespace_skipped() {
        let lines = scan_all(b" \t key = v\n", 32, CommentMode::Inline).unwrap();
        assert_eq!(lines[0].0, "key = v");
    }

    #[test]
    fn test_inline_comment_ends_content() {
        let lines = scan_all(b"x=1 ; note\n; whole line\n", 32, CommentMode::Inline).unwrap();
        assert_eq!(lines[0].0, "x=1 ");
        assert_eq!(lines[1].0, "");
    }

    #[test]
    fn test_full_line_comment_mode() {
        let lines = scan_all(b"url=http://h/#frag\n# note\n", 32, CommentMode::FullLine).unwrap();
        assert_eq!(lines[0].0, "url=http://h/#frag");
        assert_eq!(lines[1].0, "");
    }

    #[test]
    fn test_line_overflow() {
        let err = scan_all(b"a=1\nkey=a-very-long-value\nz=1\n", 8, CommentMode::Inline)
            .unwrap_err();
        assert_eq!(
            err,
            IniError::LineOverflow {
                offset: 4,
                capacity: 8
            }
        );
        assert_eq!(err.kind(), ErrorKind::OutOfBuffer);
    }

    #[test]
    fn test_line_filling_window_at_eof() {
        // Eight bytes, no terminator, eight-byte window
        let lines = scan_all(b"key=1234", 8, CommentMode::Inline).unwrap();
        assert_eq!(lines, vec![("key=1234".to_string(), 8)]);
    }

    #[test]
    fn test_window_too_small_no_io() {
        let file = RamFile::from_bytes(b"a=1\n".to_vec());
        let mut file = FailingStore::new(file, FailurePolicy::Never);
        let mut window = [0u8; 3];
        let mut scanner = LineScanner::new(&mut file, &mut window, CommentMode::Inline);
        let mut pos = 0;

        let err = scanner.read_line(&mut pos).unwrap_err();
        assert_eq!(err, IniError::WindowTooSmall { capacity: 3 });
        assert_eq!(file.counts().total(), 0);
    }

    #[test]
    fn test_empty_file_is_eof() {
        let lines = scan_all(b"", 8, CommentMode::Inline).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_read_failure() {
        let file = RamFile::from_bytes(b"a=1\n".to_vec());
        let mut file = FailingStore::new(file, FailurePolicy::AfterReads(0));
        let mut window = [0u8; 16];
        let mut scanner = LineScanner::new(&mut file, &mut window, CommentMode::Inline);
        let mut pos = 0;

        let err = scanner.read_line(&mut pos).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Read);
        assert_eq!(pos, 0);
    }

    #[test]
    fn test_validate() {
        let mut file = RamFile::from_bytes(b"[a]\nx=1\n[b]\ny=22222222222\n".to_vec());
        let mut window = [0u8; 32];
        assert!(LineScanner::new(&mut file, &mut window, CommentMode::Inline)
            .validate()
            .is_ok());

        let mut window = [0u8; 8];
        let err = LineScanner::new(&mut file, &mut window, CommentMode::Inline)
            .validate()
            .unwrap_err();
        assert!(matches!(err, IniError::LineOverflow { offset: 12, .. }));
    }

    #[test]
    fn test_lead_byte_and_section_start() {
        let window = b"  [a]\n";
        let line = LineRecord {
            data_begin: 2,
            data_end: 5,
            line_end: 6,
        };
        assert_eq!(line.lead_byte(window), Some(b'['));
        assert!(line.is_section_start(window));

        let blank = LineRecord {
            data_begin: 0,
            data_end: 0,
            line_end: 1,
        };
        assert_eq!(blank.lead_byte(b"\n"), None);
    }
}
