//! Value mutator
//!
//! Writes a value back into the file with as little disruption as possible:
//!
//! 1. The new value fits the existing placeholder: overwrite it in place and
//!    pad with spaces. File length is unchanged.
//! 2. The value outgrows its placeholder: buffer the file tail after the
//!    placeholder, write the wider value, write the tail back.
//! 3. The key is missing: append a new line at the end of the section's
//!    lines (just before the next header, or at end of file) with the same
//!    tail-preserving rewrite.
//!
//! All staging goes through the window, so neither the value nor the
//! reserved padding may exceed the window capacity. A grown line must also
//! still fit the window, or it could never be scanned again. A failure after the new
//! bytes are written but before the tail is restored leaves the file
//! inconsistent; callers needing atomicity must work on a scratch copy.

use crate::chars;
use crate::config::LineEnding;
use crate::cursor::Cursor;
use crate::error::{IniError, IniResult};
use crate::scanner::{LineScanner, MIN_WINDOW};
use crate::value::Placeholder;
use hal::ByteStore;

/// How a `set_value` call changed the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Existing placeholder overwritten, file length unchanged
    InPlace { offset: u64, len: usize },
    /// Placeholder widened; the file grew by `growth` bytes
    Grown { offset: u64, growth: u64 },
    /// New line inserted at `offset`
    Inserted { offset: u64, len: usize },
}

impl<S: ByteStore> LineScanner<'_, S> {
    /// Write `value` for `key` in the section `cursor` points at
    ///
    /// `reserve` widens a grown or inserted placeholder to at least that many
    /// bytes so later updates up to that width stay in place.
    /// The cursor's value enumeration is rewound afterwards since offsets
    /// past the edit may have moved.
    pub fn set_value(
        &mut self,
        cursor: &mut Cursor,
        key: &[u8],
        value: &[u8],
        reserve: usize,
        line_ending: LineEnding,
    ) -> IniResult<WriteOutcome> {
        let capacity = self.capacity();
        if capacity < MIN_WINDOW {
            return Err(IniError::WindowTooSmall { capacity });
        }
        let widest = value.len().max(reserve);
        if widest > capacity {
            return Err(IniError::OutOfBuffer {
                needed: widest,
                capacity,
            });
        }

        cursor.rewind();
        let found = self.seek_value(Some(key), &mut cursor.value_pos)?;
        let outcome = match found {
            Some(m) if value.len() <= m.placeholder.len => {
                self.overwrite_in_place(m.placeholder, value)?
            }
            Some(m) => {
                let needed = m.line_len + (widest - m.placeholder.len);
                if needed > capacity {
                    tracing::debug!(
                        offset = m.line_start,
                        needed,
                        capacity,
                        "grown line would not fit window"
                    );
                    return Err(IniError::OutOfBuffer { needed, capacity });
                }
                self.grow_placeholder(m.placeholder, value, widest)?
            }
            None => self.insert_line(cursor.section_start, key, value, reserve, line_ending)?,
        };
        cursor.rewind();
        Ok(outcome)
    }

    fn overwrite_in_place(
        &mut self,
        placeholder: Placeholder,
        value: &[u8],
    ) -> IniResult<WriteOutcome> {
        tracing::debug!(
            offset = placeholder.offset,
            len = placeholder.len,
            "value fits placeholder"
        );
        self.stage(value, placeholder.len);
        self.seek_to(placeholder.offset)?;
        let len = placeholder.len;
        self.write_window(len)?;
        self.flush()?;
        Ok(WriteOutcome::InPlace {
            offset: placeholder.offset,
            len,
        })
    }

    fn grow_placeholder(
        &mut self,
        placeholder: Placeholder,
        value: &[u8],
        width: usize,
    ) -> IniResult<WriteOutcome> {
        tracing::debug!(
            offset = placeholder.offset,
            old_len = placeholder.len,
            new_len = width,
            "value outgrows placeholder"
        );
        self.stage(value, width);
        self.rewrite_with_tail(placeholder.offset, placeholder.end(), width)?;
        Ok(WriteOutcome::Grown {
            offset: placeholder.offset,
            growth: (width - placeholder.len) as u64,
        })
    }

    fn insert_line(
        &mut self,
        section_start: u64,
        key: &[u8],
        value: &[u8],
        reserve: usize,
        line_ending: LineEnding,
    ) -> IniResult<WriteOutcome> {
        let at = self.section_insert_point(section_start)?;
        let capacity = self.capacity();
        let eol = line_ending.as_bytes();

        // Appending after a last line that has no terminator must not merge
        // the new line into it.
        let prefix: &[u8] = if at > 0 && at == self.store.size() && !self.ends_with_eol(at)? {
            eol
        } else {
            b""
        };

        let fixed = prefix.len() + key.len() + 1 + eol.len();
        let padded = fixed + value.len().max(reserve);
        let len = if padded <= capacity {
            padded
        } else {
            fixed + value.len()
        };
        if len > capacity {
            return Err(IniError::OutOfBuffer {
                needed: len,
                capacity,
            });
        }

        tracing::debug!(
            offset = at,
            key = %String::from_utf8_lossy(key),
            len,
            "inserting new value line"
        );

        self.window[..len].fill(b' ');
        let mut cur = 0;
        for part in [prefix, key, &[chars::WRITE_SEPARATOR][..], value] {
            self.window[cur..cur + part.len()].copy_from_slice(part);
            cur += part.len();
        }
        self.window[len - eol.len()..len].copy_from_slice(eol);

        self.rewrite_with_tail(at, at, len)?;
        Ok(WriteOutcome::Inserted { offset: at, len })
    }

    /// Start of the next section header after `section_start`, or end of file
    fn section_insert_point(&mut self, section_start: u64) -> IniResult<u64> {
        let mut pos = section_start;
        loop {
            let line_start = pos;
            match self.read_line(&mut pos)? {
                None => return Ok(line_start),
                Some(line) if line.is_section_start(self.window) => return Ok(line_start),
                Some(_) => {}
            }
        }
    }

    fn ends_with_eol(&mut self, size: u64) -> IniResult<bool> {
        let mut last = [0u8; 1];
        self.read_exact_at(size - 1, &mut last)?;
        Ok(chars::is_eol(last[0]))
    }

    /// Copy `value` to the front of the window and pad it with spaces to `width`
    fn stage(&mut self, value: &[u8], width: usize) {
        self.window[..width].fill(b' ');
        self.window[..value.len()].copy_from_slice(value);
    }

    fn write_window(&mut self, len: usize) -> IniResult<()> {
        let (store, window) = (&mut *self.store, &*self.window);
        let offset = store.position();
        let written = store
            .write(&window[..len])
            .map_err(|source| IniError::Write { offset, source })?;
        if written != len {
            return Err(IniError::ShortWrite {
                offset,
                written,
                expected: len,
            });
        }
        Ok(())
    }

    /// Replace `at..tail_start` with the first `staged` window bytes, keeping
    /// everything from `tail_start` to end of file behind them
    fn rewrite_with_tail(&mut self, at: u64, tail_start: u64, staged: usize) -> IniResult<()> {
        let tail_len = self.store.size().saturating_sub(tail_start);
        let tail_bytes =
            usize::try_from(tail_len).map_err(|_| IniError::Allocation { len: tail_len })?;

        let mut tail = Vec::new();
        tail.try_reserve_exact(tail_bytes)
            .map_err(|_| IniError::Allocation { len: tail_len })?;
        tail.resize(tail_bytes, 0);

        if tail_bytes > 0 {
            tracing::trace!(offset = tail_start, len = tail_bytes, "buffering file tail");
            self.read_exact_at(tail_start, &mut tail)?;
        }

        self.seek_to(at)?;
        self.write_window(staged)?;
        if !tail.is_empty() {
            self.write_all(&tail)?;
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommentMode;
    use crate::error::ErrorKind;
    use hal::{FailingStore, FailurePolicy, RamFile};

    const FILE: &[u8] = b"[a]\r\nx=1\r\n[b]\r\ny=2\r\n";

    fn set(
        text: &[u8],
        section_start: u64,
        key: &str,
        value: &str,
        reserve: usize,
        capacity: usize,
    ) -> (IniResult<WriteOutcome>, Vec<u8>) {
        let mut file = RamFile::from_bytes(text.to_vec());
        let mut window = vec![0u8; capacity];
        let mut cursor = Cursor::at_section(section_start);
        let result = LineScanner::new(&mut file, &mut window, CommentMode::Inline).set_value(
            &mut cursor,
            key.as_bytes(),
            value.as_bytes(),
            reserve,
            LineEnding::CrLf,
        );
        (result, file.into_bytes())
    }

    #[test]
    fn test_in_place_pads_with_spaces() {
        let (result, bytes) = set(b"x=12345\r\n", 0, "x", "9", 0, 32);
        assert_eq!(result.unwrap(), WriteOutcome::InPlace { offset: 2, len: 5 });
        assert_eq!(bytes, b"x=9    \r\n");
    }

    #[test]
    fn test_grow_placeholder() {
        let (result, bytes) = set(FILE, 5, "x", "12345", 0, 32);
        assert_eq!(result.unwrap(), WriteOutcome::Grown { offset: 7, growth: 4 });
        assert_eq!(bytes, b"[a]\r\nx=12345\r\n[b]\r\ny=2\r\n");
    }

    #[test]
    fn test_grow_with_reserve() {
        let (result, bytes) = set(FILE, 5, "x", "12", 6, 32);
        assert_eq!(result.unwrap(), WriteOutcome::Grown { offset: 7, growth: 5 });
        assert_eq!(bytes, b"[a]\r\nx=12    \r\n[b]\r\ny=2\r\n");
    }

    #[test]
    fn test_insert_before_next_section() {
        let (result, bytes) = set(FILE, 5, "z", "9", 0, 32);
        assert_eq!(result.unwrap(), WriteOutcome::Inserted { offset: 10, len: 5 });
        assert_eq!(bytes, b"[a]\r\nx=1\r\nz=9\r\n[b]\r\ny=2\r\n");
    }

    #[test]
    fn test_insert_at_end_of_file() {
        let (result, bytes) = set(FILE, 15, "w", "3", 4, 32);
        assert_eq!(result.unwrap(), WriteOutcome::Inserted { offset: 20, len: 8 });
        assert_eq!(bytes, b"[a]\r\nx=1\r\n[b]\r\ny=2\r\nw=3   \r\n");
    }

    #[test]
    fn test_insert_after_unterminated_last_line() {
        let (result, bytes) = set(b"x=1", 0, "y", "2", 0, 32);
        assert!(result.is_ok());
        assert_eq!(bytes, b"x=1\r\ny=2\r\n");
    }

    #[test]
    fn test_insert_into_empty_file() {
        let (result, bytes) = set(b"", 0, "k", "v", 0, 8);
        assert_eq!(result.unwrap(), WriteOutcome::Inserted { offset: 0, len: 5 });
        assert_eq!(bytes, b"k=v\r\n");
    }

    #[test]
    fn test_insert_falls_back_to_exact_size() {
        // "key=" + reserve 8 + "\r\n" = 14 > 12, exact "key=abc\r\n" = 9 fits
        let (result, bytes) = set(b"", 0, "key", "abc", 8, 12);
        assert_eq!(result.unwrap(), WriteOutcome::Inserted { offset: 0, len: 9 });
        assert_eq!(bytes, b"key=abc\r\n");
    }

    #[test]
    fn test_insert_too_large_for_window() {
        let (result, bytes) = set(b"", 0, "longkey", "abc", 0, 8);
        assert_eq!(
            result.unwrap_err(),
            IniError::OutOfBuffer {
                needed: 13,
                capacity: 8
            }
        );
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_value_larger_than_window() {
        let (result, bytes) = set(FILE, 5, "x", "0123456789", 0, 8);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::OutOfBuffer);
        assert_eq!(bytes, FILE);

        let (result, _) = set(FILE, 5, "x", "1", 9, 8);
        assert_eq!(
            result.unwrap_err(),
            IniError::OutOfBuffer {
                needed: 9,
                capacity: 8
            }
        );
    }

    #[test]
    fn test_grown_line_must_fit_window() {
        let (result, bytes) = set(b"k=1\n", 0, "k", "1234567", 0, 8);
        assert_eq!(
            result.unwrap_err(),
            IniError::OutOfBuffer {
                needed: 10,
                capacity: 8
            }
        );
        assert_eq!(bytes, b"k=1\n");

        // Exactly filling the window is still readable
        let (result, bytes) = set(b"k=1\n", 0, "k", "12345", 0, 8);
        assert_eq!(result.unwrap(), WriteOutcome::Grown { offset: 2, growth: 4 });
        assert_eq!(bytes, b"k=12345\n");
    }

    #[test]
    fn test_grown_unterminated_line_fits_window() {
        let (result, bytes) = set(b"k=1", 0, "k", "123456", 0, 8);
        assert_eq!(result.unwrap(), WriteOutcome::Grown { offset: 2, growth: 5 });
        assert_eq!(bytes, b"k=123456");

        let (result, _) = set(b"k=1", 0, "k", "1", 7, 8);
        assert_eq!(
            result.unwrap_err(),
            IniError::OutOfBuffer {
                needed: 9,
                capacity: 8
            }
        );
    }

    #[test]
    fn test_write_failure_reported() {
        let file = RamFile::from_bytes(FILE.to_vec());
        let mut file = FailingStore::new(file, FailurePolicy::AfterWrites(0));
        let mut window = [0u8; 32];
        let mut cursor = Cursor::at_section(5);
        let err = LineScanner::new(&mut file, &mut window, CommentMode::Inline)
            .set_value(&mut cursor, b"x", b"7", 0, LineEnding::CrLf)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        assert_eq!(file.inner().as_bytes(), FILE);
    }

    #[test]
    fn test_short_write_reported() {
        let file = RamFile::from_bytes(FILE.to_vec());
        let mut file = FailingStore::new(file, FailurePolicy::ShortWrites);
        let mut window = [0u8; 32];
        let mut cursor = Cursor::at_section(5);
        let err = LineScanner::new(&mut file, &mut window, CommentMode::Inline)
            .set_value(&mut cursor, b"x", b"12345", 0, LineEnding::CrLf)
            .unwrap_err();
        assert!(matches!(
            err,
            IniError::ShortWrite {
                offset: 7,
                written: 2,
                expected: 5
            }
        ));
    }

    #[test]
    fn test_cursor_rewound_after_write() {
        let mut file = RamFile::from_bytes(FILE.to_vec());
        let mut window = [0u8; 32];
        let mut cursor = Cursor {
            section_start: 5,
            value_pos: 10,
        };
        LineScanner::new(&mut file, &mut window, CommentMode::Inline)
            .set_value(&mut cursor, b"x", b"5", 0, LineEnding::CrLf)
            .unwrap();
        assert_eq!(cursor, Cursor::at_section(5));
    }
}
