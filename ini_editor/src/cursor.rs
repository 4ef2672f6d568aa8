//! Cursor and position model
//!
//! A [`Cursor`] holds the two file offsets every scan reads and advances. A
//! [`Span`] is an (offset, length) view into the window buffer; it is only
//! meaningful until the next window load overwrites the buffer.

/// (offset, length) view into the window buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub const EMPTY: Span = Span { start: 0, len: 0 };

    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Span covering `start..end`
    pub const fn between(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end - start,
        }
    }

    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes this span covers in `window`. Out-of-range spans yield an empty slice.
    pub fn slice<'a>(&self, window: &'a [u8]) -> &'a [u8] {
        window.get(self.start..self.end()).unwrap_or(&[])
    }
}

/// Forward scan positions within the file
///
/// `section_start` is the first byte of the open section's body (0 for the
/// default section). `value_pos` is where the next wildcard value lookup
/// resumes. While iterating one section, `section_start <= value_pos`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub section_start: u64,
    pub value_pos: u64,
}

impl Cursor {
    /// Cursor positioned on the unnamed section at the top of the file
    pub const fn default_section() -> Self {
        Self {
            section_start: 0,
            value_pos: 0,
        }
    }

    /// Cursor positioned on a section body starting at `section_start`
    pub const fn at_section(section_start: u64) -> Self {
        Self {
            section_start,
            value_pos: section_start,
        }
    }

    /// Restart value enumeration from the top of the current section
    pub fn rewind(&mut self) {
        self.value_pos = self.section_start;
    }
}
