//! Editor error types

use hal::StoreError;
use thiserror::Error;

/// Broad failure categories, one per class of fault a caller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Window below minimum size, a line longer than the window, or a
    /// staged write that does not fit the window
    OutOfBuffer,
    Seek,
    Read,
    Write,
    /// The file tail could not be buffered
    Allocation,
    InvalidArguments,
    /// A write was attempted while no section is open
    NoSection,
}

/// Errors that can occur while scanning or editing a file
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IniError {
    #[error("Window of {capacity} bytes is below the minimum of {min}", min = crate::MIN_WINDOW)]
    WindowTooSmall { capacity: usize },

    #[error("Line at offset {offset} does not fit in a {capacity}-byte window")]
    LineOverflow { offset: u64, capacity: usize },

    #[error("{needed} bytes do not fit in a {capacity}-byte window")]
    OutOfBuffer { needed: usize, capacity: usize },

    /// Editor used before a window was set
    #[error("No window configured")]
    NoWindow,

    #[error("Seek to offset {offset} failed: {source}")]
    Seek { offset: u64, source: StoreError },

    #[error("Read at offset {offset} failed: {source}")]
    Read { offset: u64, source: StoreError },

    #[error("Read at offset {offset} returned {read} of {expected} bytes")]
    ShortRead {
        offset: u64,
        read: usize,
        expected: usize,
    },

    #[error("Write at offset {offset} failed: {source}")]
    Write { offset: u64, source: StoreError },

    #[error("Write at offset {offset} stored {written} of {expected} bytes")]
    ShortWrite {
        offset: u64,
        written: usize,
        expected: usize,
    },

    #[error("Output sink failed: {0:?}")]
    Output(std::io::ErrorKind),

    #[error("Failed to allocate {len} bytes for the file tail")]
    Allocation { len: u64 },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(&'static str),

    #[error("No section is open")]
    NoSection,
}

impl IniError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IniError::WindowTooSmall { .. }
            | IniError::LineOverflow { .. }
            | IniError::OutOfBuffer { .. } => ErrorKind::OutOfBuffer,
            IniError::Seek { .. } => ErrorKind::Seek,
            IniError::Read { .. } | IniError::ShortRead { .. } => ErrorKind::Read,
            IniError::Write { .. } | IniError::ShortWrite { .. } | IniError::Output(_) => {
                ErrorKind::Write
            }
            IniError::Allocation { .. } => ErrorKind::Allocation,
            IniError::InvalidArguments(_) | IniError::NoWindow => ErrorKind::InvalidArguments,
            IniError::NoSection => ErrorKind::NoSection,
        }
    }
}

impl From<std::io::Error> for IniError {
    fn from(err: std::io::Error) -> Self {
        IniError::Output(err.kind())
    }
}

/// Editor result
pub type IniResult<T> = Result<T, IniError>;
