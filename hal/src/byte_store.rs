//! Byte store abstraction for storage
//!
//! Provides a minimal random-access byte API: an absolute cursor, reads and
//! writes that advance it, and a known total size. This is the only surface
//! the INI editor needs from a flash file, a host file or a RAM image.

use thiserror::Error;

/// Byte store errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Offset beyond the end of the store
    #[error("offset out of bounds")]
    OutOfBounds,
    /// I/O error (hardware failure, timeout, etc.)
    #[error("I/O error")]
    IoError,
    /// Error reported by the host filesystem
    #[error("host I/O error: {0:?}")]
    Host(std::io::ErrorKind),
    /// Device not ready
    #[error("device not ready")]
    NotReady,
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Host(err.kind())
    }
}

/// Byte store trait
///
/// Implementers provide seekable byte-level access. Reads and writes start at
/// the current position and advance it by the number of bytes transferred.
pub trait ByteStore {
    /// Total number of bytes in the store
    fn size(&self) -> u64;

    /// Current cursor position
    fn position(&self) -> u64;

    /// Move the cursor to an absolute offset
    ///
    /// # Errors
    /// Returns `StoreError::OutOfBounds` if `pos > size()`
    fn seek(&mut self, pos: u64) -> Result<(), StoreError>;

    /// Read up to `buffer.len()` bytes. Returns 0 at end of store.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StoreError>;

    /// Write `buffer` at the cursor. Writing past the end grows the store.
    fn write(&mut self, buffer: &[u8]) -> Result<usize, StoreError>;

    /// Flush any pending writes to persistent storage
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Bytes between the cursor and the end of the store
    fn remaining(&self) -> u64 {
        self.size().saturating_sub(self.position())
    }
}

impl<S: ByteStore + ?Sized> ByteStore for &mut S {
    fn size(&self) -> u64 {
        (**self).size()
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn seek(&mut self, pos: u64) -> Result<(), StoreError> {
        (**self).seek(pos)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StoreError> {
        (**self).read(buffer)
    }

    fn write(&mut self, buffer: &[u8]) -> Result<usize, StoreError> {
        (**self).write(buffer)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        (**self).flush()
    }
}

/// RAM file - an in-memory byte store
///
/// Useful for testing and for volatile configuration images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RamFile {
    bytes: Vec<u8>,
    pos: usize,
}

impl RamFile {
    /// Create an empty RAM file
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RAM file holding a copy of `bytes`
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            pos: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl ByteStore for RamFile {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn position(&self) -> u64 {
        self.pos as u64
    }

    fn seek(&mut self, pos: u64) -> Result<(), StoreError> {
        if pos > self.size() {
            return Err(StoreError::OutOfBounds);
        }
        self.pos = pos as usize;
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let available = &self.bytes[self.pos..];
        let n = available.len().min(buffer.len());
        buffer[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, buffer: &[u8]) -> Result<usize, StoreError> {
        let end = self.pos + buffer.len();
        if end > self.bytes.len() {
            self.bytes.resize(end, 0);
        }
        self.bytes[self.pos..end].copy_from_slice(buffer);
        self.pos = end;
        Ok(buffer.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramfile_creation() {
        let file = RamFile::from_bytes(b"abc".to_vec());
        assert_eq!(file.size(), 3);
        assert_eq!(file.position(), 0);
        assert_eq!(file.remaining(), 3);
    }

    #[test]
    fn test_ramfile_read_write() {
        let mut file = RamFile::from_bytes(b"hello world".to_vec());

        file.seek(6).unwrap();
        assert_eq!(file.write(b"there").unwrap(), 5);
        assert_eq!(file.as_bytes(), b"hello there");

        file.seek(0).unwrap();
        let mut buf = [0u8; 5];
        assert_eq!(file.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(file.position(), 5);
    }

    #[test]
    fn test_ramfile_short_read_at_end() {
        let mut file = RamFile::from_bytes(b"abc".to_vec());
        file.seek(1).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(file.read(&mut buf).unwrap(), 2);
        assert_eq!(file.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_ramfile_write_extends() {
        let mut file = RamFile::from_bytes(b"ab".to_vec());
        file.seek(1).unwrap();
        file.write(b"xyz").unwrap();
        assert_eq!(file.as_bytes(), b"axyz");
        assert_eq!(file.size(), 4);
    }

    #[test]
    fn test_ramfile_out_of_bounds() {
        let mut file = RamFile::from_bytes(b"abc".to_vec());

        // Seeking to the end is allowed, past it is not
        assert!(file.seek(3).is_ok());
        assert_eq!(file.seek(4), Err(StoreError::OutOfBounds));
        assert_eq!(file.seek(100), Err(StoreError::OutOfBounds));
    }

    #[test]
    fn test_borrowed_store_forwards() {
        fn append<S: ByteStore>(mut store: S, bytes: &[u8]) -> u64 {
            let end = store.size();
            store.seek(end).unwrap();
            store.write(bytes).unwrap();
            store.size()
        }

        let mut file = RamFile::from_bytes(b"abc".to_vec());
        assert_eq!(append(&mut file, b"d"), 4);
        assert_eq!(file.into_bytes(), b"abcd");
    }
}
