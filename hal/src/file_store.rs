//! # File Store
//!
//! A ByteStore backed by a host file. Size and position are tracked locally
//! so that `size()` and `position()` never touch the filesystem.

use crate::byte_store::{ByteStore, StoreError};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Host file opened for random-access reading and writing
pub struct FileStore {
    file: File,
    size: u64,
    pos: u64,
}

impl FileStore {
    /// Open an existing file for reading and writing
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::from_file(file)
    }

    /// Create (or truncate) a file and open it for reading and writing
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::from_file(file)
    }

    /// Wrap an already opened file. The cursor starts at offset 0.
    pub fn from_file(mut file: File) -> Result<Self, StoreError> {
        let size = file.metadata()?.len();
        file.seek(SeekFrom::Start(0))?;
        Ok(Self { file, size, pos: 0 })
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl ByteStore for FileStore {
    fn size(&self) -> u64 {
        self.size
    }

    fn position(&self) -> u64 {
        self.pos
    }

    fn seek(&mut self, pos: u64) -> Result<(), StoreError> {
        if pos > self.size {
            return Err(StoreError::OutOfBounds);
        }
        self.pos = self.file.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let mut filled = 0;
        while filled < buffer.len() {
            match self.file.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.pos += filled as u64;
        Ok(filled)
    }

    fn write(&mut self, buffer: &[u8]) -> Result<usize, StoreError> {
        self.file.write_all(buffer)?;
        self.pos += buffer.len() as u64;
        self.size = self.size.max(self.pos);
        Ok(buffer.len())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.ini");

        let mut store = FileStore::create(&path).unwrap();
        assert_eq!(store.size(), 0);
        store.write(b"[a]\nx=1\n").unwrap();
        assert_eq!(store.size(), 8);
        store.flush().unwrap();
        drop(store);

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.size(), 8);
        store.seek(4).unwrap();
        let mut buf = [0u8; 16];
        let n = store.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"x=1\n");
        assert_eq!(store.position(), 8);
    }

    #[test]
    fn test_file_store_overwrite_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.ini");
        std::fs::write(&path, b"x=1\n").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        store.seek(2).unwrap();
        store.write(b"9").unwrap();
        assert_eq!(store.size(), 4);
        drop(store);

        assert_eq!(std::fs::read(&path).unwrap(), b"x=9\n");
    }

    #[test]
    fn test_file_store_seek_past_end() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::create(dir.path().join("empty.ini")).unwrap();
        assert_eq!(store.seek(1), Err(StoreError::OutOfBounds));
    }

    #[test]
    fn test_file_store_open_missing() {
        let dir = tempdir().unwrap();
        let result = FileStore::open(dir.path().join("missing.ini"));
        assert!(matches!(
            result,
            Err(StoreError::Host(std::io::ErrorKind::NotFound))
        ));
    }
}
