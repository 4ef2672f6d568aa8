//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the storage abstraction the INI editor runs against.
//!
//! ## Philosophy
//!
//! **Storage must be fully abstracted and swappable.**
//!
//! The editor never assumes a filesystem. A flash partition, a host file and a
//! RAM image all look the same: a seekable run of bytes with a known size.
//!
//! ## Design Principles
//!
//! 1. **Minimal surface**: seek, read, write, size, position
//! 2. **Trait-based**: All storage operations go through [`ByteStore`]
//! 3. **Testable**: [`RamFile`] and [`FailingStore`] stand in for hardware

pub mod byte_store;
pub mod failing_store;
pub mod file_store;

pub use byte_store::{ByteStore, RamFile, StoreError};
pub use failing_store::{FailingStore, FailurePolicy, OpCounts};
pub use file_store::FileStore;
