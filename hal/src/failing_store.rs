//! # Failing Store
//!
//! A ByteStore wrapper that can simulate failures for testing mutation paths.
//! Useful for exercising partial rewrites without a real faulty flash chip.

use crate::byte_store::{ByteStore, StoreError};

/// Policy for when failures should occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Fail every write after N successful writes
    AfterWrites(usize),
    /// Fail every read after N successful reads
    AfterReads(usize),
    /// Fail seeks to the given offset
    OnSeek(u64),
    /// Accept writes but report only half of the bytes as written
    ShortWrites,
}

/// Counters for operations that reached the inner store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub seeks: usize,
    pub reads: usize,
    pub writes: usize,
}

impl OpCounts {
    pub fn total(&self) -> usize {
        self.seeks + self.reads + self.writes
    }
}

/// Wrapper around a ByteStore that can simulate failures
pub struct FailingStore<S: ByteStore> {
    inner: S,
    policy: FailurePolicy,
    counts: OpCounts,
}

impl<S: ByteStore> FailingStore<S> {
    /// Create a new failing store with the given policy
    pub fn new(inner: S, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            counts: OpCounts::default(),
        }
    }

    /// Get the underlying store (for inspection)
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get mutable access to the underlying store
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Operations attempted so far, including failed ones
    pub fn counts(&self) -> OpCounts {
        self.counts
    }

    /// Replace the failure policy and reset counters
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.counts = OpCounts::default();
    }
}

impl<S: ByteStore> ByteStore for FailingStore<S> {
    fn size(&self) -> u64 {
        self.inner.size()
    }

    fn position(&self) -> u64 {
        self.inner.position()
    }

    fn seek(&mut self, pos: u64) -> Result<(), StoreError> {
        self.counts.seeks += 1;
        if self.policy == FailurePolicy::OnSeek(pos) {
            return Err(StoreError::IoError);
        }
        self.inner.seek(pos)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StoreError> {
        self.counts.reads += 1;
        if matches!(self.policy, FailurePolicy::AfterReads(n) if self.counts.reads > n) {
            return Err(StoreError::IoError);
        }
        self.inner.read(buffer)
    }

    fn write(&mut self, buffer: &[u8]) -> Result<usize, StoreError> {
        self.counts.writes += 1;
        match self.policy {
            FailurePolicy::AfterWrites(n) if self.counts.writes > n => Err(StoreError::IoError),
            FailurePolicy::ShortWrites if buffer.len() > 1 => {
                self.inner.write(&buffer[..buffer.len() / 2])
            }
            _ => self.inner.write(buffer),
        }
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        // Flush failures can also be simulated
        if matches!(self.policy, FailurePolicy::AfterWrites(n) if self.counts.writes > n) {
            return Err(StoreError::IoError);
        }
        self.inner.flush()
    }
}
