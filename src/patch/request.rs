//! The caller-supplied description of one patch

use crate::exceptions::ConfigError;
use std::path::{Path, PathBuf};

/// Bytes to write at a raw offset of an existing file.
///
/// The payload is guaranteed non-empty. Whether `offset + payload.len()` fits
/// inside the file is only known once the file is open, so that bound is
/// checked by the patcher, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRequest {
    target: PathBuf,
    payload: Vec<u8>,
    offset: u64,
}

impl PatchRequest {
    /// Create a request, rejecting an empty payload
    pub fn new(
        target: impl Into<PathBuf>,
        payload: Vec<u8>,
        offset: u64,
    ) -> Result<Self, ConfigError> {
        if payload.is_empty() {
            return Err(ConfigError::EmptyPayload);
        }
        Ok(Self {
            target: target.into(),
            payload,
            offset,
        })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// First byte past the patched range, or `None` if it does not fit in a `u64`
    pub fn end(&self) -> Option<u64> {
        u64::try_from(self.payload.len())
            .ok()
            .and_then(|len| self.offset.checked_add(len))
    }

    /// Whether the patched range lies entirely within a file of `size` bytes
    pub fn fits_within(&self, size: u64) -> bool {
        self.end().is_some_and(|end| end <= size)
    }
}
