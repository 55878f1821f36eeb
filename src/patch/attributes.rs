//! Point-in-time file attributes used by the pre-write gates

use std::fs;
use std::io;
use std::path::Path;

/// Attributes of the target, captured once per invocation and never refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileAttributesSnapshot {
    /// Read-only attribute (Windows) or no write permission bits at all (Unix)
    pub readonly: bool,
}

impl FileAttributesSnapshot {
    /// Query the attributes of `path`, following symlinks.
    ///
    /// Any failure (missing entry, access denied, dangling link) surfaces as
    /// the underlying `io::Error`; callers do not distinguish between them.
    pub fn query(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self::from_metadata(&metadata))
    }

    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        Self {
            readonly: metadata.permissions().readonly(),
        }
    }
}
