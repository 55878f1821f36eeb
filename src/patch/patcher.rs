//! The gated patch sequence

use super::attributes::FileAttributesSnapshot;
use super::protection::is_protected_by_os;
use super::request::PatchRequest;
use super::target::{FileTarget, PatchTarget};
use crate::exceptions::{PatchError, Result};
use crate::utils::format_bytes;
use log::{debug, info, trace};
use std::io;
use std::path::{Path, PathBuf};

/// OS capabilities the patcher consumes.
pub trait Platform {
    type Target: PatchTarget;

    /// Attribute query by path
    fn attributes(&self, path: &Path) -> io::Result<FileAttributesSnapshot>;

    /// System file protection query
    fn is_protected(&self, path: &Path) -> bool;

    /// Exclusive open of an existing file for writing
    fn open_for_patch(&self, path: &Path) -> io::Result<Self::Target>;
}

/// The real filesystem of the running OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePlatform;

impl Platform for NativePlatform {
    type Target = FileTarget;

    fn attributes(&self, path: &Path) -> io::Result<FileAttributesSnapshot> {
        FileAttributesSnapshot::query(path)
    }

    fn is_protected(&self, path: &Path) -> bool {
        is_protected_by_os(path)
    }

    fn open_for_patch(&self, path: &Path) -> io::Result<FileTarget> {
        FileTarget::open_exclusive(path)
    }
}

/// What a successful patch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    pub target: PathBuf,
    pub offset: u64,
    pub bytes_written: usize,
    pub file_size: u64,
}

/// Result of one invocation: a summary or exactly one failure kind
pub type PatchOutcome = Result<PatchSummary>;

/// Applies a [`PatchRequest`] after running every pre-write gate in order.
///
/// The first failing gate ends the sequence. Nothing is retried and nothing
/// is rolled back: a failed write or flush can leave the target partially
/// patched. The write handle is released before `apply` returns, whatever the
/// outcome.
#[derive(Debug, Default)]
pub struct FilePatcher<P = NativePlatform> {
    platform: P,
}

impl FilePatcher<NativePlatform> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Platform> FilePatcher<P> {
    pub fn with_platform(platform: P) -> Self {
        Self { platform }
    }

    pub fn apply(&self, request: &PatchRequest) -> PatchOutcome {
        let path = request.target();
        info!(
            "🩹 Patching {} at offset 0x{:x} with {} byte(s)",
            path.display(),
            request.offset(),
            request.payload().len()
        );
        trace!("Payload: {}", format_bytes(request.payload()));

        let attributes = self
            .platform
            .attributes(path)
            .map_err(PatchError::AttributeQueryFailed)?;
        debug!("Attributes: {:?}", attributes);

        if attributes.readonly {
            return Err(PatchError::ReadOnlyTarget);
        }

        if self.platform.is_protected(path) {
            return Err(PatchError::ProtectedByOS);
        }
        trace!("Target is not under OS file protection");

        let mut target = self
            .platform
            .open_for_patch(path)
            .map_err(PatchError::OpenFailed)?;

        let result = write_patch(&mut target, request);
        drop(target);

        let (bytes_written, file_size) = result?;
        info!(
            "✅ Patched {} byte(s) at 0x{:x} in {}",
            bytes_written,
            request.offset(),
            path.display()
        );
        Ok(PatchSummary {
            target: path.to_path_buf(),
            offset: request.offset(),
            bytes_written,
            file_size,
        })
    }
}

/// Gates 5 through 9, run against an already acquired handle
fn write_patch<T: PatchTarget>(target: &mut T, request: &PatchRequest) -> Result<(usize, u64)> {
    let size = target.size().map_err(PatchError::OpenFailed)?;
    debug!("File size: {} bytes", size);
    if size == 0 {
        return Err(PatchError::EmptyFile);
    }

    let payload = request.payload();
    if !request.fits_within(size) {
        return Err(PatchError::OffsetOutOfBounds {
            offset: request.offset(),
            len: payload.len(),
            size,
        });
    }

    let position = target
        .seek_to(request.offset())
        .map_err(PatchError::SeekFailed)?;
    if position != request.offset() {
        return Err(PatchError::SeekFailed(io::Error::other(format!(
            "cursor landed at 0x{position:x} instead of 0x{:x}",
            request.offset()
        ))));
    }

    let written = target
        .write_once(payload)
        .map_err(PatchError::WriteFailed)?;
    if written != payload.len() {
        return Err(PatchError::ShortWrite {
            written,
            expected: payload.len(),
        });
    }
    trace!("Wrote {} byte(s)", written);

    target.flush_to_medium().map_err(PatchError::FlushFailed)?;
    trace!("Flushed to medium");

    Ok((written, size))
}
