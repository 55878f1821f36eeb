//! Error types for bytepatch

use std::fmt;
use std::io;

/// Failure of a single patch invocation.
///
/// One variant per gate in the patch sequence, in gate order. Several distinct
/// OS conditions are deliberately collapsed into one variant (for example "not
/// found" and "permission denied" both become `AttributeQueryFailed`).
#[derive(Debug)]
pub enum PatchError {
    /// The path does not resolve to a readable filesystem entry
    AttributeQueryFailed(io::Error),

    /// The target carries the read-only attribute
    ReadOnlyTarget,

    /// The target is under OS file protection and would be restored
    ProtectedByOS,

    /// An exclusive write handle could not be acquired
    OpenFailed(io::Error),

    /// The target has zero length
    EmptyFile,

    /// `offset + payload length` lies past the end of the file
    OffsetOutOfBounds { offset: u64, len: usize, size: u64 },

    /// Positioning the cursor at the patch offset failed
    SeekFailed(io::Error),

    /// The write primitive reported an error
    WriteFailed(io::Error),

    /// The write primitive accepted fewer bytes than requested
    ShortWrite { written: usize, expected: usize },

    /// Buffered data could not be committed to the medium
    FlushFailed(io::Error),
}

impl PatchError {
    /// Stable identifier of the failure kind, used in JSON reports and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            PatchError::AttributeQueryFailed(_) => "attribute_query_failed",
            PatchError::ReadOnlyTarget => "read_only_target",
            PatchError::ProtectedByOS => "protected_by_os",
            PatchError::OpenFailed(_) => "open_failed",
            PatchError::EmptyFile => "empty_file",
            PatchError::OffsetOutOfBounds { .. } => "offset_out_of_bounds",
            PatchError::SeekFailed(_) => "seek_failed",
            PatchError::WriteFailed(_) => "write_failed",
            PatchError::ShortWrite { .. } => "short_write",
            PatchError::FlushFailed(_) => "flush_failed",
        }
    }

    /// Operator-facing message for this failure kind
    pub fn operator_message(&self) -> &'static str {
        match self {
            PatchError::AttributeQueryFailed(_) => {
                "Cannot read the file attributes (does the file exist?)!"
            }
            PatchError::ReadOnlyTarget => {
                "Input file is read only (it might be stored on a read only media like DVD drive)!"
            }
            PatchError::ProtectedByOS => {
                "Input file is protected by the system file protection mechanism and it will be \
                 automatically restored to the original even after patching."
            }
            PatchError::OpenFailed(_) => "Couldn't open the input file!",
            PatchError::EmptyFile => "Input file is empty (0 bytes)!",
            PatchError::OffsetOutOfBounds { .. } => {
                "Patch offset is invalid (it's beyond the file size boundaries)!"
            }
            PatchError::SeekFailed(_) => "Couldn't set file pointer to the patch raw address!",
            PatchError::WriteFailed(_) => "An error occurred while writing patch bytes to the file!",
            PatchError::ShortWrite { .. } => "Couldn't write all of the patch bytes to the file!",
            PatchError::FlushFailed(_) => {
                "An error occurred while flushing the results to the disk!"
            }
        }
    }
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operator_message())?;
        match self {
            PatchError::AttributeQueryFailed(err)
            | PatchError::OpenFailed(err)
            | PatchError::SeekFailed(err)
            | PatchError::WriteFailed(err)
            | PatchError::FlushFailed(err) => write!(f, " ({err})"),
            PatchError::OffsetOutOfBounds { offset, len, size } => write!(
                f,
                " (offset 0x{offset:x} + {len} bytes exceeds file size {size})"
            ),
            PatchError::ShortWrite { written, expected } => {
                write!(f, " ({written} of {expected} bytes written)")
            }
            PatchError::ReadOnlyTarget | PatchError::ProtectedByOS | PatchError::EmptyFile => {
                Ok(())
            }
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::AttributeQueryFailed(err)
            | PatchError::OpenFailed(err)
            | PatchError::SeekFailed(err)
            | PatchError::WriteFailed(err)
            | PatchError::FlushFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Problems with the patch configuration, detected before any file is touched
#[derive(Debug)]
pub enum ConfigError {
    /// A required setting was not given on the command line or in the patch file
    MissingField(&'static str),

    /// The offset is not a decimal or `0x` hexadecimal integer
    InvalidOffset(String),

    /// The payload is not a valid hex byte string
    InvalidPayload(String),

    /// The payload has no bytes
    EmptyPayload,

    /// The patch file could not be read or parsed
    PatchFile(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField(name) => write!(f, "Missing required setting: {name}"),
            ConfigError::InvalidOffset(msg) => write!(f, "Invalid patch offset: {msg}"),
            ConfigError::InvalidPayload(msg) => write!(f, "Invalid patch bytes: {msg}"),
            ConfigError::EmptyPayload => write!(f, "Patch payload must contain at least one byte"),
            ConfigError::PatchFile(msg) => write!(f, "Patch file error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<anyhow::Error> for ConfigError {
    fn from(err: anyhow::Error) -> Self {
        ConfigError::PatchFile(format!("{err:#}"))
    }
}

/// Result type for patch operations
pub type Result<T> = std::result::Result<T, PatchError>;
