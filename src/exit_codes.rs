//! Standard exit codes for the bytepatch binary
//!
//! Codes 1 through 10 follow the order of the patch gates, so a failing run
//! always exits with the same code for the same failure kind.

use crate::exceptions::PatchError;

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// File attributes could not be read (missing file, no access)
pub const EXIT_ATTRIBUTE_QUERY_FAILED: i32 = 1;

/// Target is read-only
pub const EXIT_READ_ONLY_TARGET: i32 = 2;

/// Target is protected by the OS file protection mechanism
pub const EXIT_PROTECTED_BY_OS: i32 = 3;

/// Target could not be opened for exclusive writing
pub const EXIT_OPEN_FAILED: i32 = 4;

/// Target is empty
pub const EXIT_EMPTY_FILE: i32 = 5;

/// Patch range lies beyond the end of the target
pub const EXIT_OFFSET_OUT_OF_BOUNDS: i32 = 6;

/// Seek to the patch offset failed
pub const EXIT_SEEK_FAILED: i32 = 7;

/// Write primitive reported an error
pub const EXIT_WRITE_FAILED: i32 = 8;

/// Fewer bytes written than requested
pub const EXIT_SHORT_WRITE: i32 = 9;

/// Flush to the medium failed
pub const EXIT_FLUSH_FAILED: i32 = 10;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Invalid command-line arguments or patch file
pub const EXIT_INVALID_ARGS: i32 = 105;

/// Map a patch failure to its process exit code
pub fn exit_code_for(err: &PatchError) -> i32 {
    match err {
        PatchError::AttributeQueryFailed(_) => EXIT_ATTRIBUTE_QUERY_FAILED,
        PatchError::ReadOnlyTarget => EXIT_READ_ONLY_TARGET,
        PatchError::ProtectedByOS => EXIT_PROTECTED_BY_OS,
        PatchError::OpenFailed(_) => EXIT_OPEN_FAILED,
        PatchError::EmptyFile => EXIT_EMPTY_FILE,
        PatchError::OffsetOutOfBounds { .. } => EXIT_OFFSET_OUT_OF_BOUNDS,
        PatchError::SeekFailed(_) => EXIT_SEEK_FAILED,
        PatchError::WriteFailed(_) => EXIT_WRITE_FAILED,
        PatchError::ShortWrite { .. } => EXIT_SHORT_WRITE,
        PatchError::FlushFailed(_) => EXIT_FLUSH_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io;

    fn every_kind() -> Vec<PatchError> {
        vec![
            PatchError::AttributeQueryFailed(io::Error::from(io::ErrorKind::NotFound)),
            PatchError::ReadOnlyTarget,
            PatchError::ProtectedByOS,
            PatchError::OpenFailed(io::Error::from(io::ErrorKind::PermissionDenied)),
            PatchError::EmptyFile,
            PatchError::OffsetOutOfBounds {
                offset: 10,
                len: 1,
                size: 10,
            },
            PatchError::SeekFailed(io::Error::other("seek")),
            PatchError::WriteFailed(io::Error::other("write")),
            PatchError::ShortWrite {
                written: 0,
                expected: 1,
            },
            PatchError::FlushFailed(io::Error::other("flush")),
        ]
    }

    #[test]
    fn test_codes_follow_gate_order() {
        let codes: Vec<i32> = every_kind().iter().map(exit_code_for).collect();
        assert_eq!(codes, (1..=10).collect::<Vec<i32>>());
    }

    #[test]
    fn test_codes_are_distinct_from_reserved() {
        let codes: HashSet<i32> = every_kind().iter().map(exit_code_for).collect();
        assert_eq!(codes.len(), 10);
        for reserved in [EXIT_SUCCESS, EXIT_PANIC, EXIT_INVALID_ARGS] {
            assert!(!codes.contains(&reserved));
        }
    }
}
