//! OS file protection query
//!
//! On Windows, Windows Resource Protection (formerly WFP/SFC) silently restores
//! monitored system files after they are modified. Patching such a file would
//! appear to succeed and then be undone, so it is refused up front. Other
//! platforms have no equivalent mechanism and never report a file as protected.

use std::path::Path;

/// Whether `path` is monitored by the OS file protection mechanism
#[cfg(target_os = "windows")]
#[allow(unsafe_code)] // Required for Windows API FFI calls
pub fn is_protected_by_os(path: &Path) -> bool {
    use log::{debug, warn};
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::Foundation::HANDLE;
    use windows::Win32::System::Restore::SfcIsFileProtected;
    use windows::core::PCWSTR;

    // SFC only recognises fully qualified paths
    let full_path = match std::path::absolute(path) {
        Ok(p) => p,
        Err(e) => {
            warn!("Unable to resolve absolute path for protection check: {}", e);
            path.to_path_buf()
        }
    };

    let wide_path: Vec<u16> = full_path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    let protected = unsafe { SfcIsFileProtected(HANDLE::default(), PCWSTR(wide_path.as_ptr())) };
    debug!(
        "SfcIsFileProtected({}) = {}",
        full_path.display(),
        protected.as_bool()
    );
    protected.as_bool()
}

/// Stub for non-Windows platforms
#[cfg(not(target_os = "windows"))]
pub fn is_protected_by_os(path: &Path) -> bool {
    log::trace!(
        "No OS file protection mechanism on this platform, {} is unprotected",
        path.display()
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_never_protected_off_windows() {
        assert!(!is_protected_by_os(Path::new("/bin/sh")));
        assert!(!is_protected_by_os(Path::new("/does/not/exist")));
    }

    #[cfg(target_os = "windows")]
    #[test]
    fn test_temp_file_not_protected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("scratch.exe");
        std::fs::write(&path, b"MZ").unwrap();
        assert!(!is_protected_by_os(&path));
    }
}
