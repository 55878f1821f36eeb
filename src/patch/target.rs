//! Exclusive write handle on the patch target

use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// The I/O primitives the patcher needs from an open target.
///
/// Each call maps to one blocking OS operation. Implementations release the
/// underlying handle when dropped; the patcher relies on that for cleanup on
/// every exit path.
pub trait PatchTarget {
    /// Current size of the open file in bytes
    fn size(&mut self) -> io::Result<u64>;

    /// Move the write cursor to `offset` from the start, returning the new position
    fn seek_to(&mut self, offset: u64) -> io::Result<u64>;

    /// Issue a single write and report how many bytes were accepted
    fn write_once(&mut self, bytes: &[u8]) -> io::Result<usize>;

    /// Push buffered data through to the storage medium
    fn flush_to_medium(&mut self) -> io::Result<()>;
}

/// A target file opened for writing with exclusive access.
#[derive(Debug)]
pub struct FileTarget {
    file: File,
    path: PathBuf,
}

impl FileTarget {
    /// Open an existing file for writing. Never creates or truncates.
    ///
    /// On Windows the file is opened with share mode 0, so no other process
    /// can hold it open meanwhile. On Unix a non-blocking exclusive `flock`
    /// is taken; if another process holds one the open fails.
    pub fn open_exclusive(path: &Path) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.write(true).create(false).truncate(false);

        #[cfg(windows)]
        {
            use std::os::windows::fs::OpenOptionsExt;
            options.share_mode(0);
        }

        let file = options.open(path)?;

        #[cfg(unix)]
        lock_exclusive(&file)?;

        debug!("🔒 Opened {} for exclusive writing", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(unix)]
#[allow(unsafe_code)] // flock on a descriptor owned by `file`
fn lock_exclusive(file: &File) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        log::trace!("Acquired exclusive flock");
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

impl PatchTarget for FileTarget {
    fn size(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(offset))
    }

    fn write_once(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.file.write(bytes)
    }

    fn flush_to_medium(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.file.sync_all()
    }
}

impl Drop for FileTarget {
    fn drop(&mut self) {
        // Closing the descriptor also drops the flock
        debug!("🔓 Released {}", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_does_not_create() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.bin");

        assert!(FileTarget::open_exclusive(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_open_does_not_truncate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keep.bin");
        fs::write(&path, [7u8; 32]).unwrap();

        let mut target = FileTarget::open_exclusive(&path).unwrap();
        assert_eq!(target.size().unwrap(), 32);
        drop(target);

        assert_eq!(fs::read(&path).unwrap(), vec![7u8; 32]);
    }

    #[test]
    fn test_write_at_offset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("write.bin");
        fs::write(&path, [0u8; 8]).unwrap();

        let mut target = FileTarget::open_exclusive(&path).unwrap();
        assert_eq!(target.seek_to(5).unwrap(), 5);
        assert_eq!(target.write_once(&[1, 2, 3]).unwrap(), 3);
        target.flush_to_medium().unwrap();
        drop(target);

        assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 0, 0, 0, 1, 2, 3]);
    }

    #[cfg(unix)]
    #[test]
    fn test_second_open_is_refused_while_held() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("busy.bin");
        fs::write(&path, [0u8; 4]).unwrap();

        let first = FileTarget::open_exclusive(&path).unwrap();
        let err = FileTarget::open_exclusive(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);

        drop(first);
        assert!(FileTarget::open_exclusive(&path).is_ok());
    }
}
