// src/watch/inotify.rs

use std::ffi::CString;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use tracing::debug;

use crate::types::WatchId;
use crate::watch::backend::WatchBackend;
use crate::watch::event::IN_MODIFY;

/// Linux inotify instance.
///
/// The descriptor is blocking: `read_events` parks the dispatch thread in the
/// kernel until something changes.
#[derive(Debug)]
pub struct InotifyBackend {
    fd: OwnedFd,
    mask: u32,
}

impl InotifyBackend {
    /// Open a new inotify instance whose watches report `IN_MODIFY`.
    pub fn new() -> io::Result<Self> {
        Self::with_mask(IN_MODIFY)
    }

    /// Open a new inotify instance whose watches report `mask`.
    pub fn with_mask(mask: u32) -> io::Result<Self> {
        // SAFETY: inotify_init1 takes no pointers; the flag is a valid
        // constant.
        let fd = unsafe { libc::inotify_init1(libc::IN_CLOEXEC) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        debug!(fd, "opened inotify instance");
        // SAFETY: `fd` was just returned by inotify_init1 and nothing else
        // owns it.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Ok(Self { fd, mask })
    }
}

impl WatchBackend for InotifyBackend {
    fn add_watch(&self, dir: &Path) -> io::Result<WatchId> {
        let c_path = CString::new(dir.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        // SAFETY: `c_path` is a NUL-terminated string that outlives the call
        // and `self.fd` is an open inotify descriptor.
        let wd = unsafe { libc::inotify_add_watch(self.fd.as_raw_fd(), c_path.as_ptr(), self.mask) };
        if wd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(WatchId(wd))
    }

    fn remove_watch(&self, id: WatchId) -> io::Result<()> {
        // SAFETY: plain integer arguments; an unknown id is reported as EINVAL.
        let res = unsafe { libc::inotify_rm_watch(self.fd.as_raw_fd(), id.as_raw()) };
        if res < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn read_events(&self, buf: &mut [u8]) -> io::Result<usize> {
        // SAFETY: the pointer and length come from the same live `&mut [u8]`,
        // so the kernel writes at most `buf.len()` bytes into owned memory.
        let res = unsafe {
            libc::read(
                self.fd.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
            )
        };
        if res < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(res as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_directory_reuses_watch_id() {
        let dir = tempfile::tempdir().unwrap();
        let backend = InotifyBackend::new().unwrap();

        let first = backend.add_watch(dir.path()).unwrap();
        let second = backend.add_watch(dir.path()).unwrap();
        assert!(first.is_valid());
        assert_eq!(first, second);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = InotifyBackend::new().unwrap();

        let err = backend.add_watch(&dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
