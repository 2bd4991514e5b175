use crate::common::error::Result;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

/// Raw descriptor, closed on drop when owned.
#[derive(Debug)]
pub struct FileDescriptor {
    fd: RawFd,
    owned: bool,
}

impl FileDescriptor {
    pub fn new(fd: RawFd) -> Self {
        Self { fd, owned: false }
    }

    pub fn from_raw(fd: RawFd) -> Self {
        Self { fd, owned: true }
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.fd
    }

    pub fn set_non_blocking(&self) -> Result<()> {
        unsafe {
            let flags = libc::fcntl(self.fd, libc::F_GETFL);
            if flags < 0 {
                return Err(io::Error::last_os_error().into());
            }

            if libc::fcntl(self.fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
                return Err(io::Error::last_os_error().into());
            }
        }
        Ok(())
    }

    /// Creates a non-blocking pipe, returning `(read_end, write_end)`.
    pub fn pipe() -> Result<(Self, Self)> {
        let mut fds = [0 as libc::c_int; 2];
        if unsafe { libc::pipe(fds.as_mut_ptr()) } < 0 {
            return Err(io::Error::last_os_error().into());
        }

        let read_end = Self::from_raw(fds[0]);
        let write_end = Self::from_raw(fds[1]);
        read_end.set_non_blocking()?;
        write_end.set_non_blocking()?;
        Ok((read_end, write_end))
    }

    /// Regular files are always ready and cannot be added to epoll.
    pub fn is_regular_file(&self) -> bool {
        let mut stat: libc::stat = unsafe { std::mem::zeroed() };
        if unsafe { libc::fstat(self.fd, &mut stat) } < 0 {
            return false;
        }
        stat.st_mode & libc::S_IFMT == libc::S_IFREG
    }

    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }

    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }
}

impl AsRawFd for FileDescriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for FileDescriptor {
    fn drop(&mut self) {
        if self.owned && self.fd >= 0 {
            unsafe {
                libc::close(self.fd);
            }
        }
    }
}
