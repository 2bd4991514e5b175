// Poll backends an event loop can be driven by
use crate::common::constants::POLL_RESULT_ERROR;
use crate::common::time::PollTimeout;
use crate::core::event::adapter::PollAdapter;
use crate::core::event::interest::PollFd;
use crate::core::event::looper::Looper;
use tracing::warn;

/// The multiplexer contract of a readiness-based event loop.
pub trait PollBackend {
    /// Negative `timeout_ms` blocks indefinitely.
    fn poll(&mut self, fds: &mut [PollFd], timeout_ms: i32) -> i32;
}

impl<L: Looper> PollBackend for PollAdapter<L> {
    fn poll(&mut self, fds: &mut [PollFd], timeout_ms: i32) -> i32 {
        PollAdapter::poll(self, fds, PollTimeout::from_millis(timeout_ms))
    }
}

/// The native `poll(2)`, for threads without a looper.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPoll;

impl PollBackend for SystemPoll {
    fn poll(&mut self, fds: &mut [PollFd], timeout_ms: i32) -> i32 {
        let n = unsafe {
            libc::poll(
                fds.as_mut_ptr() as *mut libc::pollfd,
                fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };
        if n < 0 {
            warn!(error = %std::io::Error::last_os_error(), "poll failed");
            return POLL_RESULT_ERROR;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::interest::Interest;

    #[test]
    fn test_system_poll_times_out() {
        let mut backend = SystemPoll;
        let mut fds: [PollFd; 0] = [];
        assert_eq!(backend.poll(&mut fds, 0), 0);
    }

    #[test]
    fn test_system_poll_reports_invalid_fd() {
        let mut backend = SystemPoll;
        let mut fds = [PollFd::new(i32::MAX - 1, Interest::READABLE)];
        assert_eq!(backend.poll(&mut fds, 0), 1);
        assert!(fds[0].ready().contains(Interest::INVALID));
    }
}
