// Registration bookkeeping between consecutive poll calls
use crate::core::event::interest::{LooperEvents, PollFd};
use crate::core::event::looper::Looper;
use std::os::unix::io::RawFd;
use tracing::{debug, warn};

/// Remembers the descriptor set of the previous poll call so descriptors
/// that disappear from the next call can be removed from the looper.
#[derive(Debug, Default)]
pub struct EventManager {
    previous: Vec<PollFd>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[PollFd] {
        &self.previous
    }

    /// Registers every descriptor under `base_ident + index`.
    ///
    /// Failures are logged and skipped.
    pub fn register_all<L: Looper>(&self, looper: &L, fds: &[PollFd], base_ident: i32) {
        for (index, pollfd) in fds.iter().enumerate() {
            let ident = match i32::try_from(index)
                .ok()
                .and_then(|offset| base_ident.checked_add(offset))
            {
                Some(ident) => ident,
                None => {
                    warn!(fd = pollfd.fd, index, "no identifier left for descriptor");
                    continue;
                }
            };

            let events = LooperEvents::from(pollfd.interest());
            if let Err(e) = looper.add_fd(pollfd.fd, ident, events) {
                warn!(fd = pollfd.fd, ident, error = %e, "failed to register descriptor");
            }
        }
    }

    /// Removes descriptors that were in the previous call but not in `fds`.
    pub fn remove_stale<L: Looper>(&self, looper: &L, fds: &[PollFd]) {
        for previous in &self.previous {
            if fds.iter().any(|current| current.fd == previous.fd) {
                continue;
            }
            debug!(fd = previous.fd, "descriptor left the poll set");
            Self::deregister(looper, previous.fd);
        }
    }

    pub fn deregister<L: Looper>(looper: &L, fd: RawFd) {
        match looper.remove_fd(fd) {
            Ok(true) => {}
            Ok(false) => warn!(fd, "descriptor not found while removing"),
            Err(e) => warn!(fd, error = %e, "failed to remove descriptor"),
        }
    }

    pub fn remember(&mut self, fds: &[PollFd]) {
        self.previous.clear();
        self.previous.extend_from_slice(fds);
    }
}
