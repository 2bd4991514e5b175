//! Poll contract on top of a registration-based looper.
//!
//! A poll call hands over the full descriptor set every time, while the
//! looper keeps registrations between calls. [`PollAdapter`] bridges the two:
//! it registers the current set, drops what vanished since the previous call
//! and waits until one descriptor fires or the timeout runs out. Framework
//! events on the reserved identifiers are processed inline and the wait is
//! resumed with whatever time is left.

use crate::common::constants::{
    LOOPER_ID_INPUT, LOOPER_ID_USER, POLL_RESULT_ERROR, POLL_RESULT_READY, POLL_RESULT_TIMEOUT,
};
use crate::common::time::PollTimeout;
use crate::core::event::event::Dispatch;
use crate::core::event::event_manager::EventManager;
use crate::core::event::interest::PollFd;
use crate::core::event::looper::{Looper, PollSource};
use crate::core::event::thread::{self, PlatformLooper};
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{debug, error, trace, warn};

/// Poll adapter bound to one thread's looper.
///
/// Not `Send`: the looper it drives belongs to the thread that created it.
pub struct PollAdapter<L> {
    looper: Option<L>,
    manager: EventManager,
    base_ident: i32,
    _thread_bound: PhantomData<*const ()>,
}

impl<L: Looper> PollAdapter<L> {
    pub fn new(looper: L) -> Self {
        Self::with_looper(Some(looper))
    }

    /// An adapter with no looper; every poll fails with `-1`.
    pub fn unbound() -> Self {
        Self::with_looper(None)
    }

    fn with_looper(looper: Option<L>) -> Self {
        Self {
            looper,
            manager: EventManager::new(),
            base_ident: LOOPER_ID_USER,
            _thread_bound: PhantomData,
        }
    }

    /// Sets the identifier given to the first descriptor of each call.
    ///
    /// Values that would collide with the reserved identifiers fall back
    /// to [`LOOPER_ID_USER`].
    pub fn with_base_ident(mut self, base_ident: i32) -> Self {
        if base_ident <= LOOPER_ID_INPUT {
            warn!(base_ident, "base identifier overlaps the reserved ones, using {}", LOOPER_ID_USER);
            self.base_ident = LOOPER_ID_USER;
        } else {
            self.base_ident = base_ident;
        }
        self
    }

    pub fn base_ident(&self) -> i32 {
        self.base_ident
    }

    pub fn looper(&self) -> Option<&L> {
        self.looper.as_ref()
    }

    /// Descriptor set of the most recent call.
    pub fn snapshot(&self) -> &[PollFd] {
        self.manager.snapshot()
    }

    /// Waits until a descriptor in `fds` becomes ready.
    ///
    /// Returns `1` with that descriptor's `revents` set, `0` when the
    /// timeout elapsed, or `-1` when the looper is missing or failed.
    /// At most one descriptor is reported per call.
    pub fn poll(&mut self, fds: &mut [PollFd], timeout: PollTimeout) -> i32 {
        let looper = match self.looper.as_ref() {
            Some(looper) => looper,
            None => {
                error!("no looper bound to this thread, cannot poll");
                self.manager.remember(fds);
                return POLL_RESULT_ERROR;
            }
        };

        self.manager.register_all(looper, fds, self.base_ident);
        self.manager.remove_stale(looper, fds);
        self.manager.remember(fds);

        let mut remaining = timeout;
        loop {
            let started = Instant::now();
            let outcome = looper.poll_once(remaining);

            match Dispatch::classify(outcome, self.base_ident, fds) {
                Dispatch::Error(e) => {
                    warn!(error = %e, "looper wait failed");
                    return POLL_RESULT_ERROR;
                }
                Dispatch::Timeout | Dispatch::Wake => return POLL_RESULT_TIMEOUT,
                Dispatch::PlatformCallback { kind, source } => {
                    trace!(?kind, "processing platform event");
                    if let Some(source) = source {
                        source.process();
                    }
                }
                Dispatch::Stale { ident, fd } => {
                    warn!(ident, fd, "event for an unknown identifier");
                    // Left over from an earlier call; it would keep firing
                    if !fds.iter().any(|pollfd| pollfd.fd == fd) {
                        EventManager::deregister(looper, fd);
                    }
                }
                Dispatch::Descriptor { index, events } => {
                    let pollfd = &mut fds[index];
                    pollfd.set_ready(events);
                    debug!(fd = pollfd.fd, ?events, "descriptor ready");
                    EventManager::deregister(looper, pollfd.fd);
                    return POLL_RESULT_READY;
                }
            }

            if !remaining.consume_since(started) {
                return POLL_RESULT_TIMEOUT;
            }
        }
    }
}

impl PollAdapter<PlatformLooper> {
    /// Binds the looper of the calling thread, if it has one.
    ///
    /// Without a looper the adapter is still created, but every poll on it
    /// fails.
    pub fn for_current_thread() -> Self {
        Self::with_looper(thread::for_thread())
    }
}
