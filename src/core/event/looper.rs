// Registration-based notification facility the adapter is built on
use crate::common::constants::{LOOPER_ID_INPUT, LOOPER_ID_MAIN};
use crate::common::error::Result;
use crate::common::time::PollTimeout;
use crate::core::event::interest::LooperEvents;
use std::io;
use std::os::unix::io::RawFd;
use std::rc::Rc;

/// Payload attached to a framework source, processed inline by the adapter.
pub trait PollSource {
    fn process(&self);
}

/// Source payload backed by a Rust closure.
#[derive(Clone)]
pub struct CallbackSource(Rc<dyn Fn()>);

impl CallbackSource {
    pub fn new<F: Fn() + 'static>(process: F) -> Self {
        Self(Rc::new(process))
    }
}

impl PollSource for CallbackSource {
    fn process(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for CallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CallbackSource")
    }
}

/// Identifiers the native app glue keeps for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedId {
    Main,
    Input,
}

impl ReservedId {
    pub fn from_ident(ident: i32) -> Option<Self> {
        match ident {
            LOOPER_ID_MAIN => Some(ReservedId::Main),
            LOOPER_ID_INPUT => Some(ReservedId::Input),
            _ => None,
        }
    }

    pub fn ident(&self) -> i32 {
        match self {
            ReservedId::Main => LOOPER_ID_MAIN,
            ReservedId::Input => LOOPER_ID_INPUT,
        }
    }
}

/// Outcome of one blocking wait on the looper.
#[derive(Debug)]
pub enum LooperPoll<S> {
    Event {
        ident: i32,
        fd: RawFd,
        events: LooperEvents,
        source: Option<S>,
    },
    /// The looper ran fd callbacks of its own and returned.
    Callback,
    Wake,
    Timeout,
    Error(io::Error),
}

pub trait Looper {
    type Source: PollSource;

    /// Registers `fd`, replacing any earlier registration of the same fd.
    fn add_fd(&self, fd: RawFd, ident: i32, events: LooperEvents) -> Result<()>;

    /// Returns `Ok(false)` when `fd` was not registered.
    fn remove_fd(&self, fd: RawFd) -> Result<bool>;

    fn poll_once(&self, timeout: PollTimeout) -> LooperPoll<Self::Source>;
}

impl<L: Looper + ?Sized> Looper for Rc<L> {
    type Source = L::Source;

    fn add_fd(&self, fd: RawFd, ident: i32, events: LooperEvents) -> Result<()> {
        (**self).add_fd(fd, ident, events)
    }

    fn remove_fd(&self, fd: RawFd) -> Result<bool> {
        (**self).remove_fd(fd)
    }

    fn poll_once(&self, timeout: PollTimeout) -> LooperPoll<Self::Source> {
        (**self).poll_once(timeout)
    }
}
