use bitflags::bitflags;
use std::os::raw::c_int;
use std::os::unix::io::RawFd;

bitflags! {
    /// Readiness conditions of the poll contract, with `poll(2)` bit values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Interest: u16 {
        const READABLE = libc::POLLIN as u16;
        const PRIORITY = libc::POLLPRI as u16;
        const WRITABLE = libc::POLLOUT as u16;
        const ERROR = libc::POLLERR as u16;
        const HANGUP = libc::POLLHUP as u16;
        const INVALID = libc::POLLNVAL as u16;
    }
}

bitflags! {
    /// Event flags understood by the looper (`ALOOPER_EVENT_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LooperEvents: u32 {
        const INPUT = 1 << 0;
        const OUTPUT = 1 << 1;
        const ERROR = 1 << 2;
        const HANGUP = 1 << 3;
        const INVALID = 1 << 4;
    }
}

const TRANSLATION: [(Interest, LooperEvents); 5] = [
    (Interest::READABLE, LooperEvents::INPUT),
    (Interest::WRITABLE, LooperEvents::OUTPUT),
    (Interest::ERROR, LooperEvents::ERROR),
    (Interest::HANGUP, LooperEvents::HANGUP),
    (Interest::INVALID, LooperEvents::INVALID),
];

impl From<Interest> for LooperEvents {
    fn from(interest: Interest) -> Self {
        TRANSLATION
            .iter()
            .filter(|(bit, _)| interest.contains(*bit))
            .fold(LooperEvents::empty(), |acc, (_, event)| acc | *event)
    }
}

impl From<LooperEvents> for Interest {
    fn from(events: LooperEvents) -> Self {
        TRANSLATION
            .iter()
            .filter(|(_, event)| events.contains(*event))
            .fold(Interest::empty(), |acc, (bit, _)| acc | *bit)
    }
}

/// One descriptor-interest record, laid out like `struct pollfd`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollFd {
    pub fd: c_int,
    pub events: u16,
    pub revents: u16,
}

impl PollFd {
    pub fn new(fd: RawFd, interest: Interest) -> Self {
        Self {
            fd,
            events: interest.bits(),
            revents: 0,
        }
    }

    pub fn interest(&self) -> Interest {
        Interest::from_bits_truncate(self.events)
    }

    pub fn ready(&self) -> Interest {
        Interest::from_bits_truncate(self.revents)
    }

    pub fn set_ready(&mut self, ready: Interest) {
        self.revents = ready.bits();
    }
}
