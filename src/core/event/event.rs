use crate::core::event::interest::{Interest, PollFd};
use crate::core::event::looper::{LooperPoll, ReservedId};
use std::io;
use std::os::unix::io::RawFd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Reserved(ReservedId),
    /// Callbacks the looper already ran before returning.
    Internal,
}

/// A looper wait result, classified against the descriptors of the
/// current poll call.
#[derive(Debug)]
pub enum Dispatch<S> {
    Descriptor { index: usize, events: Interest },
    PlatformCallback { kind: CallbackKind, source: Option<S> },
    /// An identifier that matches no descriptor of this call.
    Stale { ident: i32, fd: RawFd },
    Wake,
    Timeout,
    Error(io::Error),
}

impl<S> Dispatch<S> {
    pub fn classify(poll: LooperPoll<S>, base_ident: i32, fds: &[PollFd]) -> Self {
        match poll {
            LooperPoll::Error(err) => Dispatch::Error(err),
            LooperPoll::Timeout => Dispatch::Timeout,
            LooperPoll::Wake => Dispatch::Wake,
            LooperPoll::Callback => Dispatch::PlatformCallback {
                kind: CallbackKind::Internal,
                source: None,
            },
            LooperPoll::Event {
                ident,
                fd,
                events,
                source,
            } => {
                if let Some(reserved) = ReservedId::from_ident(ident) {
                    return Dispatch::PlatformCallback {
                        kind: CallbackKind::Reserved(reserved),
                        source,
                    };
                }

                let index = ident
                    .checked_sub(base_ident)
                    .and_then(|offset| usize::try_from(offset).ok())
                    .filter(|&index| index < fds.len() && fds[index].fd == fd);

                match index {
                    Some(index) => Dispatch::Descriptor {
                        index,
                        events: Interest::from(events),
                    },
                    None => Dispatch::Stale { ident, fd },
                }
            }
        }
    }
}
