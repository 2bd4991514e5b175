// epoll-backed looper for Linux and Android hosts
use crate::common::constants::DEFAULT_MAX_EVENTS;
use crate::common::error::{GlueError, Result};
use crate::common::time::PollTimeout;
use crate::core::event::interest::LooperEvents;
use crate::core::event::looper::{CallbackSource, Looper, LooperPoll, ReservedId};
use crate::core::sys::FileDescriptor;
use libc::{
    c_int, epoll_create1, epoll_ctl, epoll_event, epoll_wait, EPOLLERR, EPOLLHUP, EPOLLIN,
    EPOLLOUT, EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLL_CTL_MOD,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::os::unix::io::RawFd;

struct Registration {
    ident: i32,
    events: LooperEvents,
    source: Option<CallbackSource>,
}

// A readiness report waiting to be handed out by `poll_once`.
struct Response {
    fd: RawFd,
    events: LooperEvents,
}

/// Looper semantics over `epoll`: one registration per fd, one event
/// handed out per wait.
///
/// Events reported together by the kernel are queued and served by the
/// following waits. A queued event is dropped if its fd was removed in the
/// meantime, and re-registering an fd updates the identifier it is
/// reported with.
pub struct EpollLooper {
    epfd: FileDescriptor,
    registrations: RefCell<HashMap<RawFd, Registration>>,
    responses: RefCell<VecDeque<Response>>,
    max_events: usize,
}

impl EpollLooper {
    pub fn new() -> Result<Self> {
        Self::with_max_events(DEFAULT_MAX_EVENTS)
    }

    pub fn with_max_events(max_events: usize) -> Result<Self> {
        let epfd = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if epfd < 0 {
            return Err(GlueError::LooperError(format!(
                "Failed to create epoll instance: {}",
                io::Error::last_os_error()
            )));
        }

        Ok(Self {
            epfd: FileDescriptor::from_raw(epfd),
            registrations: RefCell::new(HashMap::new()),
            responses: RefCell::new(VecDeque::new()),
            max_events: max_events.max(1),
        })
    }

    /// Registers a framework source on a reserved identifier; `process`
    /// runs inline when the adapter receives its event.
    pub fn add_source<F>(&self, fd: RawFd, id: ReservedId, events: LooperEvents, process: F) -> Result<()>
    where
        F: Fn() + 'static,
    {
        self.register(fd, id.ident(), events, Some(CallbackSource::new(process)))
    }

    pub fn is_registered(&self, fd: RawFd) -> bool {
        self.registrations.borrow().contains_key(&fd)
    }

    pub fn registered_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    fn register(
        &self,
        fd: RawFd,
        ident: i32,
        events: LooperEvents,
        source: Option<CallbackSource>,
    ) -> Result<()> {
        let mut ev = epoll_event {
            events: to_epoll(events),
            u64: fd as u64,
        };

        unsafe {
            if epoll_ctl(self.epfd.as_raw_fd(), EPOLL_CTL_ADD, fd, &mut ev) < 0 {
                let err = io::Error::last_os_error();
                if err.raw_os_error() != Some(libc::EEXIST) {
                    return Err(GlueError::LooperError(format!(
                        "Failed to register fd {}: {}",
                        fd, err
                    )));
                }
                // Already known to epoll, replace the registration
                if epoll_ctl(self.epfd.as_raw_fd(), EPOLL_CTL_MOD, fd, &mut ev) < 0 {
                    return Err(GlueError::LooperError(format!(
                        "Failed to modify fd {}: {}",
                        fd,
                        io::Error::last_os_error()
                    )));
                }
            }
        }

        // Readiness seen by an earlier wait may be stale; epoll re-reports it
        // if it still holds.
        self.responses.borrow_mut().retain(|r| r.fd != fd);
        self.registrations.borrow_mut().insert(
            fd,
            Registration {
                ident,
                events,
                source,
            },
        );
        Ok(())
    }

    fn next_response(&self) -> Option<LooperPoll<CallbackSource>> {
        let registrations = self.registrations.borrow();
        let mut responses = self.responses.borrow_mut();

        while let Some(response) = responses.pop_front() {
            let Some(registration) = registrations.get(&response.fd) else {
                continue;
            };
            let wanted = registration.events
                | LooperEvents::ERROR
                | LooperEvents::HANGUP
                | LooperEvents::INVALID;
            let events = response.events & wanted;
            if events.is_empty() {
                continue;
            }
            return Some(LooperPoll::Event {
                ident: registration.ident,
                fd: response.fd,
                events,
                source: registration.source.clone(),
            });
        }
        None
    }
}

impl Looper for EpollLooper {
    type Source = CallbackSource;

    fn add_fd(&self, fd: RawFd, ident: i32, events: LooperEvents) -> Result<()> {
        self.register(fd, ident, events, None)
    }

    fn remove_fd(&self, fd: RawFd) -> Result<bool> {
        if self.registrations.borrow_mut().remove(&fd).is_none() {
            return Ok(false);
        }

        let rc = unsafe {
            epoll_ctl(
                self.epfd.as_raw_fd(),
                EPOLL_CTL_DEL,
                fd,
                std::ptr::null_mut(),
            )
        };
        if rc < 0 {
            let err = io::Error::last_os_error();
            // A closed fd has already left the epoll set.
            match err.raw_os_error() {
                Some(libc::EBADF) | Some(libc::ENOENT) => {}
                _ => {
                    return Err(GlueError::LooperError(format!(
                        "Failed to remove fd {}: {}",
                        fd, err
                    )))
                }
            }
        }
        Ok(true)
    }

    fn poll_once(&self, timeout: PollTimeout) -> LooperPoll<CallbackSource> {
        if let Some(poll) = self.next_response() {
            return poll;
        }

        let mut events = vec![epoll_event { events: 0, u64: 0 }; self.max_events];
        let n = unsafe {
            epoll_wait(
                self.epfd.as_raw_fd(),
                events.as_mut_ptr(),
                events.len() as c_int,
                timeout.as_millis(),
            )
        };

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return LooperPoll::Wake;
            }
            return LooperPoll::Error(err);
        }
        if n == 0 {
            return LooperPoll::Timeout;
        }

        {
            let mut responses = self.responses.borrow_mut();
            for ev in &events[..n as usize] {
                let fd = ev.u64 as RawFd;
                let flags = ev.events;
                responses.push_back(Response {
                    fd,
                    events: from_epoll(flags),
                });
            }
        }

        // Every event belonged to an fd removed since; nothing to report
        self.next_response().unwrap_or(LooperPoll::Callback)
    }
}

fn to_epoll(events: LooperEvents) -> u32 {
    let mut mask = 0u32;
    if events.contains(LooperEvents::INPUT) {
        mask |= EPOLLIN as u32;
    }
    if events.contains(LooperEvents::OUTPUT) {
        mask |= EPOLLOUT as u32;
    }
    mask
}

fn from_epoll(mask: u32) -> LooperEvents {
    let mut events = LooperEvents::empty();
    if mask & EPOLLIN as u32 != 0 {
        events |= LooperEvents::INPUT;
    }
    if mask & EPOLLOUT as u32 != 0 {
        events |= LooperEvents::OUTPUT;
    }
    if mask & EPOLLERR as u32 != 0 {
        events |= LooperEvents::ERROR;
    }
    if mask & EPOLLHUP as u32 != 0 {
        events |= LooperEvents::HANGUP;
    }
    events
}
