// Shared test looper: records registrations and replays scripted waits

use looper_poll::core::event::looper::{CallbackSource, Looper, LooperPoll};
use looper_poll::{LooperEvents, PollTimeout, Result};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Looper whose waits replay a script.
///
/// Each scripted step sleeps for its delay, then returns its outcome. Once
/// the script is exhausted every wait times out.
#[derive(Default)]
pub struct ScriptedLooper {
    steps: RefCell<VecDeque<(Duration, LooperPoll<CallbackSource>)>>,
    pub registered: RefCell<BTreeMap<RawFd, (i32, LooperEvents)>>,
    pub add_calls: RefCell<Vec<RawFd>>,
    pub removed: RefCell<Vec<RawFd>>,
    pub timeouts: RefCell<Vec<PollTimeout>>,
}

#[allow(dead_code)] // not every test file uses every helper
impl ScriptedLooper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: LooperPoll<CallbackSource>) -> Self {
        self.then_after(Duration::ZERO, outcome)
    }

    pub fn then_after(self, delay: Duration, outcome: LooperPoll<CallbackSource>) -> Self {
        self.steps.borrow_mut().push_back((delay, outcome));
        self
    }

    pub fn wait_count(&self) -> usize {
        self.timeouts.borrow().len()
    }

    pub fn removals_of(&self, fd: RawFd) -> usize {
        self.removed.borrow().iter().filter(|&&f| f == fd).count()
    }
}

impl Looper for ScriptedLooper {
    type Source = CallbackSource;

    fn add_fd(&self, fd: RawFd, ident: i32, events: LooperEvents) -> Result<()> {
        self.add_calls.borrow_mut().push(fd);
        self.registered.borrow_mut().insert(fd, (ident, events));
        Ok(())
    }

    fn remove_fd(&self, fd: RawFd) -> Result<bool> {
        self.removed.borrow_mut().push(fd);
        Ok(self.registered.borrow_mut().remove(&fd).is_some())
    }

    fn poll_once(&self, timeout: PollTimeout) -> LooperPoll<CallbackSource> {
        self.timeouts.borrow_mut().push(timeout);
        let step = self.steps.borrow_mut().pop_front();
        match step {
            Some((delay, outcome)) => {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                outcome
            }
            None => LooperPoll::Timeout,
        }
    }
}

/// A descriptor event on `ident`.
#[allow(dead_code)]
pub fn fired(ident: i32, fd: RawFd, events: LooperEvents) -> LooperPoll<CallbackSource> {
    LooperPoll::Event {
        ident,
        fd,
        events,
        source: None,
    }
}

/// A reserved-id event whose payload runs `process`.
#[allow(dead_code)]
pub fn reserved<F: Fn() + 'static>(ident: i32, fd: RawFd, process: F) -> LooperPoll<CallbackSource> {
    LooperPoll::Event {
        ident,
        fd,
        events: LooperEvents::INPUT,
        source: Some(CallbackSource::new(process)),
    }
}
