//! The looper bound to the calling thread.
//!
//! Mirrors `ALooper_prepare`/`ALooper_forThread`: a thread has at most one
//! looper, created by [`prepare`] and looked up by [`for_thread`]. On Android
//! this is the NDK looper itself; elsewhere an [`EpollLooper`] kept in
//! thread-local storage.

use crate::common::error::Result;

#[cfg(target_os = "android")]
pub type PlatformLooper = crate::core::event::alooper::AndroidLooper;

#[cfg(not(target_os = "android"))]
pub type PlatformLooper = std::rc::Rc<crate::core::event::poller::EpollLooper>;

#[cfg(target_os = "android")]
pub fn prepare() -> Result<PlatformLooper> {
    PlatformLooper::prepare()
}

/// The NDK looper sizes its own event buffer.
#[cfg(target_os = "android")]
pub fn prepare_with_max_events(_max_events: usize) -> Result<PlatformLooper> {
    PlatformLooper::prepare()
}

#[cfg(target_os = "android")]
pub fn for_thread() -> Option<PlatformLooper> {
    PlatformLooper::for_thread()
}

#[cfg(not(target_os = "android"))]
mod local {
    use super::*;
    use crate::common::constants::DEFAULT_MAX_EVENTS;
    use crate::core::event::poller::EpollLooper;
    use std::cell::RefCell;
    use std::rc::Rc;

    thread_local! {
        static THREAD_LOOPER: RefCell<Option<Rc<EpollLooper>>> = const { RefCell::new(None) };
    }

    pub fn prepare() -> Result<PlatformLooper> {
        prepare_with_max_events(DEFAULT_MAX_EVENTS)
    }

    /// `max_events` only applies when the looper is created by this call.
    pub fn prepare_with_max_events(max_events: usize) -> Result<PlatformLooper> {
        THREAD_LOOPER.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(looper) = slot.as_ref() {
                return Ok(Rc::clone(looper));
            }
            let looper = Rc::new(EpollLooper::with_max_events(max_events)?);
            *slot = Some(Rc::clone(&looper));
            Ok(looper)
        })
    }

    pub fn for_thread() -> Option<PlatformLooper> {
        THREAD_LOOPER.with(|slot| slot.borrow().clone())
    }

    /// Unbinds the thread's looper. Existing handles keep it alive.
    pub fn release() -> bool {
        THREAD_LOOPER.with(|slot| slot.borrow_mut().take().is_some())
    }
}

#[cfg(not(target_os = "android"))]
pub use local::{for_thread, prepare, prepare_with_max_events, release};
