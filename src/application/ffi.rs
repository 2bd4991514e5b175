//! C ABI surface.
//!
//! [`looper_poll`] has the signature of a C event loop's poll function
//! (`GPollFunc`), so it can be installed directly. Each thread drives its
//! own adapter.

use crate::application::init::{init, InitFlags};
use crate::common::constants::{LOOPER_ID_USER, POLL_RESULT_ERROR};
use crate::common::time::PollTimeout;
use crate::core::event::interest::PollFd;
use crate::core::event::thread::{self, PlatformLooper};
use crate::core::event::{PollAdapter, PollBackend};
use std::marker::PhantomData;
use std::cell::RefCell;
use std::os::raw::{c_int, c_uint};
use tracing::{error, warn};

pub type PollFunc = unsafe extern "C" fn(fds: *mut PollFd, nfds: c_uint, timeout: c_int) -> c_int;

thread_local! {
    static ADAPTER: RefCell<Option<PollAdapter<PlatformLooper>>> = const { RefCell::new(None) };
}

/// Binds the calling thread's adapter to its looper with `base_ident`.
///
/// The previous snapshot is kept when the identifier is unchanged.
pub fn bind_thread(base_ident: i32) {
    ADAPTER.with(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => {
            let rebind = match slot.as_ref() {
                Some(adapter) => adapter.base_ident() != base_ident || adapter.looper().is_none(),
                None => true,
            };
            if rebind {
                *slot = Some(PollAdapter::for_current_thread().with_base_ident(base_ident));
            }
        }
        Err(_) => warn!("cannot rebind the poll adapter from inside a poll"),
    });
}

fn poll_thread(fds: &mut [PollFd], timeout: PollTimeout) -> c_int {
    ADAPTER.with(|slot| {
        let mut slot = match slot.try_borrow_mut() {
            Ok(slot) => slot,
            Err(_) => {
                error!("re-entrant poll on the same thread");
                return POLL_RESULT_ERROR;
            }
        };
        let stale = match slot.as_ref() {
            Some(adapter) => adapter.looper().is_none() && thread::for_thread().is_some(),
            None => true,
        };
        if stale {
            let base_ident = slot.as_ref().map_or(LOOPER_ID_USER, |a| a.base_ident());
            *slot = Some(PollAdapter::for_current_thread().with_base_ident(base_ident));
        }
        match slot.as_mut() {
            Some(adapter) => adapter.poll(fds, timeout),
            None => POLL_RESULT_ERROR,
        }
    })
}

/// Rust-side handle on the same per-thread adapter as [`looper_poll`], so
/// both entry points share one registration snapshot.
pub struct ThreadPoll {
    _thread_bound: PhantomData<*const ()>,
}

impl ThreadPoll {
    pub fn new(base_ident: i32) -> Self {
        bind_thread(base_ident);
        Self {
            _thread_bound: PhantomData,
        }
    }
}

impl PollBackend for ThreadPoll {
    fn poll(&mut self, fds: &mut [PollFd], timeout_ms: i32) -> i32 {
        poll_thread(fds, PollTimeout::from_millis(timeout_ms))
    }
}

/// Poll function backed by the calling thread's looper.
///
/// # Safety
///
/// `fds` must point to `nfds` valid, writable entries, or be null with
/// `nfds == 0`.
#[no_mangle]
pub unsafe extern "C" fn looper_poll(fds: *mut PollFd, nfds: c_uint, timeout: c_int) -> c_int {
    let fds: &mut [PollFd] = if fds.is_null() || nfds == 0 {
        &mut []
    } else {
        std::slice::from_raw_parts_mut(fds, nfds as usize)
    };
    poll_thread(fds, PollTimeout::from_millis(timeout))
}

/// C entry point for [`init`]. Unknown flag bits are ignored.
#[no_mangle]
pub extern "C" fn looper_poll_init(flags: c_uint) -> bool {
    match init(InitFlags::from_bits_truncate(flags)) {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "initialisation failed");
            false
        }
    }
}
