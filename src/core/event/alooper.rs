// Bindings to the NDK looper (`android/looper.h`)
use crate::common::error::{GlueError, Result};
use crate::common::time::PollTimeout;
use crate::core::event::interest::LooperEvents;
use crate::core::event::looper::{Looper, LooperPoll, PollSource, ReservedId};
use std::io;
use std::os::raw::{c_int, c_void};
use std::os::unix::io::RawFd;
use std::ptr::{self, NonNull};

#[repr(C)]
pub struct ALooper {
    _private: [u8; 0],
}

/// `struct android_poll_source` of the native app glue.
#[repr(C)]
pub struct AndroidPollSource {
    pub id: i32,
    pub app: *mut c_void,
    pub process: Option<unsafe extern "C" fn(app: *mut c_void, source: *mut AndroidPollSource)>,
}

type ALooperCallback = unsafe extern "C" fn(fd: c_int, events: c_int, data: *mut c_void) -> c_int;

const ALOOPER_PREPARE_ALLOW_NON_CALLBACKS: c_int = 1;

const ALOOPER_POLL_WAKE: c_int = -1;
const ALOOPER_POLL_CALLBACK: c_int = -2;
const ALOOPER_POLL_TIMEOUT: c_int = -3;
const ALOOPER_POLL_ERROR: c_int = -4;

#[link(name = "android")]
extern "C" {
    fn ALooper_forThread() -> *mut ALooper;
    fn ALooper_prepare(opts: c_int) -> *mut ALooper;
    fn ALooper_acquire(looper: *mut ALooper);
    fn ALooper_release(looper: *mut ALooper);
    fn ALooper_pollOnce(
        timeout_millis: c_int,
        out_fd: *mut c_int,
        out_events: *mut c_int,
        out_data: *mut *mut c_void,
    ) -> c_int;
    fn ALooper_addFd(
        looper: *mut ALooper,
        fd: c_int,
        ident: c_int,
        events: c_int,
        callback: Option<ALooperCallback>,
        data: *mut c_void,
    ) -> c_int;
    fn ALooper_removeFd(looper: *mut ALooper, fd: c_int) -> c_int;
}

/// Payload registered by the native app glue on a reserved identifier.
pub struct NativeSource(NonNull<AndroidPollSource>);

impl PollSource for NativeSource {
    fn process(&self) {
        let source = self.0.as_ptr();
        unsafe {
            if let Some(process) = (*source).process {
                process((*source).app, source);
            }
        }
    }
}

/// Reference-counted handle on the calling thread's `ALooper`.
pub struct AndroidLooper {
    looper: NonNull<ALooper>,
}

impl AndroidLooper {
    pub fn for_thread() -> Option<Self> {
        NonNull::new(unsafe { ALooper_forThread() }).map(Self::acquire)
    }

    pub fn prepare() -> Result<Self> {
        NonNull::new(unsafe { ALooper_prepare(ALOOPER_PREPARE_ALLOW_NON_CALLBACKS) })
            .map(Self::acquire)
            .ok_or_else(|| GlueError::LooperError("ALooper_prepare returned no looper".to_string()))
    }

    fn acquire(looper: NonNull<ALooper>) -> Self {
        unsafe { ALooper_acquire(looper.as_ptr()) };
        Self { looper }
    }
}

impl Clone for AndroidLooper {
    fn clone(&self) -> Self {
        Self::acquire(self.looper)
    }
}

impl Drop for AndroidLooper {
    fn drop(&mut self) {
        unsafe { ALooper_release(self.looper.as_ptr()) };
    }
}

impl Looper for AndroidLooper {
    type Source = NativeSource;

    fn add_fd(&self, fd: RawFd, ident: i32, events: LooperEvents) -> Result<()> {
        let rc = unsafe {
            ALooper_addFd(
                self.looper.as_ptr(),
                fd,
                ident,
                events.bits() as c_int,
                None,
                ptr::null_mut(),
            )
        };
        if rc < 0 {
            return Err(GlueError::LooperError(format!("ALooper_addFd failed for fd {}", fd)));
        }
        Ok(())
    }

    fn remove_fd(&self, fd: RawFd) -> Result<bool> {
        match unsafe { ALooper_removeFd(self.looper.as_ptr(), fd) } {
            1 => Ok(true),
            0 => Ok(false),
            _ => Err(GlueError::LooperError(format!("ALooper_removeFd failed for fd {}", fd))),
        }
    }

    fn poll_once(&self, timeout: PollTimeout) -> LooperPoll<NativeSource> {
        let mut fd: c_int = -1;
        let mut events: c_int = 0;
        let mut data: *mut c_void = ptr::null_mut();

        let ident = unsafe { ALooper_pollOnce(timeout.as_millis(), &mut fd, &mut events, &mut data) };
        match ident {
            ALOOPER_POLL_WAKE => LooperPoll::Wake,
            ALOOPER_POLL_CALLBACK => LooperPoll::Callback,
            ALOOPER_POLL_TIMEOUT => LooperPoll::Timeout,
            ALOOPER_POLL_ERROR => LooperPoll::Error(io::Error::new(
                io::ErrorKind::Other,
                "ALooper_pollOnce reported an error",
            )),
            ident => {
                // Only the glue's own registrations carry a poll source.
                let source = ReservedId::from_ident(ident)
                    .and_then(|_| NonNull::new(data as *mut AndroidPollSource))
                    .map(NativeSource);
                LooperPoll::Event {
                    ident,
                    fd,
                    events: LooperEvents::from_bits_truncate(events as u32),
                    source,
                }
            }
        }
    }
}
