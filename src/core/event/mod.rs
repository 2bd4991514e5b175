pub mod adapter;
#[cfg(target_os = "android")]
pub mod alooper;
pub mod event;
pub mod event_loop;
pub mod event_manager;
pub mod interest;
pub mod looper;
pub mod poller;
pub mod thread;

pub use adapter::PollAdapter;
#[cfg(target_os = "android")]
pub use alooper::{AndroidLooper, NativeSource};
pub use event::{CallbackKind, Dispatch};
pub use event_loop::{PollBackend, SystemPoll};
pub use event_manager::EventManager;
pub use interest::{Interest, LooperEvents, PollFd};
pub use looper::{CallbackSource, Looper, LooperPoll, PollSource, ReservedId};
pub use poller::EpollLooper;
pub use thread::PlatformLooper;
