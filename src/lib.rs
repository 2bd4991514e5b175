//! Poll adapter over a registration-based looper, plus a bridge from
//! `tracing` severities to the Android log priorities.

#[cfg(not(any(target_os = "linux", target_os = "android")))]
compile_error!("looper-poll requires epoll (Linux or Android)");

pub mod application;
pub mod common;
pub mod core;

pub use application::{init, init_with_config, looper_poll, Glue, InitFlags, PollFunc};
pub use common::error::{GlueError, Result};
pub use common::time::PollTimeout;
pub use crate::core::event::{
    EpollLooper, Interest, Looper, LooperEvents, PlatformLooper, PollAdapter, PollBackend, PollFd,
    PollSource, ReservedId, SystemPoll,
};
pub use crate::core::log::{install_log_handler, translate_severity, LogBridgeLayer, LogLevelFlags, LogPriority};
