pub mod config;
pub mod ffi;
pub mod init;

pub use ffi::{looper_poll, PollFunc, ThreadPoll};
pub use init::{init, init_with_config, Glue, InitFlags};
