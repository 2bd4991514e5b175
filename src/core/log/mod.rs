pub mod layer;
pub mod severity;
pub mod sink;

pub use layer::{install_log_handler, LogBridgeLayer};
pub use severity::{translate_severity, LogLevelFlags, LogPriority};
#[cfg(target_os = "android")]
pub use sink::AndroidLogWriter;
pub use sink::{log_sink, LogWriter, PlatformLogWriter};
