use crate::common::constants::DEFAULT_LOG_TAG;
use crate::core::log::severity::{translate_severity, LogLevelFlags, LogPriority};

/// Destination for translated log records.
pub trait LogWriter {
    fn write(&self, priority: LogPriority, tag: &str, message: &str);
}

impl<W: LogWriter + ?Sized> LogWriter for &W {
    fn write(&self, priority: LogPriority, tag: &str, message: &str) {
        (**self).write(priority, tag, message)
    }
}

impl<W: LogWriter + ?Sized> LogWriter for Box<W> {
    fn write(&self, priority: LogPriority, tag: &str, message: &str) {
        (**self).write(priority, tag, message)
    }
}

impl<W: LogWriter + ?Sized> LogWriter for std::sync::Arc<W> {
    fn write(&self, priority: LogPriority, tag: &str, message: &str) {
        (**self).write(priority, tag, message)
    }
}

/// Forwards one record to `writer` with the translated priority.
///
/// A `FATAL` bit in `level` counts as `fatal`. An empty domain is written
/// under the default tag.
pub fn log_sink<W: LogWriter>(
    writer: &W,
    domain: &str,
    level: LogLevelFlags,
    fatal: bool,
    message: &str,
) {
    let priority = translate_severity(level, fatal || level.is_fatal());
    let tag = if domain.is_empty() { DEFAULT_LOG_TAG } else { domain };
    writer.write(priority, tag, message);
}

#[cfg(target_os = "android")]
pub type PlatformLogWriter = AndroidLogWriter;

#[cfg(not(target_os = "android"))]
pub type PlatformLogWriter = crate::common::logger::StderrLogWriter;

/// Writes through `__android_log_write`.
#[cfg(target_os = "android")]
#[derive(Debug, Default, Clone, Copy)]
pub struct AndroidLogWriter;

#[cfg(target_os = "android")]
mod android {
    use std::ffi::CString;
    use std::os::raw::{c_char, c_int};

    use super::{AndroidLogWriter, LogPriority, LogWriter};

    #[link(name = "log")]
    extern "C" {
        fn __android_log_write(prio: c_int, tag: *const c_char, text: *const c_char) -> c_int;
    }

    // Interior NULs would truncate the record on the C side.
    fn to_c_string(text: &str) -> CString {
        CString::new(text.replace('\0', "\\0")).unwrap_or_default()
    }

    impl LogWriter for AndroidLogWriter {
        fn write(&self, priority: LogPriority, tag: &str, message: &str) {
            let tag = to_c_string(tag);
            let message = to_c_string(message);
            unsafe {
                __android_log_write(priority as c_int, tag.as_ptr(), message.as_ptr());
            }
        }
    }
}
