use bitflags::bitflags;

bitflags! {
    /// Layered log severity, one bit per level plus the fatal and
    /// recursion markers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LogLevelFlags: u32 {
        const RECURSION = 1 << 0;
        const FATAL = 1 << 1;
        const ERROR = 1 << 2;
        const CRITICAL = 1 << 3;
        const WARNING = 1 << 4;
        const MESSAGE = 1 << 5;
        const INFO = 1 << 6;
        const DEBUG = 1 << 7;
    }
}

impl LogLevelFlags {
    pub fn is_fatal(&self) -> bool {
        self.contains(LogLevelFlags::FATAL)
    }
}

impl From<tracing::Level> for LogLevelFlags {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => LogLevelFlags::CRITICAL,
            tracing::Level::WARN => LogLevelFlags::WARNING,
            tracing::Level::INFO => LogLevelFlags::INFO,
            tracing::Level::DEBUG | tracing::Level::TRACE => LogLevelFlags::DEBUG,
        }
    }
}

/// Platform log priority, numbered like `android_LogPriority`.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogPriority {
    Unknown = 0,
    Default = 1,
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    Fatal = 7,
    Silent = 8,
}

impl LogPriority {
    /// Single-letter form used by logcat's brief format.
    pub fn letter(&self) -> char {
        match self {
            LogPriority::Unknown | LogPriority::Default => '?',
            LogPriority::Verbose => 'V',
            LogPriority::Debug => 'D',
            LogPriority::Info => 'I',
            LogPriority::Warn => 'W',
            LogPriority::Error => 'E',
            LogPriority::Fatal => 'F',
            LogPriority::Silent => 'S',
        }
    }
}

// Scanned in order; the first level present in the flags wins.
const SEVERITY_TABLE: [(LogLevelFlags, LogPriority); 5] = [
    (LogLevelFlags::DEBUG, LogPriority::Debug),
    (LogLevelFlags::INFO, LogPriority::Info),
    (LogLevelFlags::WARNING, LogPriority::Warn),
    (LogLevelFlags::CRITICAL, LogPriority::Error),
    (LogLevelFlags::ERROR, LogPriority::Fatal),
];

/// Maps a severity bitmask onto the platform priority.
///
/// `fatal` wins over any level bit. `MESSAGE`, or no recognised bit at all,
/// falls back to [`LogPriority::Info`].
pub fn translate_severity(level: LogLevelFlags, fatal: bool) -> LogPriority {
    if fatal {
        return LogPriority::Fatal;
    }

    SEVERITY_TABLE
        .iter()
        .find(|(flag, _)| level.intersects(*flag))
        .map(|(_, priority)| *priority)
        .unwrap_or(LogPriority::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_maps_to_warn() {
        assert_eq!(
            translate_severity(LogLevelFlags::WARNING, false),
            LogPriority::Warn
        );
    }

    #[test]
    fn test_fatal_overrides_level() {
        assert_eq!(
            translate_severity(LogLevelFlags::DEBUG, true),
            LogPriority::Fatal
        );
    }

    #[test]
    fn test_no_level_defaults_to_info() {
        assert_eq!(
            translate_severity(LogLevelFlags::empty(), false),
            LogPriority::Info
        );
        assert_eq!(
            translate_severity(LogLevelFlags::MESSAGE, false),
            LogPriority::Info
        );
        assert_eq!(
            translate_severity(LogLevelFlags::RECURSION, false),
            LogPriority::Info
        );
    }

    #[test]
    fn test_each_level() {
        assert_eq!(translate_severity(LogLevelFlags::DEBUG, false), LogPriority::Debug);
        assert_eq!(translate_severity(LogLevelFlags::INFO, false), LogPriority::Info);
        assert_eq!(translate_severity(LogLevelFlags::CRITICAL, false), LogPriority::Error);
        assert_eq!(translate_severity(LogLevelFlags::ERROR, false), LogPriority::Fatal);
    }

    #[test]
    fn test_table_order_decides_mixed_levels() {
        let level = LogLevelFlags::WARNING | LogLevelFlags::DEBUG;
        assert_eq!(translate_severity(level, false), LogPriority::Debug);
    }

    #[test]
    fn test_tracing_levels() {
        assert_eq!(LogLevelFlags::from(tracing::Level::ERROR), LogLevelFlags::CRITICAL);
        assert_eq!(LogLevelFlags::from(tracing::Level::WARN), LogLevelFlags::WARNING);
        assert_eq!(LogLevelFlags::from(tracing::Level::TRACE), LogLevelFlags::DEBUG);
    }

    #[test]
    fn test_priority_values() {
        assert_eq!(LogPriority::Info as i32, 4);
        assert_eq!(LogPriority::Fatal as i32, 7);
        assert_eq!(LogPriority::Warn.letter(), 'W');
    }
}
