use crate::core::log::{LogPriority, LogWriter};

/// Host fallback for the platform log, printed in logcat's brief format.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogWriter;

impl StderrLogWriter {
    pub fn format(priority: LogPriority, tag: &str, message: &str) -> String {
        format!("{}/{}: {}", priority.letter(), tag, message)
    }
}

impl LogWriter for StderrLogWriter {
    fn write(&self, priority: LogPriority, tag: &str, message: &str) {
        let line = Self::format(priority, tag, message);
        if priority >= LogPriority::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brief_format() {
        assert_eq!(
            StderrLogWriter::format(LogPriority::Error, "GLib", "boom"),
            "E/GLib: boom"
        );
    }
}
