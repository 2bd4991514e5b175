use std::fmt::{self, Write as _};
use std::sync::OnceLock;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::common::constants::DEFAULT_LOG_TAG;
use crate::common::error::{GlueError, Result};
use crate::core::log::severity::LogLevelFlags;
use crate::core::log::sink::{log_sink, LogWriter};

/// `tracing` layer that hands every event to the platform log.
///
/// The event target becomes the log tag. A boolean `fatal = true` field
/// raises the record to the fatal priority.
pub struct LogBridgeLayer<W> {
    writer: W,
    default_tag: String,
}

impl<W: LogWriter> LogBridgeLayer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            default_tag: DEFAULT_LOG_TAG.to_string(),
        }
    }

    /// Tag for events whose target is empty.
    pub fn with_default_tag(mut self, tag: impl Into<String>) -> Self {
        self.default_tag = tag.into();
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<S, W> Layer<S> for LogBridgeLayer<W>
where
    S: Subscriber,
    W: LogWriter + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut record = RecordVisitor::default();
        event.record(&mut record);

        let level = LogLevelFlags::from(*metadata.level());
        let domain = match metadata.target() {
            "" => self.default_tag.as_str(),
            target => target,
        };
        log_sink(
            &self.writer,
            domain,
            level,
            record.fatal,
            &record.finish(),
        );
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: String,
    fatal: bool,
}

impl RecordVisitor {
    fn finish(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for RecordVisitor {
    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "fatal" {
            self.fatal = value;
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the bridge as the process-wide default log handler.
///
/// `RUST_LOG` takes precedence over `filter`. Returns `Ok(false)` when the
/// bridge is already installed; there is no way to remove it.
pub fn install_log_handler<W>(layer: LogBridgeLayer<W>, filter: &str) -> Result<bool>
where
    W: LogWriter + Send + Sync + 'static,
{
    if INSTALLED.get().is_some() {
        return Ok(false);
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter)
            .map_err(|e| GlueError::LogHandlerError(format!("Invalid log filter '{}': {}", filter, e)))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| GlueError::LogHandlerError(e.to_string()))?;

    let _ = INSTALLED.set(());
    Ok(true)
}
