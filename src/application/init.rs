//! Process integration: log handler and poll backend.
//!
//! The two capabilities are independent. [`InitFlags::LOG_HANDLER`] routes
//! every `tracing` record through the severity bridge to the platform log;
//! [`InitFlags::MAIN_LOOP`] prepares the calling thread's looper so the event
//! loop can poll through the adapter.

use crate::application::config::models::GlueConfig;
use crate::application::config::validator::validate_config;
use crate::application::ffi::{self, PollFunc, ThreadPoll};
use crate::common::error::Result;
use crate::core::event::{thread, PollBackend, SystemPoll};
use crate::core::log::{install_log_handler, LogBridgeLayer, PlatformLogWriter};
use bitflags::bitflags;
use tracing::{debug, info};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InitFlags: u32 {
        const LOG_HANDLER = 1 << 0;
        const MAIN_LOOP = 1 << 1;
    }
}

impl From<InitFlags> for GlueConfig {
    fn from(flags: InitFlags) -> Self {
        Self {
            log_handler: flags.contains(InitFlags::LOG_HANDLER),
            main_loop: flags.contains(InitFlags::MAIN_LOOP),
            ..GlueConfig::default()
        }
    }
}

/// What `init` set up.
#[derive(Debug)]
pub struct Glue {
    config: GlueConfig,
    log_handler_installed: bool,
}

pub fn init(flags: InitFlags) -> Result<Glue> {
    init_with_config(&GlueConfig::from(flags))
}

pub fn init_with_config(config: &GlueConfig) -> Result<Glue> {
    validate_config(config)?;

    let mut log_handler_installed = false;
    if config.log_handler {
        let layer = LogBridgeLayer::new(PlatformLogWriter::default()).with_default_tag(&config.log_tag);
        log_handler_installed = install_log_handler(layer, &config.log_filter)?;
        if !log_handler_installed {
            debug!("log handler already installed");
        }
    }

    if config.main_loop {
        thread::prepare_with_max_events(config.max_events)?;
        ffi::bind_thread(config.base_ident);
        info!(base_ident = config.base_ident, "looper poll adapter enabled");
    }

    Ok(Glue {
        config: config.clone(),
        log_handler_installed,
    })
}

impl Glue {
    pub fn config(&self) -> &GlueConfig {
        &self.config
    }

    /// `true` when this call installed the log handler.
    pub fn log_handler_installed(&self) -> bool {
        self.log_handler_installed
    }

    /// The poll backend for an event loop on the calling thread.
    ///
    /// The thread's looper adapter when the main-loop capability is enabled
    /// and the thread has a looper, otherwise the native `poll(2)`. The
    /// adapter is the one [`looper_poll`](ffi::looper_poll) uses.
    pub fn poll_backend(&self) -> Box<dyn PollBackend> {
        if !self.config.main_loop {
            return Box::new(SystemPoll);
        }
        match thread::for_thread() {
            Some(_) => Box::new(ThreadPoll::new(self.config.base_ident)),
            None => Box::new(SystemPoll),
        }
    }

    /// C entry point to install as a C event loop's poll function, or
    /// `None` to keep its default multiplexer.
    pub fn poll_func(&self) -> Option<PollFunc> {
        if self.config.main_loop {
            Some(ffi::looper_poll)
        } else {
            None
        }
    }
}
