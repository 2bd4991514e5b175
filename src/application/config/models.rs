use crate::common::constants::{
    DEFAULT_LOG_FILTER, DEFAULT_LOG_TAG, DEFAULT_MAX_EVENTS, LOOPER_ID_USER,
};
use serde::{Deserialize, Serialize};

/// Integration settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GlueConfig {
    /// Install the severity bridge as the default log handler
    #[serde(default = "default_enabled")]
    pub log_handler: bool,

    /// Drive the event loop through the looper adapter
    #[serde(default = "default_enabled")]
    pub main_loop: bool,

    /// Tag for records without a domain
    #[serde(default = "default_log_tag")]
    pub log_tag: String,

    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Identifier of the first descriptor in each poll call
    #[serde(default = "default_base_ident")]
    pub base_ident: i32,

    /// Kernel events fetched per epoll wait
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

fn default_enabled() -> bool {
    true
}

fn default_log_tag() -> String {
    DEFAULT_LOG_TAG.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_base_ident() -> i32 {
    LOOPER_ID_USER
}

fn default_max_events() -> usize {
    DEFAULT_MAX_EVENTS
}

impl Default for GlueConfig {
    fn default() -> Self {
        Self {
            log_handler: default_enabled(),
            main_loop: default_enabled(),
            log_tag: default_log_tag(),
            log_filter: default_log_filter(),
            base_ident: default_base_ident(),
            max_events: default_max_events(),
        }
    }
}
