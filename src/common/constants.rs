// Identifiers reserved by the native app glue for its own sources.
pub const LOOPER_ID_MAIN: i32 = 1;
pub const LOOPER_ID_INPUT: i32 = 2;
// First identifier available to descriptors registered by the adapter.
pub const LOOPER_ID_USER: i32 = 3;

pub const POLL_RESULT_ERROR: i32 = -1;
pub const POLL_RESULT_TIMEOUT: i32 = 0;
pub const POLL_RESULT_READY: i32 = 1;

pub const DEFAULT_MAX_EVENTS: usize = 16;
pub const MAX_EVENTS_LIMIT: usize = 1024;

pub const DEFAULT_LOG_TAG: &str = "looper-poll";
pub const DEFAULT_LOG_FILTER: &str = "info";
