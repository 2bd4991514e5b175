pub mod constants;
pub mod error;
pub mod logger;
pub mod time;

pub use error::{GlueError, Result};
pub use logger::StderrLogWriter;
pub use time::PollTimeout;
