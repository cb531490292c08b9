//! Logging utilities.
//!
//! Centralizes logger initialization. Library code only talks to the `log`
//! facade; the binary decides whether to install `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
