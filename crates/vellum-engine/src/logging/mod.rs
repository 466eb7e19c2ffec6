//! Logger setup.
//!
//! The engine only talks to the `log` facade; binaries and tests opt into a
//! concrete `env_logger` sink through [`init_logging`].

mod init;

pub use init::{LoggingConfig, init_logging};
