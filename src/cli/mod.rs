//! Command-line front end
//!
//! Holds the logic behind the `disguise` binary so it can be tested without
//! spawning a process.

pub mod request;

pub use request::{
    LogReloadHandle, RequestArgs, apply_log_settings, init_logging, log_directive, parse_header,
    resolve_settings, run_request_mode,
};
