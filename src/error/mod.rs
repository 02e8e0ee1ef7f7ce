//! Error handling for the request layer
//!
//! This module defines the error type returned by request construction,
//! cookie derivation and configuration loading.

pub mod types;

pub use types::{Error, Result};
