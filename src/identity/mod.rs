//! Client identity emulation
//!
//! This module holds the synthetic identity a session presents: platform and
//! browser labels, the derived user agent and client hints, the fingerprint
//! and session tokens, and the optional client-properties blob.

pub mod client;
pub mod profile;
pub mod properties;
pub mod tokens;

pub use client::{ClientIdentity, ClientIdentityBuilder};
pub use profile::{Browser, Platform};
pub use properties::ClientProperties;
pub use tokens::{Fingerprint, SessionUid, Snowflake};
