//! Request construction and execution
//!
//! - [`builder`]: descriptors with the emulated browser header set
//! - [`transport`]: execution with normalized outcomes
//! - [`requester`]: facade tying both to a configured service

pub mod builder;
pub mod requester;
pub mod transport;

pub use builder::{HeaderOverrides, RequestBuilder, RequestDescriptor, Verb};
pub use requester::Requester;
pub use transport::{NetworkFailure, NormalizedResult, Transport};
