//! Disguise - browser-identity request construction
//!
//! Builds requests against a proprietary REST API so that they look like they
//! come from a real browser client: a consistent user agent and client hints,
//! an optional fingerprint and client-properties blob, a session cookie
//! derived once per identity, and wire payloads for the common actions.
//!
//! # Architecture
//!
//! - [`identity`]: the emulated client and its tokens
//! - [`session`]: one-shot session cookie derivation
//! - [`payload`]: message, interaction and custom status bodies
//! - [`request`]: descriptor construction and execution
//! - [`config`]: settings from defaults, TOML and the environment
//!
//! # Usage
//!
//! ```bash
//! disguise --path users/@me --token "$TOKEN"
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use disguise::{
//!     Requester, Settings,
//!     payload::{MessagePayload, SendMessageOptions},
//! };
//!
//! # async fn example() -> disguise::Result<()> {
//! let settings = Settings::default();
//! let requester = Requester::new(&settings)?;
//! let identity = settings.build_identity();
//!
//! let message = MessagePayload::build(SendMessageOptions::new("hello")).await?;
//! let result = requester.send_message("1234", message, &identity).await?;
//! println!("{}", result.to_json());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod payload;
pub mod request;
pub mod session;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use identity::{ClientIdentity, ClientIdentityBuilder};
pub use request::{NormalizedResult, RequestBuilder, Requester, Verb};
pub use session::{CookieSource, SessionCookieProvider};
