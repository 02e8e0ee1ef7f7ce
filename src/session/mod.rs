//! Session state shared across requests
//!
//! The session cookie is derived once per identity through a pluggable
//! [`CookieSource`] and reused for every later request.

pub mod cookie;

pub use cookie::{CookieSource, HttpCookieSource, LOCALE_COOKIE, SessionCookieProvider, compose_cookie_header};
