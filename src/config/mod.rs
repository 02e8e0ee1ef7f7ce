//! Configuration management
//!
//! Settings are read from defaults, an optional TOML file and the
//! environment, in that order of increasing priority.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, default_config_path};
pub use settings::{ApiSettings, IdentitySettings, LoggingSettings, NetworkSettings, Settings};
