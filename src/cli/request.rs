//! One-shot request mode
//!
//! Loads configuration, applies command-line overrides, builds a fresh
//! identity and performs a single request.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Registry, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use crate::{
    config::{ConfigLoader, Settings},
    payload::ActionBody,
    request::{HeaderOverrides, Requester, Verb},
    utils::version,
};

/// Arguments for request mode
#[derive(Debug, Clone)]
pub struct RequestArgs {
    pub config: Option<PathBuf>,
    pub path: String,
    pub verb: Verb,
    pub body: Option<String>,
    pub proxy: Option<String>,
    pub token: Option<String>,
    pub headers: Vec<(String, String)>,
    pub registering: bool,
    pub verbose: bool,
}

/// Parse a `name:value` header flag
pub fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(format!("invalid header name in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Handle used to swap the log filter once settings are loaded
pub type LogReloadHandle = reload::Handle<EnvFilter, Registry>;

/// Install the stderr subscriber before configuration is read
///
/// Returns `None` when a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Option<LogReloadHandle> {
    let initial = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let (filter, handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok()?;

    Some(handle)
}

/// Filter directive for the configured logging settings
pub fn log_directive(settings: &Settings) -> String {
    if settings.logging.verbose {
        "debug".to_string()
    } else {
        settings.logging.level.to_ascii_lowercase()
    }
}

/// Switch to the configured level; `RUST_LOG` keeps precedence
pub fn apply_log_settings(handle: &LogReloadHandle, settings: &Settings) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    set_log_directive(handle, &log_directive(settings));
}

fn set_log_directive(handle: &LogReloadHandle, directive: &str) {
    if let Err(e) = handle.reload(EnvFilter::new(directive)) {
        warn!("Could not apply log level {}: {}", directive, e);
    }
}

/// Load configuration and layer the command-line flags on top
pub fn resolve_settings(args: &RequestArgs, loader: &ConfigLoader) -> crate::Result<Settings> {
    let mut settings = loader.load_default(args.config.as_deref())?;

    if let Some(proxy) = &args.proxy {
        settings.network.proxy = Some(proxy.clone());
    }
    if let Some(token) = &args.token {
        settings.identity.authorization = Some(token.clone());
    }
    if args.registering {
        settings.api.registering = true;
    }
    if args.verbose {
        settings.logging.verbose = true;
    }

    settings.validate()?;
    Ok(settings)
}

/// Run a single request and return the normalized result as JSON
pub async fn run_request_mode(args: RequestArgs) -> Result<Value> {
    let logs = init_logging(args.verbose);
    let settings = resolve_settings(&args, &ConfigLoader::new())?;
    if let Some(handle) = &logs {
        apply_log_settings(handle, &settings);
    }

    info!("disguise v{}", version::get_version());

    let body = args
        .body
        .as_deref()
        .map(|raw| serde_json::from_str::<Value>(raw).context("--body is not valid JSON"))
        .transpose()?
        .map(ActionBody::Json);

    let extra: HeaderOverrides = args.headers.iter().cloned().collect();
    let identity = settings.build_identity();
    debug!("Using identity {:?}", identity);

    let requester = Requester::new(&settings)?;
    let result = requester
        .fetch(&args.path, body, &identity, args.verb, &extra)
        .await?;

    Ok(result.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args() -> RequestArgs {
        RequestArgs {
            config: None,
            path: "users/@me".to_string(),
            verb: Verb::Read,
            body: None,
            proxy: None,
            token: None,
            headers: Vec::new(),
            registering: false,
            verbose: false,
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[rstest]
    #[case("x-debug:1", ("x-debug", "1"))]
    #[case("X-Context-Properties: abc", ("X-Context-Properties", "abc"))]
    #[case("referer:https://discord.com/channels/@me", ("referer", "https://discord.com/channels/@me"))]
    fn test_parse_header(#[case] raw: &str, #[case] expected: (&str, &str)) {
        let (name, value) = parse_header(raw).unwrap();
        assert_eq!((name.as_str(), value.as_str()), expected);
    }

    #[rstest]
    #[case("no-colon")]
    #[case(":value")]
    #[case("bad name:value")]
    fn test_parse_header_rejects(#[case] raw: &str) {
        assert!(parse_header(raw).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[network]\nproxy = \"http://file:3128\"\n\n[identity]\nauthorization = \"file-token\"\n",
        )
        .unwrap();

        let mut args = args();
        args.config = Some(path);
        args.proxy = Some("http://flag:3128".to_string());
        args.token = Some("flag-token".to_string());
        args.registering = true;
        args.verbose = true;

        let settings = resolve_settings(&args, &ConfigLoader::with_env(no_env)).unwrap();
        assert_eq!(settings.network.proxy.as_deref(), Some("http://flag:3128"));
        assert_eq!(settings.identity.authorization.as_deref(), Some("flag-token"));
        assert!(settings.api.registering);
        assert!(settings.logging.verbose);
    }

    #[test]
    fn test_log_directive_follows_settings() {
        let mut settings = Settings::default();
        settings.logging.level = "WARN".to_string();
        assert_eq!(log_directive(&settings), "warn");

        settings.logging.verbose = true;
        assert_eq!(log_directive(&settings), "debug");
    }

    #[test]
    fn test_filter_reloads_after_settings_load() {
        let (_layer, handle) = reload::Layer::<EnvFilter, Registry>::new(EnvFilter::new("info"));

        set_log_directive(&handle, "warn");

        let current = handle.with_current(|filter| filter.to_string()).unwrap();
        assert_eq!(current, "warn");
    }

    #[test]
    fn test_invalid_proxy_flag_rejected() {
        let mut args = args();
        args.proxy = Some("::nope".to_string());
        let result = resolve_settings(&args, &ConfigLoader::with_env(no_env));
        assert!(result.is_err());
    }
}
