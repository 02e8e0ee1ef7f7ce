//! `disguise` binary: perform one request as an emulated browser client
//!
//! # Usage
//!
//! ```bash
//! disguise --path users/@me --token "$TOKEN"
//! disguise --path channels/123/messages --method post --body '{"content":"hi"}'
//! ```
//!
//! The normalized result is printed to stdout as JSON. Network failures are
//! reported as `{"internalError": true, "error": "..."}`.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use disguise::{
    cli::{RequestArgs, parse_header, run_request_mode},
    request::Verb,
    utils::VERSION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    Get,
    Post,
    Patch,
}

impl From<Method> for Verb {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Verb::Read,
            Method::Post => Verb::Create,
            Method::Patch => Verb::Modify,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "disguise")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Endpoint path below the API root, e.g. users/@me
    #[arg(long, value_name = "PATH", required_unless_present = "version")]
    path: Option<String>,

    /// HTTP method
    #[arg(short, long, value_enum, default_value_t = Method::Get)]
    method: Method,

    /// JSON body for post/patch
    #[arg(short, long, value_name = "JSON")]
    body: Option<String>,

    /// Proxy server URL (http://host:port, socks5://host:port, etc.)
    #[arg(short, long, value_name = "PROXY")]
    proxy: Option<String>,

    /// Account token sent as authorization
    #[arg(short, long, value_name = "TOKEN")]
    token: Option<String>,

    /// Extra header, repeatable (NAME:VALUE)
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Send client properties as x-track
    #[arg(long)]
    registering: bool,

    /// Show version information
    #[arg(long)]
    version: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", VERSION);
        return Ok(());
    }

    let args = RequestArgs {
        config: cli.config,
        path: cli.path.unwrap_or_default(),
        verb: cli.method.into(),
        body: cli.body,
        proxy: cli.proxy,
        token: cli.token,
        headers: cli.headers,
        registering: cli.registering,
        verbose: cli.verbose,
    };

    match run_request_mode(args).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to perform request. Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
