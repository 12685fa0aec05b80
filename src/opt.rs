use crate::config;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Serve the app's static files, passing /api/* through to the hosted API
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Port to listen on (all interfaces)
    #[arg(default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    #[arg(
        help = "Upstream base URL for /api/* requests (--help for more)",
        long_help = r"Upstream base URL for /api/* requests:
    - the inbound path and query string are appended verbatim
Examples:
    - https://web-production-1b15c.up.railway.app
    - http://localhost:9000"
    )]
    #[arg(long, default_value = config::API_UPSTREAM)]
    pub upstream: String,

    /// Document root for static files (defaults to the executable's directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}
