use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8765;

/// The hosted API the app talks to. `/api/*` requests are relayed here so the
/// browser sees same-origin responses instead of CORS failures.
pub const API_UPSTREAM: &str = "https://web-production-1b15c.up.railway.app";

pub const PROXY_PREFIX: &str = "/api/";

pub const PROXY_USER_AGENT: &str = concat!("devserve/", env!("CARGO_PKG_VERSION"));

pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// Checked in order when a directory is requested.
pub const INDEX_FILES: &[&str] = &["index.html", "index.htm"];
