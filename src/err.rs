use crate::config;
use std::fmt::{self, Debug, Display};
use std::io;

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error wrapper so `main` exits printing the Display form, not the Debug form.
pub struct DisplayError(Error);

impl Debug for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T: Into<Error>> From<T> for DisplayError {
    fn from(display: T) -> Self {
        DisplayError(display.into())
    }
}

/// Why an outbound call to the upstream API failed. Each variant's Display is
/// what ends up after the `Proxy error: ` prefix in the 502 body.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("bad upstream request: {0}")]
    Request(#[from] hyper::http::Error),
    #[error("upstream unreachable: {0}")]
    Connect(#[from] hyper_util::client::legacy::Error),
    #[error("upstream body read failed: {0}")]
    Body(#[from] hyper::Error),
    #[error("upstream timed out after {:?}", config::UPSTREAM_TIMEOUT)]
    TimedOut,
}

pub trait IoErrorExt {
    fn applies_to(&self) -> AppliesTo;
}

impl IoErrorExt for io::Error {
    fn applies_to(&self) -> AppliesTo {
        match self.kind() {
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset => AppliesTo::Connection,
            _ => AppliesTo::Listener,
        }
    }
}

pub enum AppliesTo {
    Connection,
    Listener,
}
