#![allow(clippy::type_complexity)]

mod config;
mod err;
mod files;
mod http;
mod mime;
mod opt;
mod proxy;
mod response;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options {
        port,
        upstream,
        root,
        verbose,
    } = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    // Catch a malformed upstream at startup instead of on the first request.
    upstream.parse::<hyper::Uri>()?;

    let root = match root {
        Some(root) => root,
        None => default_root()?,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let server = http::Server::bind(addr).await?;
    log::info!(
        "Serving {} at http://localhost:{} ({}* -> {})",
        root.display(),
        port,
        config::PROXY_PREFIX,
        upstream
    );

    let state = routes::State {
        client: http::make_client()?,
        upstream,
        root,
    };
    server.serve(state, routes::respond_to_request).await?;

    Ok(())
}

/// The directory the binary was deployed to, next to the app's static files.
fn default_root() -> Result<PathBuf, std::io::Error> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf))
}
