use crate::err::{AppliesTo, IoErrorExt};
use http_body_util::Empty;
use hyper::body::{Body, Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use std::convert::Infallible;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Outbound requests carry no body; the proxy only issues GETs.
pub type ProxyClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

pub fn make_client() -> Result<ProxyClient, io::Error> {
    Ok(Client::builder(TokioExecutor::new()).build(
        HttpsConnectorBuilder::new()
            .with_native_roots()?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build(),
    ))
}

/// Peer address of the connection a request arrived on, stashed in request
/// extensions for the access log.
#[derive(Clone, Copy, Debug)]
pub struct Peer(pub SocketAddr);

pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub async fn bind(addr: SocketAddr) -> Result<Self, io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, io::Error> {
        self.listener.local_addr()
    }

    /// Accept loop: one spawned task per connection, `handle_req` called once
    /// per request with shared immutable state. Runs until the listener fails.
    pub async fn serve<S, F, B>(self, state: S, handle_req: F) -> Result<(), io::Error>
    where
        S: Send + Sync + 'static,
        F: for<'s> ServiceFn<'s, Request<Incoming>, S, Response<B>> + Copy + Send + 'static,
        B: Body + Send + 'static,
        <B as Body>::Data: Send,
        <B as Body>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let state = Arc::new(state);

        loop {
            let (tcp, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => match e.applies_to() {
                    AppliesTo::Connection => {
                        log::debug!("Aborted connection dropped: {}", e);
                        continue;
                    }
                    AppliesTo::Listener => return Err(e),
                },
            };
            let io = TokioIo::new(tcp);

            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let serve = service_fn(move |mut req| {
                    let state = Arc::clone(&state);
                    req.extensions_mut().insert(Peer(peer));
                    async move { Ok::<_, Infallible>(handle_req(req, &state).await) }
                });

                if let Err(e) = auto::Builder::new(TokioExecutor::new())
                    .serve_connection_with_upgrades(io, serve)
                    .await
                {
                    log::error!("Error serving connection: {}", e);
                }
            });
        }
    }
}

// Work around the lack of HKT bounds.
// Because the future will borrow from the state argument, we need to write bounds like this:
// ```
// where
//     F: for<'s> FnOnce(Request<Body>, &'s S) -> Fut<'s>
//     Fut<'s>: Future<Output = Result<Response<B>, E>> + 's
// ```
// Which can't currently be done. Instead, factor both bounds out to a dedicated trait,
// which is implemented for all matching functions.
pub trait ServiceFn<'s, T, S, R>
where
    Self: FnOnce(T, &'s S) -> Self::Fut,
    Self::Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut;
}

impl<'s, T, S, R, F, Fut> ServiceFn<'s, T, S, R> for F
where
    F: FnOnce(T, &'s S) -> Fut,
    Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut = Fut;
}
