use crate::config;
use crate::files;
use crate::http::{Peer, ProxyClient};
use crate::proxy;
use crate::response::{self, FullBody};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Method, Request, Response, StatusCode};
use std::path::PathBuf;

pub struct State {
    pub client: ProxyClient,
    pub upstream: String,
    pub root: PathBuf,
}

pub async fn respond_to_request(req: Request<Incoming>, state: &State) -> Response<FullBody> {
    let resp = match *req.method() {
        Method::GET if req.uri().path().starts_with(config::PROXY_PREFIX) => {
            proxy::respond(req.uri(), &state.client, &state.upstream).await
        }
        Method::GET => files::respond(req.uri(), &state.root).await,
        _ => {
            let mut resp = response::text(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed\n");
            resp.headers_mut().insert(ALLOW, HeaderValue::from_static("GET"));
            resp
        }
    };

    // One access line per request: peer, request line, status.
    let peer = req.extensions().get::<Peer>();
    log::info!(
        "{} \"{} {} {:?}\" {}",
        peer.map_or_else(|| "-".to_string(), |p| p.0.to_string()),
        req.method(),
        req.uri(),
        req.version(),
        resp.status().as_u16(),
    );

    resp
}
