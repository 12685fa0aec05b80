use crate::config;
use crate::err::ProxyError;
use crate::http::ProxyClient;
use crate::response::{self, FullBody};
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Uri};

/// What the upstream said. Non-2xx statuses are still successes; only
/// transport-level failures become `ProxyError`s.
pub struct Upstream {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

pub async fn respond(uri: &Uri, client: &ProxyClient, upstream_base: &str) -> Response<FullBody> {
    let target = match uri.path_and_query() {
        Some(pq) => format!("{}{}", upstream_base, pq.as_str()),
        None => format!("{}{}", upstream_base, uri.path()),
    };

    match fetch(client, &target).await {
        Ok(upstream) => {
            log::debug!("{} -> {} [{}]", uri, target, upstream.status);
            response::passthrough(upstream.status, upstream.content_type, upstream.body)
        }
        Err(e) => {
            log::warn!("{} -> [proxy error] {} : {}", uri, target, e);
            response::text(StatusCode::BAD_GATEWAY, format!("Proxy error: {e}"))
        }
    }
}

/// One outbound GET, the whole exchange (connect through full body read)
/// bounded by the fixed timeout. No retries.
async fn fetch(client: &ProxyClient, target: &str) -> Result<Upstream, ProxyError> {
    let req = Request::builder()
        .method(Method::GET)
        .uri(target)
        .header(USER_AGENT, config::PROXY_USER_AGENT)
        .body(Empty::<Bytes>::new())?;

    let exchange = async {
        let resp = client.request(req).await?;
        let (parts, body) = resp.into_parts();
        let body = body.collect().await?.to_bytes();
        Ok(Upstream {
            status: parts.status,
            content_type: parts.headers.get(CONTENT_TYPE).cloned(),
            body,
        })
    };

    match tokio::time::timeout(config::UPSTREAM_TIMEOUT, exchange).await {
        Ok(result) => result,
        Err(_) => Err(ProxyError::TimedOut),
    }
}
