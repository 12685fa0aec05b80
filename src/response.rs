use headers::{ContentLength, ContentType, HeaderMapExt};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, LOCATION};
use hyper::{Response, StatusCode};

/// Every response is fully buffered; bodies never stream.
pub type FullBody = Full<Bytes>;

/// Every builder here sets Content-Type and Content-Length explicitly, the
/// same bookkeeping the original handler performs on each response.
fn with_len(status: StatusCode, bytes: Bytes) -> Response<FullBody> {
    let len = bytes.len() as u64;
    let mut resp = Response::new(Full::new(bytes));
    *resp.status_mut() = status;
    resp.headers_mut().typed_insert(ContentLength(len));
    resp
}

pub fn text(status: StatusCode, body: impl Into<String>) -> Response<FullBody> {
    let mut resp = with_len(status, Bytes::from(body.into()));
    resp.headers_mut().typed_insert(ContentType::text());
    resp
}

pub fn html(status: StatusCode, body: String) -> Response<FullBody> {
    let mut resp = with_len(status, Bytes::from(body));
    resp.headers_mut().typed_insert(ContentType::html());
    resp
}

/// A 200 with the file's exact bytes and the inferred content-type.
pub fn file(bytes: Vec<u8>, content_type: &'static str) -> Response<FullBody> {
    let mut resp = with_len(StatusCode::OK, Bytes::from(bytes));
    resp.headers_mut()
        .insert(hyper::header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

/// Upstream passthrough: verbatim status and body, upstream's content-type if
/// it sent one, `application/json` otherwise.
pub fn passthrough(
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
) -> Response<FullBody> {
    let mut resp = with_len(status, body);
    match content_type {
        Some(ct) => {
            resp.headers_mut().insert(hyper::header::CONTENT_TYPE, ct);
        }
        None => resp.headers_mut().typed_insert(ContentType::json()),
    }
    resp
}

/// Permanent redirect adding the trailing slash to a directory path.
pub fn redirect(location: &str) -> Response<FullBody> {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut resp = text(StatusCode::MOVED_PERMANENTLY, "");
            resp.headers_mut().insert(LOCATION, value);
            resp
        }
        Err(_) => text(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};

    #[test]
    fn text_sets_type_and_length() {
        let resp = text(StatusCode::NOT_FOUND, "404 Not Found\n");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "14");
    }

    #[test]
    fn passthrough_defaults_to_json() {
        let resp = passthrough(StatusCode::OK, None, Bytes::from_static(b"{}"));
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "2");
    }

    #[test]
    fn passthrough_keeps_upstream_type() {
        let ct = HeaderValue::from_static("application/xml");
        let resp = passthrough(StatusCode::IM_A_TEAPOT, Some(ct), Bytes::from_static(b"<x/>"));
        assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/xml");
    }

    #[test]
    fn redirect_sets_location() {
        let resp = redirect("/sub/");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/sub/");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "0");
    }
}
