//! HTTP response building module
//!
//! Provides builders for the browser's response shapes, decoupled from the
//! listing/retrieval business logic. Fixed bodies are buffered; object
//! bodies are streamed straight from the store.

use futures_util::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::HeaderValue;
use hyper::Response;

use crate::logger;
use crate::storage::StoredObject;

/// Unified response body type: buffered or streamed, one error type.
pub type ResponseBody = BoxBody<Bytes, std::io::Error>;

/// Wrap a fixed byte payload as a [`ResponseBody`]
fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Build 403 Forbidden response (cookie check failed)
pub fn build_forbidden_response() -> Response<ResponseBody> {
    Response::builder()
        .status(403)
        .header("Content-Type", "text/plain; charset=UTF-8")
        .body(full("Forbidden"))
        .unwrap_or_else(|e| {
            log_build_error("403", &e);
            Response::new(full("Forbidden"))
        })
}

/// Build 404 Not Found response (object key absent)
pub fn build_not_found_response() -> Response<ResponseBody> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=UTF-8")
        .body(full("Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(full("Not Found"))
        })
}

/// Build 500 Internal Server Error response (storage backend failure)
pub fn build_error_response() -> Response<ResponseBody> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=UTF-8")
        .body(full("Internal Server Error"))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(full("Internal Server Error"))
        })
}

/// Build 200 HTML response for a rendered listing page
pub fn build_html_response(content: String) -> Response<ResponseBody> {
    let content_length = content.len();

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=UTF-8")
        .header("Content-Length", content_length)
        .body(full(content))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(full(Bytes::new()))
        })
}

/// Build 200 response streaming a stored object.
///
/// Headers are projected from the object's stored HTTP metadata, plus an
/// explicit `etag`. The body passes through chunk by chunk, unbuffered.
pub fn build_object_response(object: StoredObject) -> Response<ResponseBody> {
    let body = StreamBody::new(object.body.map_ok(Frame::data)).boxed();

    let mut response = Response::new(body);
    object.http_metadata.apply(response.headers_mut());
    if let Ok(value) = HeaderValue::from_str(&object.etag) {
        response.headers_mut().insert("etag", value);
    } else {
        logger::log_warning(&format!(
            "Dropping unrepresentable etag for '{}'",
            object.key
        ));
    }

    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_shape() {
        let response = build_forbidden_response();
        assert_eq!(response.status(), 403);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/plain; charset=UTF-8"
        );
    }

    #[test]
    fn test_not_found_shape() {
        let response = build_not_found_response();
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_html_shape() {
        let response = build_html_response("<html></html>".to_string());
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/html; charset=UTF-8"
        );
        assert_eq!(response.headers().get("Content-Length").unwrap(), "13");
    }
}
