//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: access guard, path decoding,
//! and dispatch to the listing or retrieval handlers.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Body as _;
use hyper::header::HeaderMap;
use hyper::{Request, Response, Version};

use crate::config::{AppState, AuthConfig};
use crate::handler::{listing, object};
use crate::http::{self, cookie, url, ResponseBody};
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling.
///
/// Never fails the transport: every outcome, including storage backend
/// failures, is turned into a response.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<ResponseBody>, Infallible> {
    let started = Instant::now();
    let access_log = state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed);

    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version()).to_string();
    entry.referer = header_string(req.headers(), "referer");
    entry.user_agent = header_string(req.headers(), "user-agent");

    if access_log {
        logger::log_request(req.method(), req.uri(), &entry.http_version);
    }

    // 1. Access guard: both cookies must match the configured secrets
    let cookie_header = req
        .headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok());
    let response = if check_cookies(cookie_header, &state.config.auth) {
        dispatch(req.uri().path(), &state).await
    } else {
        logger::log_warning(&format!(
            "Rejected request for {} (cookie check failed)",
            req.uri().path()
        ));
        http::build_forbidden_response()
    };

    if access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check the `_uid` and `_secret` cookies against the configured values
fn check_cookies(cookie_header: Option<&str>, auth: &AuthConfig) -> bool {
    let cookies = cookie::parse_cookie_header(cookie_header);
    cookies.get("_uid").is_some_and(|v| *v == auth.uid)
        && cookies.get("_secret").is_some_and(|v| *v == auth.secret)
}

/// Decode the path and dispatch on its segment count.
///
/// One segment beyond the root (including the empty root itself) is a
/// listing prefix; anything deeper is an object key.
async fn dispatch(path: &str, state: &AppState) -> Response<ResponseBody> {
    let decoded = url::percent_decode(path);
    let key = decoded.strip_prefix('/').unwrap_or(&decoded);

    let result = if key.split('/').count() == 1 {
        listing::serve_listing(key, state).await
    } else {
        object::serve_object(key, state).await
    };

    result.unwrap_or_else(|e| {
        logger::log_error(&format!("Storage backend failure for '{key}': {e}"));
        http::build_error_response()
    })
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
