//! Object retrieval module
//!
//! Fetches a single object by key and hands its stored metadata and byte
//! stream back to the client.

use std::io;

use hyper::Response;

use crate::config::AppState;
use crate::http::{self, ResponseBody};

/// Serve a single object: 404 when the key is absent, otherwise a streamed
/// 200 carrying the stored HTTP metadata and etag.
pub async fn serve_object(key: &str, state: &AppState) -> io::Result<Response<ResponseBody>> {
    match state.store.get(key).await? {
        Some(object) => Ok(http::build_object_response(object)),
        None => Ok(http::build_not_found_response()),
    }
}
