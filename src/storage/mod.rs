//! Object store binding module
//!
//! The browser never talks to a concrete storage product: handlers see the
//! [`ObjectStore`] capability only, so a test double can stand in for the
//! real backend. Keys are slash-delimited paths doubling as the
//! course/chapter/lecture hierarchy.

pub mod fs;
pub mod memory;

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io;
use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;
use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_ENCODING,
    CONTENT_LANGUAGE, CONTENT_TYPE,
};

use crate::http::mime;

/// Byte stream of a stored object's body
pub type ObjectBody = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync + 'static>>;

/// HTTP metadata stored alongside an object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpMetadata {
    pub content_type: Option<String>,
    pub content_language: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    pub cache_control: Option<String>,
}

impl HttpMetadata {
    /// Metadata derived from a key's file extension
    pub fn for_key(key: &str) -> Self {
        let extension = std::path::Path::new(key)
            .extension()
            .and_then(|e| e.to_str());
        Self {
            content_type: Some(mime::content_type_for(extension).to_string()),
            ..Self::default()
        }
    }

    /// Project the stored metadata onto outgoing response headers.
    ///
    /// Values that are not representable as header values are skipped.
    pub fn apply(&self, headers: &mut HeaderMap) {
        let fields = [
            (CONTENT_TYPE, &self.content_type),
            (CONTENT_LANGUAGE, &self.content_language),
            (CONTENT_DISPOSITION, &self.content_disposition),
            (CONTENT_ENCODING, &self.content_encoding),
            (CACHE_CONTROL, &self.cache_control),
        ];
        for (name, field) in fields {
            if let Some(value) = field {
                if let Ok(value) = HeaderValue::from_str(value) {
                    headers.insert(name, value);
                }
            }
        }
    }
}

/// One entry of a listing result
#[derive(Debug, Clone)]
pub struct ObjectEntry {
    /// Slash-delimited object key, unique within the store
    pub key: String,
    /// Opaque user-defined metadata
    pub custom_metadata: HashMap<String, String>,
    /// Stored HTTP metadata
    pub http_metadata: HttpMetadata,
}

/// A fetched object: metadata plus its byte stream
pub struct StoredObject {
    pub key: String,
    pub http_metadata: HttpMetadata,
    pub custom_metadata: HashMap<String, String>,
    /// Entity tag of the stored content
    pub etag: String,
    pub body: ObjectBody,
}

/// Capability interface over the object storage backend.
///
/// Two operations only: list-by-prefix and get-by-key. Listing order must be
/// stable across calls for an unchanged store; it is not required sorted.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List entries whose key starts with `prefix`.
    ///
    /// When `include_metadata` is false the backend may leave the metadata
    /// fields at their defaults.
    async fn list(&self, prefix: &str, include_metadata: bool) -> io::Result<Vec<ObjectEntry>>;

    /// Fetch a single object by exact key. `Ok(None)` when absent.
    async fn get(&self, key: &str) -> io::Result<Option<StoredObject>>;
}

/// Generate an entity tag from object content using fast hashing
pub fn content_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}
