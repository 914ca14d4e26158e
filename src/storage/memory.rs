//! In-memory object store
//!
//! Insertion-ordered store used as the test double for handler logic and as
//! a seed backend for small fixed libraries. Listing returns entries in the
//! order they were inserted.

use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use futures_util::stream;
use hyper::body::Bytes;

use super::{content_etag, HttpMetadata, ObjectEntry, ObjectStore, StoredObject};

struct MemoryObject {
    data: Bytes,
    custom_metadata: HashMap<String, String>,
    http_metadata: HttpMetadata,
}

/// Object store holding everything in process memory
#[derive(Default)]
pub struct MemoryStore {
    // Association list, not a map: listing order is first-insertion order
    objects: Vec<(String, MemoryObject)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, deriving HTTP metadata from the key's extension.
    /// Re-inserting an existing key replaces its content in place.
    pub fn insert(&mut self, key: &str, data: impl Into<Bytes>) {
        self.insert_with(key, data, HttpMetadata::for_key(key), HashMap::new());
    }

    /// Insert an object with explicit metadata
    pub fn insert_with(
        &mut self,
        key: &str,
        data: impl Into<Bytes>,
        http_metadata: HttpMetadata,
        custom_metadata: HashMap<String, String>,
    ) {
        let object = MemoryObject {
            data: data.into(),
            custom_metadata,
            http_metadata,
        };
        match self.objects.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = object,
            None => self.objects.push((key.to_string(), object)),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str, include_metadata: bool) -> io::Result<Vec<ObjectEntry>> {
        Ok(self
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| {
                let (custom_metadata, http_metadata) = if include_metadata {
                    (
                        object.custom_metadata.clone(),
                        object.http_metadata.clone(),
                    )
                } else {
                    (HashMap::new(), HttpMetadata::default())
                };
                ObjectEntry {
                    key: key.clone(),
                    custom_metadata,
                    http_metadata,
                }
            })
            .collect())
    }

    async fn get(&self, key: &str) -> io::Result<Option<StoredObject>> {
        let Some((_, object)) = self.objects.iter().find(|(k, _)| k == key) else {
            return Ok(None);
        };

        let data = object.data.clone();
        Ok(Some(StoredObject {
            key: key.to_string(),
            http_metadata: object.http_metadata.clone(),
            custom_metadata: object.custom_metadata.clone(),
            etag: content_etag(&data),
            body: Box::pin(stream::iter([Ok::<Bytes, io::Error>(data)])),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let mut store = MemoryStore::new();
        store.insert("b/1/x.html", "x");
        store.insert("a/1/y.html", "y");
        store.insert("b/2/z.html", "z");

        let entries = store.list("", true).await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["b/1/x.html", "a/1/y.html", "b/2/z.html"]);

        let entries = store.list("b/", true).await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["b/1/x.html", "b/2/z.html"]);
    }

    #[tokio::test]
    async fn test_reinsert_replaces_in_place() {
        let mut store = MemoryStore::new();
        store.insert("a/1/x.html", "old");
        store.insert("b/1/y.html", "y");
        store.insert("a/1/x.html", "new");

        let entries = store.list("", true).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "a/1/x.html");

        let object = store.get("a/1/x.html").await.unwrap().unwrap();
        let chunks: Vec<Bytes> = object.body.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"new");
    }

    #[tokio::test]
    async fn test_get_metadata_and_etag() {
        let mut store = MemoryStore::new();
        store.insert("math/ch1/lec1.html", "algebra");

        let object = store.get("math/ch1/lec1.html").await.unwrap().unwrap();
        assert_eq!(object.etag, content_etag(b"algebra"));
        assert_eq!(
            object.http_metadata.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );

        assert!(store.get("math/ch1/lec2.html").await.unwrap().is_none());
    }
}
