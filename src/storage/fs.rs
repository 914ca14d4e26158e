//! Filesystem-backed object store
//!
//! Maps slash-delimited keys onto files under a root directory. Listing is
//! a recursive walk returning keys in sorted order, which keeps the listing
//! order stable across calls. HTTP metadata is derived from the file
//! extension; the entity tag from file length and mtime.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio_util::io::ReaderStream;

use super::{HttpMetadata, ObjectEntry, ObjectStore, StoredObject};
use crate::logger;

/// Object store over a local directory tree
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path under the root.
    ///
    /// Keys with `..` segments or a leading slash do not name objects and
    /// resolve to nothing.
    fn resolve(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.starts_with('/') {
            return None;
        }
        if key.split('/').any(|segment| segment == "..") {
            return None;
        }
        Some(self.root.join(key))
    }

    /// Relative key for a file discovered under the root
    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(segments.join("/"))
    }

    /// Walk the whole tree and return every file key, sorted
    async fn walk_keys(&self) -> io::Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound && dir == self.root => {
                    logger::log_warning(&format!(
                        "Library root '{}' does not exist, listing as empty",
                        self.root.display()
                    ));
                    return Ok(Vec::new());
                }
                Err(e) => return Err(e),
            };

            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    if let Some(key) = self.key_for(&entry.path()) {
                        keys.push(key);
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn list(&self, prefix: &str, include_metadata: bool) -> io::Result<Vec<ObjectEntry>> {
        let keys = self.walk_keys().await?;

        Ok(keys
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .map(|key| {
                let http_metadata = if include_metadata {
                    HttpMetadata::for_key(&key)
                } else {
                    HttpMetadata::default()
                };
                ObjectEntry {
                    key,
                    custom_metadata: HashMap::new(),
                    http_metadata,
                }
            })
            .collect())
    }

    async fn get(&self, key: &str) -> io::Result<Option<StoredObject>> {
        let Some(path) = self.resolve(key) else {
            return Ok(None);
        };

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(None);
        }

        Ok(Some(StoredObject {
            key: key.to_string(),
            http_metadata: HttpMetadata::for_key(key),
            custom_metadata: HashMap::new(),
            etag: file_etag(&metadata),
            body: Box::pin(ReaderStream::new(file)),
        }))
    }
}

/// Entity tag from file length and modification time
fn file_etag(metadata: &std::fs::Metadata) -> String {
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs());
    format!("\"{:x}-{:x}\"", metadata.len(), mtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use hyper::body::Bytes;

    async fn seeded_store() -> (tempfile::TempDir, FsStore) {
        let dir = tempfile::tempdir().unwrap();
        for (key, content) in [
            ("math/ch1/lec1.html", "algebra"),
            ("math/ch1/lec2.html", "geometry"),
            ("math/ch2/lec1.html", "calculus"),
            ("physics/ch1/intro.html", "mechanics"),
        ] {
            let path = dir.path().join(key);
            fs::create_dir_all(path.parent().unwrap()).await.unwrap();
            fs::write(&path, content).await.unwrap();
        }
        let store = FsStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_list_all_sorted() {
        let (_dir, store) = seeded_store().await;
        let entries = store.list("", true).await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(
            keys,
            [
                "math/ch1/lec1.html",
                "math/ch1/lec2.html",
                "math/ch2/lec1.html",
                "physics/ch1/intro.html",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_prefix_filter() {
        let (_dir, store) = seeded_store().await;
        let entries = store.list("math/ch1", true).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.key.starts_with("math/ch1")));
        assert_eq!(
            entries[0].http_metadata.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn test_list_missing_root_is_empty() {
        let store = FsStore::new("/nonexistent/lectern-library");
        let entries = store.list("", true).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_get_streams_content_with_etag() {
        let (_dir, store) = seeded_store().await;
        let object = store.get("math/ch1/lec1.html").await.unwrap().unwrap();
        assert_eq!(object.key, "math/ch1/lec1.html");
        assert!(object.etag.starts_with('"') && object.etag.ends_with('"'));
        assert_eq!(
            object.http_metadata.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );

        let chunks: Vec<Bytes> = object.body.try_collect().await.unwrap();
        let body: Vec<u8> = chunks.concat();
        assert_eq!(body, b"algebra");
    }

    #[tokio::test]
    async fn test_get_absent_key() {
        let (_dir, store) = seeded_store().await;
        assert!(store.get("math/ch9/lec1.html").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_rejects_escaping_keys() {
        let (_dir, store) = seeded_store().await;
        assert!(store.get("../outside").await.unwrap().is_none());
        assert!(store.get("math/../../outside").await.unwrap().is_none());
        assert!(store.get("/etc/hostname").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_directory_is_absent() {
        let (_dir, store) = seeded_store().await;
        assert!(store.get("math/ch1").await.unwrap().is_none());
    }
}
