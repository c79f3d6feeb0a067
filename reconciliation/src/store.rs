//! Object storage interface
//!
//! Thin I/O wrapper with no policy of its own: exports are read from it,
//! report artifacts are written to it.

use crate::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Keyed object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's contents
    async fn get(&self, key: &str) -> Result<String>;

    /// Write an object, replacing any existing one
    async fn put(&self, key: &str, body: &str) -> Result<()>;

    /// Stable locator for a key, suitable for report output
    fn location(&self, key: &str) -> String;
}

/// Filesystem-rooted object store.
///
/// Keys map to paths under the root; intermediate directories are created
/// on write.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, key: &str) -> Result<String> {
        let path = self.root.join(key);
        match std::fs::read_to_string(&path) {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::SourceNotFound(key.to_string()))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    async fn put(&self, key: &str, body: &str) -> Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, body)?;
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("file://{}", self.root.join(key).display())
    }
}
