use super::{validate_key, ObjectStore};
use crate::errors::ProviderError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Writes objects below a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    /// Returns a `file://` URL for the written object.
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ProviderError> {
        validate_key(key)?;
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;
        debug!("Stored {} ({}) at {}", key, content_type, path.display());

        let absolute = tokio::fs::canonicalize(&path).await?;
        Url::from_file_path(&absolute)
            .map(String::from)
            .map_err(|_| {
                ProviderError::Upstream(format!(
                    "Cannot build file URL for {}",
                    absolute.display()
                ))
            })
    }
}
