//! Object storage for generated files

mod http;
mod local;

use crate::errors::ProviderError;
use async_trait::async_trait;
use std::path::{Component, Path};

pub use http::*;
pub use local::*;

/// Persists a blob under a key and returns a URL referencing it.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ProviderError>;
}

/// Keys are relative paths made of normal segments only. Every `/`-separated
/// segment must be non-empty and neither `.` nor `..`, so a key always names
/// a file, never a directory.
pub(crate) fn validate_key(key: &str) -> Result<(), ProviderError> {
    let valid = !key.is_empty()
        && key.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && matches!(
                    Path::new(segment).components().next(),
                    Some(Component::Normal(_))
                )
        });
    if valid {
        Ok(())
    } else {
        Err(ProviderError::Upstream(format!("Invalid object key '{}'", key)))
    }
}
