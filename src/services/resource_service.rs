//! Resource center: external links and general learning files.

use std::sync::Arc;
use tracing::warn;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Material, ResourceLink};
use crate::domain::ports::MaterialStore;
use crate::services::ingest::is_empty_upload;

pub struct ResourceService {
    store: Arc<dyn MaterialStore>,
    links: Vec<ResourceLink>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn MaterialStore>, links: Vec<ResourceLink>) -> Self {
        Self { store, links }
    }

    pub fn links(&self) -> &[ResourceLink] {
        &self.links
    }

    /// Store a learning file. Empty uploads are ignored and return `None`.
    pub async fn upload(&self, filename: &str, bytes: &[u8]) -> DomainResult<Option<Material>> {
        if is_empty_upload(bytes) {
            warn!(filename, "ignoring empty upload");
            return Ok(None);
        }
        self.store.store(filename, bytes).await.map(Some)
    }

    /// Uploaded files, most recent first.
    pub async fn materials(&self) -> DomainResult<Vec<Material>> {
        self.store.list().await
    }

    /// An uploaded file and its bytes.
    pub async fn download(&self, filename: &str) -> DomainResult<(Material, Vec<u8>)> {
        self.store
            .read(filename)
            .await?
            .ok_or_else(|| DomainError::MaterialNotFound(filename.trim().to_string()))
    }
}
