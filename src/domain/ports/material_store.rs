use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Material;

/// Storage for general learning files uploaded to the resource center
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Persist a file and record it in the manifest
    ///
    /// Uploading the same filename again replaces the earlier copy.
    async fn store(&self, filename: &str, bytes: &[u8]) -> DomainResult<Material>;

    /// Recorded materials, most recent upload first
    async fn list(&self) -> DomainResult<Vec<Material>>;

    /// A recorded material and its bytes, or `None` if no upload has that name
    async fn read(&self, filename: &str) -> DomainResult<Option<(Material, Vec<u8>)>>;
}
