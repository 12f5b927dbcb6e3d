use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::VectorIndex;

/// Persistent cache of per-course vector indexes
#[async_trait]
pub trait VectorIndexStore: Send + Sync {
    /// Cached index for `course`, if any
    async fn load(&self, course: &str) -> DomainResult<Option<VectorIndex>>;

    /// Replace the cached index for `index.course`
    async fn save(&self, index: &VectorIndex) -> DomainResult<()>;

    /// Drop the cached index for `course`; returns whether one existed
    async fn remove(&self, course: &str) -> DomainResult<bool>;
}
