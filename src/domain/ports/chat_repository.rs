use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ChatEntry;

/// Append-only chat log storage
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Append one exchange to the log
    async fn append(&self, entry: &ChatEntry) -> DomainResult<()>;

    /// Entries in insertion order, optionally filtered to one course.
    ///
    /// With a `limit`, only the most recent `limit` matching entries are
    /// returned, still oldest first.
    async fn list(&self, course: Option<&str>, limit: Option<usize>) -> DomainResult<Vec<ChatEntry>>;

    /// Drop entries, optionally only those of one course. Returns how many
    /// were removed.
    async fn clear(&self, course: Option<&str>) -> DomainResult<usize>;
}
