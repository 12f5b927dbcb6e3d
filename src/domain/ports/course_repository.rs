use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Course;

/// Repository trait for course storage operations
///
/// Implementations must treat a missing backing file as an empty store.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// All courses, ordered by name
    async fn list(&self) -> DomainResult<Vec<Course>>;

    /// Get a course by its exact name
    async fn get(&self, name: &str) -> DomainResult<Option<Course>>;

    /// Insert or replace a course
    async fn save(&self, course: &Course) -> DomainResult<()>;

    /// Remove a course
    ///
    /// Returns `false` when no course had that name.
    async fn delete(&self, name: &str) -> DomainResult<bool>;
}
