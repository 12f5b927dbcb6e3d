use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Answer, ChatEntry, Course, RetrievalStrategy};

/// A way of answering a question from a course
#[async_trait]
pub trait Retriever: Send + Sync {
    fn strategy(&self) -> RetrievalStrategy;

    /// Answer `question` using `course`. `history` holds recent exchanges
    /// for the same course, oldest first.
    async fn answer(
        &self,
        course: &Course,
        question: &str,
        history: &[ChatEntry],
    ) -> DomainResult<Answer>;
}
