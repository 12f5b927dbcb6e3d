//! Chat service: answers questions and keeps the chat log.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{validate_course_name, Answer, ChatEntry, RetrievalStrategy};
use crate::domain::ports::{ChatHistoryRepository, CourseRepository};
use crate::services::retrieval::RetrieverRegistry;

/// An answered question together with its log entry
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub entry: ChatEntry,
    pub answer: Answer,
}

pub struct ChatService {
    courses: Arc<dyn CourseRepository>,
    history: Arc<dyn ChatHistoryRepository>,
    retrievers: RetrieverRegistry,
    default_strategy: RetrievalStrategy,
    history_turns: usize,
}

impl ChatService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        history: Arc<dyn ChatHistoryRepository>,
        retrievers: RetrieverRegistry,
        default_strategy: RetrievalStrategy,
    ) -> Self {
        Self {
            courses,
            history,
            retrievers,
            default_strategy,
            history_turns: 10,
        }
    }

    /// Number of previous exchanges handed to retrievers
    pub fn with_history_turns(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }

    pub fn default_strategy(&self) -> RetrievalStrategy {
        self.default_strategy
    }

    pub fn strategies(&self) -> Vec<RetrievalStrategy> {
        self.retrievers.strategies()
    }

    /// Answer `question` about `course_name` and append the exchange to the log.
    #[instrument(skip(self, question, strategy), fields(strategy = tracing::field::Empty))]
    pub async fn ask(
        &self,
        course_name: &str,
        question: &str,
        strategy: Option<RetrievalStrategy>,
    ) -> DomainResult<ChatReply> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::ValidationFailed("Question cannot be empty".to_string()));
        }

        let course_name = validate_course_name(course_name)?;
        let course = self
            .courses
            .get(&course_name)
            .await?
            .ok_or(DomainError::CourseNotFound(course_name))?;

        let strategy = strategy.unwrap_or(self.default_strategy);
        tracing::Span::current().record("strategy", strategy.as_str());
        let retriever = self.retrievers.get(strategy)?;

        let recent = if self.history_turns == 0 {
            Vec::new()
        } else {
            self.history.list(Some(&course.name), Some(self.history_turns)).await?
        };

        let answer = retriever.answer(&course, question, &recent).await?;
        let entry = ChatEntry::new(&course.name, question, &answer);
        self.history.append(&entry).await?;

        info!(course = %course.name, matched = answer.matched, "question answered");
        Ok(ChatReply { entry, answer })
    }

    /// Logged exchanges, newest first.
    pub async fn history(&self, course: Option<&str>, limit: Option<usize>) -> DomainResult<Vec<ChatEntry>> {
        let mut entries = self.history.list(course.map(str::trim), limit).await?;
        entries.reverse();
        Ok(entries)
    }

    /// Clear the log, or only one course's entries. Returns how many were removed.
    pub async fn clear_history(&self, course: Option<&str>) -> DomainResult<usize> {
        let removed = self.history.clear(course.map(str::trim)).await?;
        info!(removed, "chat history cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json::{JsonChatHistory, JsonCourseRepository};
    use crate::domain::models::Course;
    use tempfile::TempDir;

    async fn service(dir: &TempDir) -> ChatService {
        let courses = Arc::new(JsonCourseRepository::single_file(dir.path().join("courses.json")));
        let course = Course::new(
            "Machine Learning Basics",
            vec!["Supervised Learning".to_string(), "Neural Networks".to_string()],
        )
        .unwrap();
        courses.save(&course).await.unwrap();
        let history = Arc::new(JsonChatHistory::new(dir.path().join("chat_history.json"), true));
        ChatService::new(
            courses,
            history,
            RetrieverRegistry::offline(0.0),
            RetrievalStrategy::TfIdf,
        )
    }

    #[tokio::test]
    async fn test_ask_answers_and_logs() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;

        let reply = service
            .ask("Machine Learning Basics", "  what are neural networks? ", None)
            .await
            .unwrap();
        assert_eq!(reply.answer.text, "Neural Networks");
        assert_eq!(reply.entry.question, "what are neural networks?");
        assert_eq!(reply.entry.strategy, RetrievalStrategy::TfIdf);

        let history = service.history(None, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].answer, "Neural Networks");
    }

    #[tokio::test]
    async fn test_empty_question_is_not_logged() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;

        let err = service.ask("Machine Learning Basics", "   ", None).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
        assert!(service.history(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_course_and_strategy() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;

        assert!(matches!(
            service.ask("Chemistry", "what?", None).await,
            Err(DomainError::CourseNotFound(_))
        ));
        assert!(matches!(
            service.ask("../courses", "what?", None).await,
            Err(DomainError::InvalidCourseName { .. })
        ));
        assert!(matches!(
            service
                .ask("Machine Learning Basics", "what?", Some(RetrievalStrategy::Llm))
                .await,
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_history_newest_first_and_clear() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir).await;

        service.ask("Machine Learning Basics", "first", None).await.unwrap();
        service
            .ask("Machine Learning Basics", "second", Some(RetrievalStrategy::Keyword))
            .await
            .unwrap();

        let history = service.history(Some("Machine Learning Basics"), Some(1)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].question, "second");

        assert_eq!(service.clear_history(None).await.unwrap(), 2);
        assert!(service.history(None, None).await.unwrap().is_empty());
    }
}
