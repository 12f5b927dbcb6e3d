//! Best-matching course line by TF-IDF cosine similarity.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Answer, AnswerSource, ChatEntry, Course, RetrievalStrategy};
use crate::domain::ports::Retriever;
use crate::services::tfidf::best_match;

pub(crate) const NO_MATCH: &str = "Sorry, I couldn't find a match. Please rephrase your question.";

/// Answers with the course topic or lesson line most similar to the question
#[derive(Debug, Clone, Copy)]
pub struct TfIdfRetriever {
    threshold: f32,
}

impl TfIdfRetriever {
    /// Matches must score strictly above `threshold`
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Default for TfIdfRetriever {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[async_trait]
impl Retriever for TfIdfRetriever {
    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::TfIdf
    }

    async fn answer(&self, course: &Course, question: &str, _history: &[ChatEntry]) -> DomainResult<Answer> {
        let documents = course.documents();
        let Some(hit) = best_match(question, &documents, self.threshold) else {
            debug!(course = %course.name, documents = documents.len(), "no tf-idf match");
            return Ok(Answer::fallback(RetrievalStrategy::TfIdf, NO_MATCH));
        };

        let document = documents[hit.index].clone();
        debug!(course = %course.name, index = hit.index, score = hit.score, "tf-idf match");
        Ok(Answer::matched(RetrievalStrategy::TfIdf, document.clone()).with_sources(vec![
            AnswerSource {
                label: course.name.clone(),
                excerpt: document,
                score: Some(hit.score),
            },
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Lesson;

    fn course() -> Course {
        let mut course = Course::new(
            "Machine Learning Basics",
            vec!["Introduction to ML".to_string(), "Supervised Learning".to_string()],
        )
        .unwrap();
        course.add_lesson(
            Lesson::new(
                "Clustering",
                "K-means groups points by distance\n\nHierarchical clustering builds a tree".to_string(),
                None,
            )
            .unwrap(),
        );
        course
    }

    #[tokio::test]
    async fn test_matches_topic() {
        let answer = TfIdfRetriever::default()
            .answer(&course(), "What is supervised learning?", &[])
            .await
            .unwrap();
        assert!(answer.matched);
        assert_eq!(answer.text, "Supervised Learning");
        assert!(answer.sources[0].score.unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_matches_lesson_line() {
        let answer = TfIdfRetriever::default()
            .answer(&course(), "how does hierarchical clustering work", &[])
            .await
            .unwrap();
        assert_eq!(answer.text, "Hierarchical clustering builds a tree");
    }

    #[tokio::test]
    async fn test_no_overlap_falls_back() {
        let answer = TfIdfRetriever::default()
            .answer(&course(), "explain transformers", &[])
            .await
            .unwrap();
        assert!(!answer.matched);
        assert_eq!(answer.text, NO_MATCH);
    }

    #[tokio::test]
    async fn test_empty_course_falls_back() {
        let empty = Course::new("Empty", vec![]).unwrap();
        let answer = TfIdfRetriever::default().answer(&empty, "anything", &[]).await.unwrap();
        assert!(!answer.matched);
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let answer = TfIdfRetriever::new(0.99)
            .answer(&course(), "learning", &[])
            .await
            .unwrap();
        assert!(!answer.matched);
    }
}
