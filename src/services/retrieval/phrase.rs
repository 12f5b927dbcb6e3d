//! Whole-question phrase lookup in lesson content.

use async_trait::async_trait;
use regex::RegexBuilder;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Answer, AnswerSource, ChatEntry, Course, RetrievalStrategy};
use crate::domain::ports::Retriever;

pub(crate) const NO_MATCH: &str = "I'm sorry, but I couldn't find an answer based on the uploaded lessons.";

/// Answers with the first lesson containing the question as a whole-word phrase
#[derive(Debug, Default, Clone, Copy)]
pub struct PhraseRetriever;

#[async_trait]
impl Retriever for PhraseRetriever {
    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Phrase
    }

    async fn answer(&self, course: &Course, question: &str, _history: &[ChatEntry]) -> DomainResult<Answer> {
        // Trailing sentence punctuation would never sit before a word boundary.
        let phrase = question.trim().trim_end_matches(['?', '!', '.']).trim_end();
        if phrase.is_empty() {
            return Ok(Answer::fallback(RetrievalStrategy::Phrase, NO_MATCH));
        }

        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(phrase)))
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::ValidationFailed(format!("question cannot be searched: {e}")))?;

        let hit = course.lessons.iter().find(|lesson| pattern.is_match(&lesson.content));
        Ok(match hit {
            Some(lesson) => Answer::matched(
                RetrievalStrategy::Phrase,
                format!(
                    "Based on the lesson '{}', here's some information: {}",
                    lesson.topic, lesson.content
                ),
            )
            .with_sources(vec![AnswerSource {
                label: lesson.topic.clone(),
                excerpt: super::excerpt(&lesson.content),
                score: None,
            }]),
            None => Answer::fallback(RetrievalStrategy::Phrase, NO_MATCH),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Lesson;

    fn course() -> Course {
        let mut course = Course::new("ML", vec![]).unwrap();
        course.add_lesson(
            Lesson::new("Optimisation", "Gradient descent (GD) follows the slope.".to_string(), None).unwrap(),
        );
        course
    }

    #[tokio::test]
    async fn test_phrase_found_case_insensitive() {
        let answer = PhraseRetriever.answer(&course(), "Gradient Descent?", &[]).await.unwrap();
        assert!(answer.matched);
        assert_eq!(
            answer.text,
            "Based on the lesson 'Optimisation', here's some information: Gradient descent (GD) follows the slope."
        );
    }

    #[tokio::test]
    async fn test_partial_word_does_not_match() {
        let answer = PhraseRetriever.answer(&course(), "gradient desc", &[]).await.unwrap();
        assert!(!answer.matched);
        assert_eq!(answer.text, NO_MATCH);
    }

    #[tokio::test]
    async fn test_regex_metacharacters_are_literal() {
        let answer = PhraseRetriever.answer(&course(), "descent (GD", &[]).await.unwrap();
        assert!(answer.matched);
        let answer = PhraseRetriever.answer(&course(), "(GD) follows", &[]).await.unwrap();
        // `\b` before "(" needs a word character on the left, which a space is not.
        assert!(!answer.matched);
        let answer = PhraseRetriever.answer(&course(), "GD) follows", &[]).await.unwrap();
        assert!(answer.matched);
    }
}
