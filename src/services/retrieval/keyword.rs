//! Keyword lesson suggestions.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Answer, AnswerSource, ChatEntry, Course, RetrievalStrategy};
use crate::domain::ports::Retriever;

/// Question words shorter than this are ignored when scanning lesson content.
const MIN_WORD_LEN: usize = 3;

/// Suggests lessons whose topic appears in the question, or whose content
/// contains one of the question's words.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordRetriever;

pub(crate) fn no_match_message(course: &str) -> String {
    format!("Thank you for your question about {course}. I'll help you understand this topic better.")
}

fn question_words(question: &str) -> Vec<String> {
    question
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
        .collect()
}

#[async_trait]
impl Retriever for KeywordRetriever {
    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Keyword
    }

    async fn answer(&self, course: &Course, question: &str, _history: &[ChatEntry]) -> DomainResult<Answer> {
        let question_lower = question.to_lowercase();
        let words = question_words(question);

        let mut lines = Vec::new();
        let mut sources = Vec::new();
        for topic in course.lesson_topics() {
            let topic_hit = question_lower.contains(&topic.to_lowercase());
            let lessons: Vec<_> = course.lessons_for_topic(topic).collect();
            let content_hit = || {
                lessons.iter().any(|lesson| {
                    let content = lesson.content.to_lowercase();
                    words.iter().any(|w| content.contains(w.as_str()))
                })
            };
            if !(topic_hit || content_hit()) {
                continue;
            }

            let files: Vec<&str> = lessons.iter().filter_map(|l| l.filename.as_deref()).collect();
            if files.is_empty() {
                lines.push(format!("- {topic}"));
            } else {
                lines.push(format!("- {topic}: {}", files.join(", ")));
            }
            if let Some(first) = lessons.first() {
                sources.push(AnswerSource {
                    label: topic.to_string(),
                    excerpt: super::excerpt(&first.content),
                    score: None,
                });
            }
        }

        if lines.is_empty() {
            return Ok(Answer::fallback(RetrievalStrategy::Keyword, no_match_message(&course.name)));
        }

        let text = format!(
            "Based on your question, you might find these resources helpful:\n{}",
            lines.join("\n")
        );
        Ok(Answer::matched(RetrievalStrategy::Keyword, text).with_sources(sources))
    }
}
