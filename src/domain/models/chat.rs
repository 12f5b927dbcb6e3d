//! Chat history models.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::answer::{Answer, RetrievalStrategy};

/// One question/answer exchange in the append-only chat log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub course: String,
    pub question: String,
    pub answer: String,
    pub strategy: RetrievalStrategy,
}

impl ChatEntry {
    pub fn new(course: &str, question: &str, answer: &Answer) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            course: course.to_string(),
            question: question.to_string(),
            answer: answer.text.clone(),
            strategy: answer.strategy,
        }
    }

    /// Timestamp in local time, `YYYY-MM-DD HH:MM:SS`.
    pub fn display_time(&self) -> String {
        self.timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Render previous exchanges as prompt context, oldest first.
pub fn format_transcript(entries: &[ChatEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("Student: {}\nTeacher: {}", e.question, e.answer))
        .collect::<Vec<_>>()
        .join("\n")
}
