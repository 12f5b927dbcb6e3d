//! Course and lesson domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::errors::{DomainError, DomainResult};

/// Longest accepted course name, in characters.
pub const MAX_COURSE_NAME_LEN: usize = 200;

/// A course: a named list of topics plus the lesson material attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Create a course after validating its name.
    pub fn new(name: &str, topics: Vec<String>) -> DomainResult<Self> {
        let name = validate_course_name(name)?;
        let now = Utc::now();
        Ok(Self {
            name,
            topics,
            lessons: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace the topic list, keeping lessons.
    pub fn set_topics(&mut self, topics: Vec<String>) {
        self.topics = topics;
        self.touch();
    }

    /// Attach a lesson. Returns `false` when an identical lesson already exists
    /// under the same topic.
    pub fn add_lesson(&mut self, lesson: Lesson) -> bool {
        let duplicate = self
            .lessons
            .iter()
            .any(|l| l.topic == lesson.topic && l.content_hash == lesson.content_hash);
        if duplicate {
            return false;
        }
        self.lessons.push(lesson);
        self.touch();
        true
    }

    /// Distinct lesson topics in insertion order.
    pub fn lesson_topics(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for lesson in &self.lessons {
            if !seen.contains(&lesson.topic.as_str()) {
                seen.push(lesson.topic.as_str());
            }
        }
        seen
    }

    /// Lessons filed under `topic`.
    pub fn lessons_for_topic<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a Lesson> + 'a {
        self.lessons.iter().filter(move |l| l.topic == topic)
    }

    /// Whether any lesson carries non-blank content.
    pub fn has_lesson_content(&self) -> bool {
        self.lessons.iter().any(|l| !l.content.trim().is_empty())
    }

    /// Searchable lines: every topic followed by every non-empty lesson line.
    pub fn documents(&self) -> Vec<String> {
        let mut docs: Vec<String> = self
            .topics
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        for lesson in &self.lessons {
            docs.extend(
                lesson
                    .content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        }
        docs
    }

    /// Fingerprint of all lesson content, used to invalidate derived indexes.
    pub fn content_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for lesson in &self.lessons {
            hasher.update(lesson.topic.as_bytes());
            hasher.update([0u8]);
            hasher.update(lesson.content_hash.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A titled piece of course material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub content: String,
    pub content_hash: String,
    pub added_at: DateTime<Utc>,
}

impl Lesson {
    pub fn new(topic: &str, content: String, filename: Option<String>) -> DomainResult<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DomainError::ValidationFailed(
                "Lesson topic cannot be empty".to_string(),
            ));
        }
        if content.trim().is_empty() {
            return Err(DomainError::ValidationFailed(format!(
                "Lesson '{topic}' has no content"
            )));
        }
        Ok(Self {
            topic: topic.to_string(),
            filename,
            content_hash: content_hash(content.as_bytes()),
            content,
            added_at: Utc::now(),
        })
    }

    /// File name offered when the lesson is downloaded: the uploaded file's
    /// base name, or the topic with a `.txt` extension for typed-in lessons.
    pub fn download_name(&self) -> String {
        let uploaded = self
            .filename
            .as_deref()
            .and_then(|f| std::path::Path::new(f).file_name())
            .and_then(|n| n.to_str())
            .filter(|n| !n.trim().is_empty());
        if let Some(name) = uploaded {
            return name.to_string();
        }
        let stem: String = self
            .topic
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{stem}.txt")
    }
}

/// Hex SHA-256 digest of raw bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Trim and validate a course name.
///
/// Names also name files in the per-course storage layout, so path
/// separators and dot-only names are rejected.
pub fn validate_course_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    let reject = |reason: &str| DomainError::InvalidCourseName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(reject("name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_COURSE_NAME_LEN {
        return Err(reject("name is too long"));
    }
    if trimmed.contains(['/', '\\']) || trimmed.chars().any(char::is_control) {
        return Err(reject("name cannot contain path separators or control characters"));
    }
    if trimmed.chars().all(|c| c == '.') {
        return Err(reject("name cannot consist only of dots"));
    }
    Ok(trimmed.to_string())
}

/// The two sample courses written by `init`.
pub fn sample_courses() -> Vec<Course> {
    let samples: [(&str, &[&str]); 2] = [
        (
            "Machine Learning Basics",
            &[
                "Introduction to ML",
                "Supervised Learning",
                "Unsupervised Learning",
                "Neural Networks",
            ],
        ),
        ("Deep Learning", &["CNN", "RNN", "Transformers", "GANs"]),
    ];

    samples
        .iter()
        .filter_map(|(name, topics)| {
            Course::new(name, topics.iter().map(|t| (*t).to_string()).collect()).ok()
        })
        .collect()
}
