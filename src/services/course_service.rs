//! Course service implementing course management.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{sample_courses, validate_course_name, Course, Lesson};
use crate::domain::ports::{CourseRepository, VectorIndexStore};
use crate::services::ingest::{extract_text, is_empty_upload, parse_topics};

/// Result of storing uploaded material.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The course was created or changed
    Stored(Course),
    /// Identical material was already present
    Unchanged(Course),
    /// Nothing usable was uploaded; no changes were made
    Empty,
}

impl UploadOutcome {
    pub fn course(&self) -> Option<&Course> {
        match self {
            UploadOutcome::Stored(course) | UploadOutcome::Unchanged(course) => Some(course),
            UploadOutcome::Empty => None,
        }
    }
}

pub struct CourseService {
    repository: Arc<dyn CourseRepository>,
    index_store: Option<Arc<dyn VectorIndexStore>>,
}

impl CourseService {
    pub fn new(repository: Arc<dyn CourseRepository>) -> Self {
        Self {
            repository,
            index_store: None,
        }
    }

    /// Also drop cached vector indexes when courses are removed.
    pub fn with_index_store(mut self, index_store: Arc<dyn VectorIndexStore>) -> Self {
        self.index_store = Some(index_store);
        self
    }

    /// Create a course, or replace the topics of an existing one.
    ///
    /// Lessons of an existing course are kept.
    pub async fn add_course(&self, name: &str, topics: Vec<String>) -> DomainResult<Course> {
        let name = validate_course_name(name)?;
        let course = match self.repository.get(&name).await? {
            Some(mut existing) => {
                debug!(course = %name, "replacing topics of existing course");
                existing.set_topics(topics);
                existing
            }
            None => Course::new(&name, topics)?,
        };

        self.repository.save(&course).await?;
        info!(course = %course.name, topics = course.topics.len(), "course saved");
        Ok(course)
    }

    /// Create or update a course from newline-separated topics.
    pub async fn add_course_from_text(&self, name: &str, topics: &str) -> DomainResult<Course> {
        self.add_course(name, parse_topics(topics)).await
    }

    /// Set a course's topics from an uploaded file, one topic per line.
    pub async fn upload_topics(&self, name: &str, filename: &str, bytes: &[u8]) -> DomainResult<UploadOutcome> {
        validate_course_name(name)?;
        if is_empty_upload(bytes) {
            warn!(course = %name, filename, "ignoring empty upload");
            return Ok(UploadOutcome::Empty);
        }

        let topics = parse_topics(&extract_text(filename, bytes)?);
        if topics.is_empty() {
            warn!(course = %name, filename, "upload contained no topics");
            return Ok(UploadOutcome::Empty);
        }

        self.add_course(name, topics).await.map(UploadOutcome::Stored)
    }

    /// Attach lesson text to an existing course.
    pub async fn add_lesson(
        &self,
        course_name: &str,
        topic: &str,
        content: &str,
        filename: Option<&str>,
    ) -> DomainResult<UploadOutcome> {
        if content.trim().is_empty() {
            return Ok(UploadOutcome::Empty);
        }

        let mut course = self.get_course(course_name).await?;
        let lesson = Lesson::new(topic, content.to_string(), filename.map(str::to_string))?;

        if !course.add_lesson(lesson) {
            debug!(course = %course.name, topic, "lesson already present");
            return Ok(UploadOutcome::Unchanged(course));
        }

        self.repository.save(&course).await?;
        info!(course = %course.name, topic, lessons = course.lessons.len(), "lesson added");
        Ok(UploadOutcome::Stored(course))
    }

    /// Attach an uploaded file as a lesson.
    pub async fn upload_lesson(
        &self,
        course_name: &str,
        topic: &str,
        filename: &str,
        bytes: &[u8],
    ) -> DomainResult<UploadOutcome> {
        if is_empty_upload(bytes) {
            warn!(course = %course_name, filename, "ignoring empty upload");
            return Ok(UploadOutcome::Empty);
        }
        let content = extract_text(filename, bytes)?;
        self.add_lesson(course_name, topic, &content, Some(filename)).await
    }

    pub async fn list_courses(&self) -> DomainResult<Vec<Course>> {
        self.repository.list().await
    }

    pub async fn get_course(&self, name: &str) -> DomainResult<Course> {
        let name = validate_course_name(name)?;
        self.repository
            .get(&name)
            .await?
            .ok_or(DomainError::CourseNotFound(name))
    }

    /// Lesson `index` of a course, counting from zero in the order lessons were added.
    pub async fn lesson(&self, course: &str, index: usize) -> DomainResult<Lesson> {
        let mut course = self.get_course(course).await?;
        if index >= course.lessons.len() {
            return Err(DomainError::LessonNotFound {
                course: course.name,
                index,
            });
        }
        Ok(course.lessons.swap_remove(index))
    }

    /// Remove a course and its cached vector index.
    pub async fn remove_course(&self, name: &str) -> DomainResult<()> {
        let name = validate_course_name(name)?;
        if !self.repository.delete(&name).await? {
            return Err(DomainError::CourseNotFound(name));
        }
        if let Some(index_store) = &self.index_store {
            if let Err(err) = index_store.remove(&name).await {
                warn!(course = %name, error = %err, "failed to remove vector index");
            }
        }
        info!(course = %name, "course removed");
        Ok(())
    }

    /// Save the sample courses that do not exist yet. Returns how many were added.
    pub async fn seed_samples(&self) -> DomainResult<usize> {
        let mut added = 0;
        for course in sample_courses() {
            if self.repository.get(&course.name).await?.is_none() {
                self.repository.save(&course).await?;
                added += 1;
            }
        }
        debug!(added, "sample courses seeded");
        Ok(added)
    }
}
