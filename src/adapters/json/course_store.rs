//! JSON course repository with single-file and per-course layouts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::file_io::{read_json_optional, read_json_or_default, remove_if_exists, write_json_atomic};
use crate::domain::errors::DomainResult;
use crate::domain::models::{validate_course_name, Course, StorageLayout};
use crate::domain::ports::CourseRepository;

/// A course as found on disk.
///
/// Older data files hold a bare list of topic lines per course; those are
/// upgraded to full records when read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredCourse {
    Full(Course),
    Topics(Vec<String>),
}

impl StoredCourse {
    fn into_course(self, name: &str) -> DomainResult<Course> {
        match self {
            StoredCourse::Full(course) => Ok(course),
            StoredCourse::Topics(topics) => Course::new(name, topics),
        }
    }
}

/// Course repository persisting whole JSON documents
pub struct JsonCourseRepository {
    layout: StorageLayout,
    /// `courses.json` or the `courses/` directory, depending on layout
    path: PathBuf,
    pretty: bool,
    write_lock: Mutex<()>,
}

impl JsonCourseRepository {
    pub fn new(layout: StorageLayout, path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            layout,
            path: path.into(),
            pretty,
            write_lock: Mutex::new(()),
        }
    }

    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageLayout::SingleFile, path, true)
    }

    pub fn per_course(dir: impl Into<PathBuf>) -> Self {
        Self::new(StorageLayout::PerCourse, dir, true)
    }

    pub fn layout(&self) -> StorageLayout {
        self.layout
    }

    async fn load_all(&self) -> DomainResult<BTreeMap<String, Course>> {
        match self.layout {
            StorageLayout::SingleFile => {
                let stored: BTreeMap<String, StoredCourse> =
                    read_json_or_default(&self.path).await?;
                stored
                    .into_iter()
                    .map(|(name, record)| record.into_course(&name).map(|c| (name, c)))
                    .collect()
            }
            StorageLayout::PerCourse => self.load_dir().await,
        }
    }

    async fn load_dir(&self) -> DomainResult<BTreeMap<String, Course>> {
        let mut courses = BTreeMap::new();
        let mut entries = match fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(courses),
            Err(err) => return Err(err.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let name = stem.to_string();
            match read_json_optional::<StoredCourse>(&path).await {
                Ok(Some(record)) => {
                    let course = record.into_course(&name)?;
                    courses.insert(course.name.clone(), course);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable course file");
                }
            }
        }
        Ok(courses)
    }

    fn course_file(&self, name: &str) -> DomainResult<PathBuf> {
        course_file_in(&self.path, name)
    }
}

/// Path of a course's file inside `dir`. Names that could leave `dir` are refused.
fn course_file_in(dir: &Path, name: &str) -> DomainResult<PathBuf> {
    let name = validate_course_name(name)?;
    Ok(dir.join(format!("{name}.json")))
}

#[async_trait]
impl CourseRepository for JsonCourseRepository {
    async fn list(&self) -> DomainResult<Vec<Course>> {
        Ok(self.load_all().await?.into_values().collect())
    }

    async fn get(&self, name: &str) -> DomainResult<Option<Course>> {
        match self.layout {
            StorageLayout::SingleFile => Ok(self.load_all().await?.remove(name)),
            StorageLayout::PerCourse => read_json_optional::<StoredCourse>(&self.course_file(name)?)
                .await?
                .map(|record| record.into_course(name))
                .transpose(),
        }
    }

    async fn save(&self, course: &Course) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        match self.layout {
            StorageLayout::SingleFile => {
                let mut all = self.load_all().await?;
                all.insert(course.name.clone(), course.clone());
                write_json_atomic(&self.path, &all, self.pretty).await?;
            }
            StorageLayout::PerCourse => {
                write_json_atomic(&self.course_file(&course.name)?, course, self.pretty).await?;
            }
        }
        debug!(course = %course.name, layout = %self.layout, "course saved");
        Ok(())
    }

    async fn delete(&self, name: &str) -> DomainResult<bool> {
        let _guard = self.write_lock.lock().await;
        match self.layout {
            StorageLayout::SingleFile => {
                let mut all = self.load_all().await?;
                if all.remove(name).is_none() {
                    return Ok(false);
                }
                write_json_atomic(&self.path, &all, self.pretty).await?;
                Ok(true)
            }
            StorageLayout::PerCourse => remove_if_exists(&self.course_file(name)?).await,
        }
    }
}
