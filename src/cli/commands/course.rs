//! Course CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use crate::cli::{build_context, save_download};
use crate::cli::output::{output, truncate, CommandOutput, TableFormatter};
use crate::domain::models::{Config, Course, Lesson};
use crate::services::UploadOutcome;

#[derive(Args, Debug)]
pub struct CourseArgs {
    #[command(subcommand)]
    pub command: CourseCommands,
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    /// Create a course, or replace the topics of an existing one
    Add {
        /// Course name
        name: String,
        /// Topics, one per line
        #[arg(short, long, conflicts_with = "topics_file")]
        topics: Option<String>,
        /// File with one topic per line
        #[arg(long)]
        topics_file: Option<PathBuf>,
    },
    /// Set a course's topics from a text or PDF file
    Upload {
        /// Course name
        name: String,
        /// File with one topic per line
        file: PathBuf,
    },
    /// Attach lesson material to a course
    Lesson {
        /// Course name
        course: String,
        /// Topic the lesson covers
        topic: String,
        /// Lesson text
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        /// Text or PDF file holding the lesson
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print a lesson, or save it to a file
    LessonShow {
        /// Course name
        course: String,
        /// Lesson number as listed by `course show`, starting at 0
        index: usize,
        /// Save the lesson here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List courses
    List,
    /// Show course details
    Show {
        /// Course name
        name: String,
    },
    /// Remove a course
    Remove {
        /// Course name
        name: String,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct CourseListOutput {
    pub courses: Vec<Course>,
    pub total: usize,
}

impl CommandOutput for CourseListOutput {
    fn to_human(&self) -> String {
        if self.courses.is_empty() {
            return "No courses found. Add one with `teaching-assistant course add`.".to_string();
        }
        format!(
            "Found {} course(s):\n{}",
            self.total,
            TableFormatter::new().format_courses(&self.courses)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CourseDetailOutput {
    pub course: Course,
}

impl CommandOutput for CourseDetailOutput {
    fn to_human(&self) -> String {
        let course = &self.course;
        let mut lines = vec![
            format!("Course: {}", course.name),
            format!("Created: {}", course.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
            format!("Updated: {}", course.updated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ];

        if course.topics.is_empty() {
            lines.push("\nNo topics.".to_string());
        } else {
            lines.push(format!("\nTopics ({}):", course.topics.len()));
            for topic in &course.topics {
                lines.push(format!("  - {topic}"));
            }
        }

        if !course.lessons.is_empty() {
            lines.push(format!("\nLessons ({}):", course.lessons.len()));
            for (index, lesson) in course.lessons.iter().enumerate() {
                let source = lesson.filename.as_deref().unwrap_or("inline");
                lines.push(format!(
                    "  {index}. {} [{}] {}",
                    lesson.topic,
                    source,
                    truncate(&lesson.content.replace('\n', " "), 60)
                ));
            }
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.course).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CourseActionOutput {
    pub success: bool,
    pub status: String,
    pub message: String,
    pub course: Option<Course>,
}

impl CourseActionOutput {
    fn from_outcome(outcome: UploadOutcome, what: &str) -> Self {
        match outcome {
            UploadOutcome::Stored(course) => Self {
                success: true,
                status: "stored".to_string(),
                message: format!("{what} saved for course '{}'.", course.name),
                course: Some(course),
            },
            UploadOutcome::Unchanged(course) => Self {
                success: true,
                status: "unchanged".to_string(),
                message: format!("Course '{}' already has this {}.", course.name, what.to_lowercase()),
                course: Some(course),
            },
            UploadOutcome::Empty => Self {
                success: false,
                status: "empty".to_string(),
                message: "Nothing to store: the upload was empty.".to_string(),
                course: None,
            },
        }
    }
}

impl CommandOutput for CourseActionOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct LessonOutput {
    pub course: String,
    pub index: usize,
    pub lesson: Lesson,
    pub saved_to: Option<PathBuf>,
}

impl CommandOutput for LessonOutput {
    fn to_human(&self) -> String {
        match &self.saved_to {
            Some(path) => format!("Saved lesson '{}' to {}.", self.lesson.topic, path.display()),
            None => format!(
                "Lesson {} of '{}': {}\n\n{}",
                self.index, self.course, self.lesson.topic, self.lesson.content
            ),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

async fn read_file(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
    Ok((filename, bytes))
}

pub async fn execute(args: CourseArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = build_context(config)?;
    let courses = &ctx.courses;

    match args.command {
        CourseCommands::Add {
            name,
            topics,
            topics_file,
        } => {
            let course = match topics_file {
                Some(path) => {
                    let (filename, bytes) = read_file(&path).await?;
                    let outcome = courses
                        .upload_topics(&name, &filename, &bytes)
                        .await
                        .context("Failed to add course")?;
                    match outcome {
                        UploadOutcome::Empty => {
                            courses.add_course(&name, Vec::new()).await.context("Failed to add course")?
                        }
                        UploadOutcome::Stored(course) | UploadOutcome::Unchanged(course) => course,
                    }
                }
                None => courses
                    .add_course_from_text(&name, topics.as_deref().unwrap_or_default())
                    .await
                    .context("Failed to add course")?,
            };
            let output_data = CourseActionOutput {
                success: true,
                status: "stored".to_string(),
                message: format!(
                    "Course '{}' saved with {} topic(s).",
                    course.name,
                    course.topics.len()
                ),
                course: Some(course),
            };
            output(&output_data, json_mode);
        }

        CourseCommands::Upload { name, file } => {
            let (filename, bytes) = read_file(&file).await?;
            let outcome = courses
                .upload_topics(&name, &filename, &bytes)
                .await
                .context("Failed to upload course topics")?;
            output(&CourseActionOutput::from_outcome(outcome, "Topics"), json_mode);
        }

        CourseCommands::Lesson {
            course,
            topic,
            content,
            file,
        } => {
            let outcome = match (content, file) {
                (_, Some(path)) => {
                    let (filename, bytes) = read_file(&path).await?;
                    courses.upload_lesson(&course, &topic, &filename, &bytes).await
                }
                (Some(content), None) => courses.add_lesson(&course, &topic, &content, None).await,
                (None, None) => anyhow::bail!("Provide lesson text with --content or a file with --file"),
            }
            .context("Failed to add lesson")?;
            output(&CourseActionOutput::from_outcome(outcome, "Lesson"), json_mode);
        }

        CourseCommands::LessonShow { course, index, output: target } => {
            let lesson = courses.lesson(&course, index).await?;
            let saved_to = match target {
                Some(target) => Some(
                    save_download(Some(&target), &lesson.download_name(), lesson.content.as_bytes()).await?,
                ),
                None => None,
            };
            let output_data = LessonOutput {
                course: course.trim().to_string(),
                index,
                lesson,
                saved_to,
            };
            output(&output_data, json_mode);
        }

        CourseCommands::List => {
            let list = courses.list_courses().await.context("Failed to list courses")?;
            let output_data = CourseListOutput {
                total: list.len(),
                courses: list,
            };
            output(&output_data, json_mode);
        }

        CourseCommands::Show { name } => {
            let course = courses.get_course(&name).await?;
            output(&CourseDetailOutput { course }, json_mode);
        }

        CourseCommands::Remove { name } => {
            courses.remove_course(&name).await?;
            let output_data = CourseActionOutput {
                success: true,
                status: "removed".to_string(),
                message: format!("Course '{}' removed.", name.trim()),
                course: None,
            };
            output(&output_data, json_mode);
        }
    }

    Ok(())
}
