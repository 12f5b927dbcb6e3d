//! Table output formatting for CLI commands
//!
//! Provides formatted tables for courses, chat history and the resource
//! center using comfy-table.

use crate::domain::models::{ChatEntry, Course, Material, ResourceLink, RetrievalStrategy};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self { use_colors, max_width }
    }

    /// Format a list of courses as a table
    pub fn format_courses(&self, courses: &[Course]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Course").add_attribute(Attribute::Bold),
            Cell::new("Topics").add_attribute(Attribute::Bold),
            Cell::new("Lessons").add_attribute(Attribute::Bold),
            Cell::new("Updated").add_attribute(Attribute::Bold),
        ]);

        for course in courses {
            let topics = if course.topics.is_empty() {
                "-".to_string()
            } else {
                truncate(&course.topics.join(", "), 50)
            };
            table.add_row(vec![
                Cell::new(&course.name),
                Cell::new(topics),
                Cell::new(course.lessons.len().to_string()),
                Cell::new(course.updated_at.format("%Y-%m-%d %H:%M").to_string()),
            ]);
        }

        table.to_string()
    }

    /// Format chat history entries as a table
    pub fn format_history(&self, entries: &[ChatEntry]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Course").add_attribute(Attribute::Bold),
            Cell::new("Strategy").add_attribute(Attribute::Bold),
            Cell::new("Question").add_attribute(Attribute::Bold),
            Cell::new("Answer").add_attribute(Attribute::Bold),
        ]);

        for entry in entries {
            let strategy_cell = if self.use_colors {
                Cell::new(entry.strategy).fg(strategy_color(entry.strategy))
            } else {
                Cell::new(entry.strategy)
            };
            table.add_row(vec![
                Cell::new(entry.display_time()),
                Cell::new(truncate(&entry.course, 24)),
                strategy_cell,
                Cell::new(truncate(&entry.question, 40)),
                Cell::new(truncate(&entry.answer, 60)),
            ]);
        }

        table.to_string()
    }

    /// Format uploaded learning materials as a table
    pub fn format_materials(&self, materials: &[Material]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("File").add_attribute(Attribute::Bold),
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Size").add_attribute(Attribute::Bold),
            Cell::new("Uploaded").add_attribute(Attribute::Bold),
        ]);

        for material in materials {
            table.add_row(vec![
                Cell::new(&material.filename),
                Cell::new(material.kind),
                Cell::new(format_size(material.size_bytes)),
                Cell::new(material.uploaded_at.format("%Y-%m-%d %H:%M").to_string()),
            ]);
        }

        table.to_string()
    }

    /// Format resource links as a table
    pub fn format_links(&self, links: &[ResourceLink]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Resource").add_attribute(Attribute::Bold),
            Cell::new("URL").add_attribute(Attribute::Bold),
        ]);

        for link in links {
            let url_cell = if self.use_colors {
                Cell::new(&link.url).fg(Color::Cyan)
            } else {
                Cell::new(&link.url)
            };
            table.add_row(vec![Cell::new(&link.title), url_cell]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

fn strategy_color(strategy: RetrievalStrategy) -> Color {
    match strategy {
        RetrievalStrategy::Keyword | RetrievalStrategy::Phrase => Color::White,
        RetrievalStrategy::TfIdf => Color::Green,
        RetrievalStrategy::Vector => Color::Cyan,
        RetrievalStrategy::Llm => Color::Magenta,
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{default_resource_links, sample_courses};

    #[test]
    fn test_format_courses() {
        let formatter = TableFormatter::with_config(false, Some(120));
        let output = formatter.format_courses(&sample_courses());
        assert!(output.contains("Machine Learning Basics"));
        assert!(output.contains("Deep Learning"));
        assert!(output.contains("Lessons"));
    }

    #[test]
    fn test_format_links() {
        let formatter = TableFormatter::with_config(false, None);
        let output = formatter.format_links(&default_resource_links());
        assert!(output.contains("URL"));
        assert!(output.contains("https://"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
