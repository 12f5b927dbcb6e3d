//! Chat history CLI command.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::build_context;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{ChatEntry, Config};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only show entries for this course
    #[arg(long)]
    pub course: Option<String>,

    /// Maximum number of entries to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Delete the history (of one course when --course is given)
    #[arg(long)]
    pub clear: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryOutput {
    pub entries: Vec<ChatEntry>,
    pub total: usize,
}

impl CommandOutput for HistoryOutput {
    fn to_human(&self) -> String {
        if self.entries.is_empty() {
            return "No chat history yet.".to_string();
        }
        format!(
            "{}\n\nShowing {} entr{}",
            TableFormatter::new().format_history(&self.entries),
            self.total,
            if self.total == 1 { "y" } else { "ies" }
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct HistoryClearedOutput {
    pub removed: usize,
    pub course: Option<String>,
}

impl CommandOutput for HistoryClearedOutput {
    fn to_human(&self) -> String {
        match &self.course {
            Some(course) => format!("Removed {} entr(ies) for '{course}'.", self.removed),
            None => format!("Removed {} entr(ies).", self.removed),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: HistoryArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = build_context(config)?;

    if args.clear {
        let removed = ctx
            .chat
            .clear_history(args.course.as_deref())
            .await
            .context("Failed to clear chat history")?;
        output(
            &HistoryClearedOutput {
                removed,
                course: args.course,
            },
            json_mode,
        );
        return Ok(());
    }

    let entries = ctx
        .chat
        .history(args.course.as_deref(), args.limit)
        .await
        .context("Failed to read chat history")?;
    output(
        &HistoryOutput {
            total: entries.len(),
            entries,
        },
        json_mode,
    );
    Ok(())
}
