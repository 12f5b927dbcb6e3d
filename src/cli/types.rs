//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cli::commands::{
    ask::AskArgs, course::CourseArgs, history::HistoryArgs, init::InitArgs,
    resources::ResourcesArgs, serve::ServeArgs,
};

#[derive(Parser, Debug)]
#[command(name = "teaching-assistant")]
#[command(about = "Teaching Assistant - course material and question answering", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file to use instead of .teaching-assistant/config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration, data directories and sample courses
    Init(InitArgs),

    /// Course management commands
    Course(CourseArgs),

    /// Ask a question about a course
    Ask(AskArgs),

    /// Show or clear the chat history
    History(HistoryArgs),

    /// Resource center: links and learning files
    Resources(ResourcesArgs),

    /// Run the HTTP API server
    Serve(ServeArgs),
}
