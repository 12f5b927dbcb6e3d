//! Implementation of the `teaching-assistant ask` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use crate::cli::build_context;
use crate::cli::output::progress::create_spinner;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AnswerSource, Config, RetrievalStrategy};
use crate::services::ChatReply;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Course name
    pub course: String,

    /// The question to answer
    pub question: String,

    /// Retrieval strategy (keyword, phrase, tfidf, vector, llm)
    #[arg(short, long)]
    pub strategy: Option<RetrievalStrategy>,
}

#[derive(Debug, serde::Serialize)]
pub struct AskOutput {
    pub course: String,
    pub question: String,
    pub answer: String,
    pub strategy: RetrievalStrategy,
    pub matched: bool,
    pub sources: Vec<AnswerSource>,
}

impl From<ChatReply> for AskOutput {
    fn from(reply: ChatReply) -> Self {
        Self {
            course: reply.entry.course,
            question: reply.entry.question,
            answer: reply.answer.text,
            strategy: reply.answer.strategy,
            matched: reply.answer.matched,
            sources: reply.answer.sources,
        }
    }
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.answer.clone()];
        if !self.sources.is_empty() {
            lines.push(String::new());
            lines.push(style(format!("Sources ({}):", self.strategy)).dim().to_string());
            for source in &self.sources {
                let score = source.score.map(|s| format!(" ({s:.2})")).unwrap_or_default();
                lines.push(style(format!("  - {}{}", source.label, score)).dim().to_string());
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AskArgs, config: Config, json_mode: bool) -> Result<()> {
    let ctx = build_context(config)?;
    let strategy = args.strategy.unwrap_or_else(|| ctx.chat.default_strategy());

    let spinner = strategy
        .uses_network()
        .then(|| create_spinner(format!("Asking the {strategy} assistant..."), json_mode));

    let result = ctx.chat.ask(&args.course, &args.question, Some(strategy)).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let reply = result.context("Failed to answer question")?;
    output(&AskOutput::from(reply), json_mode);
    Ok(())
}
