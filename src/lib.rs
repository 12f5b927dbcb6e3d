//! Teaching Assistant - course material store and question answering
//!
//! Instructors upload course topics and lesson material; students ask
//! questions answered by one of several retrieval strategies: keyword or
//! phrase lookup, TF-IDF similarity, embedding search with a language model,
//! or a direct completion.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and ports
//! - **Service Layer** (`services`): course management, retrieval and chat
//! - **Adapters** (`adapters`): JSON storage, OpenAI clients, HTTP API
//! - **Infrastructure Layer** (`infrastructure`): config, logging, wiring
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use teaching_assistant::{AppContext, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = AppContext::from_config(Config::default())?;
//!     ctx.courses.seed_samples().await?;
//!     let reply = ctx.chat.ask("Deep Learning", "What is a CNN?", None).await?;
//!     println!("{}", reply.answer.text);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Answer, ChatEntry, Config, Course, Lesson, Material, ResourceLink, RetrievalStrategy,
};
pub use domain::ports::{
    ChatHistoryRepository, CompletionClient, CourseRepository, EmbeddingProvider, MaterialStore,
    Retriever, VectorIndexStore,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::AppContext;
pub use services::{ChatService, CourseService, ResourceService};
