//! Infrastructure layer module
//!
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - OpenAI API plumbing: retry, rate limiting, error classification
//! - Text chunking for vector retrieval
//! - Project setup and service wiring

pub mod config;
pub mod context;
pub mod logging;
pub mod openai;
pub mod setup;
pub mod vector;

pub use context::AppContext;
