//! Adapters for storage, hosted models and the HTTP surface.

pub mod embeddings;
pub mod http;
pub mod json;
pub mod llm;
