//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters implement:
//! - CourseRepository / ChatHistoryRepository / MaterialStore: persistence
//! - CompletionClient: hosted chat completion
//! - EmbeddingProvider: text embeddings
//! - VectorIndexStore: cached per-course embedding indexes
//! - Retriever: one answering strategy

pub mod chat_repository;
pub mod completion;
pub mod course_repository;
pub mod embedding;
pub mod index_store;
pub mod material_store;
pub mod retriever;

pub use chat_repository::ChatHistoryRepository;
pub use completion::{CompletionClient, CompletionRequest, PromptMessage, Role};
pub use course_repository::CourseRepository;
pub use embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};
pub use index_store::VectorIndexStore;
pub use material_store::MaterialStore;
pub use retriever::Retriever;
