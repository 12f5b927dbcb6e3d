pub mod answer;
pub mod chat;
pub mod chunking;
pub mod config;
pub mod course;
pub mod material;
pub mod vector_index;

pub use answer::{Answer, AnswerSource, RetrievalStrategy};
pub use chat::{format_transcript, ChatEntry};
pub use chunking::{Chunk, ChunkingConfig};
pub use config::{
    Config, EmbeddingsConfig, LlmConfig, LoggingConfig, RateLimitConfig, ResourcesConfig,
    RetrievalConfig, RetryConfig, ServerConfig, StorageConfig, StorageLayout,
};
pub use course::{content_hash, sample_courses, validate_course_name, Course, Lesson};
pub use material::{default_resource_links, Material, MaterialKind, ResourceLink};
pub use vector_index::{cosine_similarity, IndexedChunk, VectorIndex};
