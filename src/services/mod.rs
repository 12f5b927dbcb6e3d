//! Service layer: course management, question answering and the resource
//! center, built on the domain ports.

pub mod chat_service;
pub mod course_service;
pub mod ingest;
pub mod resource_service;
pub mod retrieval;
pub mod tfidf;

pub use chat_service::{ChatReply, ChatService};
pub use course_service::{CourseService, UploadOutcome};
pub use resource_service::ResourceService;
pub use retrieval::RetrieverRegistry;
