//! JSON file persistence adapters.

pub mod chat_history;
pub mod course_store;
pub mod file_io;
pub mod index_store;
pub mod material_store;

pub use chat_history::JsonChatHistory;
pub use course_store::JsonCourseRepository;
pub use index_store::JsonIndexStore;
pub use material_store::FsMaterialStore;
