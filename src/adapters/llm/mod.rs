//! Hosted language model adapters.

pub mod openai;

pub use openai::OpenAiChatClient;
