//! Domain layer for the teaching assistant
//!
//! This module contains the course, lesson and chat models plus the port
//! traits that storage, language model and embedding adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
