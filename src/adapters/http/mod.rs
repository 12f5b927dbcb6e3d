//! HTTP surface over the course, chat and resource services.

pub mod server;

pub use server::{build_router, serve, ErrorResponse, HttpServerConfig};
