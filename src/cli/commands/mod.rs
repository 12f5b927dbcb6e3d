//! CLI command implementations.

pub mod ask;
pub mod course;
pub mod history;
pub mod init;
pub mod resources;
pub mod serve;
