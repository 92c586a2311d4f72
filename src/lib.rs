//! docsync library.
//!
//! Keeps the dqlite Markdown docs in sync with their Discourse topics.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod remote;
pub mod tools;

pub use error::Error;
