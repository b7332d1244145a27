//! Library exports for lotkeeper-cli.
//!
//! Exposes the CLI structure so documentation tooling and benches can
//! reach it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
