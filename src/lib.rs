//! Command-line client for the lab1918 topology, artifact and user API.
//!
//! Each subcommand maps to exactly one HTTP request; responses are printed as
//! 4-space indented JSON or flattened into box-drawn tables.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod prompts;
pub mod utils;

pub use error::ShellError;
