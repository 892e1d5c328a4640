//! Table and JSON rendering of API responses.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::Value;

pub mod attributes;
pub mod rows;
mod table;

pub use table::Table;

use crate::utils::write_json;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    #[default]
    Table,
}

/// Prints `body` unmodified as JSON, or the table projected from it.
pub fn render<W, F>(out: &mut W, format: Format, body: &Value, project: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&Value) -> Table,
{
    match format {
        Format::Json => write_json(out, body),
        Format::Table => project(body)
            .write_to(out)
            .context("Failed to write table"),
    }
}
