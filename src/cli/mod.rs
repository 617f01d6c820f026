//! CLI support for minisql
//!
//! Provides programmatic access to the `minisql` commands so they can be
//! embedded in other tools and tested without spawning the binary.

mod convert;
mod demo;
mod run;

pub use convert::{json_to_value, table_from_json, value_to_json};
pub use demo::{DemoCase, DEMO_CASES, demo_context, demo_tables, run_demo};
pub use run::{
    OutputFormat, RunOptions, TableSpec, check_syntax, execute_run, format_rows, load_tables,
    render_tree, run_query,
};

use std::io;

use crate::{EvalError, SyntaxError, TableError};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Lexer or parser error
    Syntax(SyntaxError),
    /// Evaluation error
    Eval(EvalError),
    /// Table construction error
    Table(TableError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// A `--table` argument not of the form `name=path`
    InvalidTableSpec(String),
    /// Table JSON not shaped as `{"columns": [...], "rows": [[...]]}`
    InvalidTableJson(String),
    /// No query given and nothing piped on stdin
    NoInput,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Syntax(e) => write!(f, "{}", e),
            CliError::Eval(e) => write!(f, "Evaluation error: {}", e),
            CliError::Table(e) => write!(f, "Invalid table: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::InvalidTableSpec(spec) => {
                write!(f, "Invalid table '{}': expected NAME=PATH", spec)
            }
            CliError::InvalidTableJson(msg) => write!(f, "Invalid table JSON: {}", msg),
            CliError::NoInput => write!(f, "No query provided. Pass one as an argument or pipe it to stdin."),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Syntax(e) => Some(e),
            CliError::Eval(e) => Some(e),
            CliError::Table(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SyntaxError> for CliError {
    fn from(e: SyntaxError) -> Self {
        CliError::Syntax(e)
    }
}

impl From<EvalError> for CliError {
    fn from(e: EvalError) -> Self {
        CliError::Eval(e)
    }
}

impl From<TableError> for CliError {
    fn from(e: TableError) -> Self {
        CliError::Table(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
