//! Execute queries against tables loaded from JSON files

use std::{fs, path::PathBuf, str::FromStr};

use tracing::debug;

use super::{CliError, table_from_json};
use crate::{Context, Interpreter, Row, output, parse};

/// How result rows are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON array of rows
    #[default]
    Json,
    /// Indented JSON
    Pretty,
    /// Tab-separated, one row per line
    Text,
}

/// A `--table name=path.json` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub path: PathBuf,
}

impl FromStr for TableSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
                Ok(TableSpec {
                    name: name.trim().to_string(),
                    path: PathBuf::from(path.trim()),
                })
            }
            _ => Err(CliError::InvalidTableSpec(s.to_string())),
        }
    }
}

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// The SQL query to execute
    pub query: String,
    /// Tables to register before executing
    pub tables: Vec<TableSpec>,
    pub format: OutputFormat,
}

/// Read each table file and register it in `ctx` under its given name.
pub fn load_tables(specs: &[TableSpec], ctx: &mut Context) -> Result<(), CliError> {
    for spec in specs {
        let text = fs::read_to_string(&spec.path)?;
        let table = table_from_json(serde_json::from_str(&text)?)?;
        debug!(
            table = %spec.name,
            path = %spec.path.display(),
            rows = table.len(),
            "table loaded"
        );
        ctx.register(spec.name.clone(), table);
    }
    Ok(())
}

/// Parse `query` and execute it against the tables already in `ctx`.
pub fn run_query(query: &str, ctx: &mut Context) -> Result<Vec<Row>, CliError> {
    let root = parse(query)?;
    Ok(Interpreter::new().execute(&root, ctx)?)
}

pub fn format_rows(rows: &[Row], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => output::to_json(rows),
        OutputFormat::Pretty => output::to_json_pretty(rows),
        OutputFormat::Text => output::to_text(rows).trim_end_matches('\n').to_string(),
    }
}

/// Execute a run operation and return the formatted result.
pub fn execute_run(options: &RunOptions) -> Result<String, CliError> {
    let mut ctx = Context::new();
    load_tables(&options.tables, &mut ctx)?;
    let rows = run_query(&options.query, &mut ctx)?;
    Ok(format_rows(&rows, options.format))
}

/// Syntax-only validation.
pub fn check_syntax(query: &str) -> Result<(), CliError> {
    parse(query)?;
    Ok(())
}

pub fn render_tree(query: &str) -> Result<String, CliError> {
    Ok(parse(query)?.render_tree())
}
