//! JSON <-> minisql Value conversion utilities

use super::CliError;
use crate::{Table, Value};

pub use crate::output::value_to_json;

/// Convert a scalar `serde_json::Value` to a cell value. Nested arrays and
/// objects are not valid cells.
pub fn json_to_value(v: serde_json::Value) -> Result<Value, CliError> {
    match v {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Integer(i)),
            None => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| CliError::InvalidTableJson(format!("number {} out of range", n))),
        },
        serde_json::Value::String(s) => Ok(Value::String(s)),
        other => Err(CliError::InvalidTableJson(format!(
            "cells must be scalars, got {}",
            other
        ))),
    }
}

/// Build a table from `{"columns": ["a", "b"], "rows": [[1, "x"], ...]}`.
pub fn table_from_json(json: serde_json::Value) -> Result<Table, CliError> {
    let serde_json::Value::Object(mut object) = json else {
        return Err(CliError::InvalidTableJson("expected an object".to_string()));
    };

    let columns = match object.remove("columns") {
        Some(serde_json::Value::Array(columns)) => columns
            .into_iter()
            .map(|c| match c {
                serde_json::Value::String(name) => Ok(name),
                other => Err(CliError::InvalidTableJson(format!(
                    "column names must be strings, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(CliError::InvalidTableJson(
                "missing \"columns\" array".to_string(),
            ));
        }
    };

    let rows = match object.remove("rows") {
        Some(serde_json::Value::Array(rows)) => rows
            .into_iter()
            .map(|row| match row {
                serde_json::Value::Array(cells) => {
                    cells.into_iter().map(json_to_value).collect::<Result<Vec<_>, _>>()
                }
                other => Err(CliError::InvalidTableJson(format!(
                    "rows must be arrays, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
        Some(_) => return Err(CliError::InvalidTableJson("\"rows\" must be an array".to_string())),
    };

    Ok(Table::new(columns, rows)?)
}
