//! Rendering of query results.
//!
//! - [`to_json()`] - compact JSON array of row arrays
//! - [`to_json_pretty()`] - the same with 2-space indentation
//! - [`to_text()`] - one line per row, cells separated by tabs
//!
//! ```
//! use minisql::Value;
//! use minisql::output::to_json;
//!
//! let rows = vec![vec![Value::Integer(1), Value::from("a")]];
//! assert_eq!(to_json(&rows), r#"[[1,"a"]]"#);
//! ```

use crate::{table::Row, value::Value};

/// Converts a value to its `serde_json` form. Non-finite floats become `null`.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
    }
}

pub fn rows_to_json(rows: &[Row]) -> serde_json::Value {
    serde_json::Value::Array(
        rows.iter()
            .map(|row| serde_json::Value::Array(row.iter().map(value_to_json).collect()))
            .collect(),
    )
}

pub fn to_json(rows: &[Row]) -> String {
    rows_to_json(rows).to_string()
}

pub fn to_json_pretty(rows: &[Row]) -> String {
    let json = rows_to_json(rows);
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
}

/// Tab-separated rows; nulls print as `NULL`.
pub fn to_text(rows: &[Row]) -> String {
    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(text_cell).collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
    out
}

fn text_cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        other => other.as_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_output() {
        let rows = vec![vec![Value::from("alex")]];
        assert_eq!(to_json_pretty(&rows), "[\n  [\n    \"alex\"\n  ]\n]");
    }

    #[test]
    fn test_text_output() {
        let rows = vec![
            vec![Value::Integer(18), Value::Null],
            vec![Value::Float(2.5), Value::from("x")],
        ];
        assert_eq!(to_text(&rows), "18\tNULL\n2.5\tx\n");
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(value_to_json(&Value::Float(f64::NAN)), serde_json::Value::Null);
    }
}
