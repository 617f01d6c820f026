use std::fmt;

use crate::{interpreter::EvalError, value::Value};

/// Stable handle for a row: its position in the table it was built with.
///
/// Filtering, grouping and sorting pass handles around instead of row
/// values, so identical rows stay distinguishable.
pub type RowId = usize;

pub type Row = Vec<Value>;

/// Errors raised while constructing a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A row's length differs from the number of columns
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The same column name appears twice
    DuplicateColumn(String),

    /// A column name is empty or the reserved wildcard `*`
    InvalidColumnName(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::RowWidth {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} values but the table has {} columns",
                row, found, expected
            ),
            TableError::DuplicateColumn(name) => write!(f, "Duplicate column: {}", name),
            TableError::InvalidColumnName(name) => write!(f, "Invalid column name: '{}'", name),
        }
    }
}

impl std::error::Error for TableError {}

/// In-memory table: ordered, unique column names and rows aligned to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: Vec<S>, rows: Vec<Row>) -> Result<Self, TableError> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        for (i, name) in columns.iter().enumerate() {
            if name.is_empty() || name == "*" {
                return Err(TableError::InvalidColumnName(name.clone()));
            }
            if columns[..i].contains(name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidth {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }

        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Handles for every row, in table order.
    pub fn row_ids(&self) -> Vec<RowId> {
        (0..self.rows.len()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row(&self, row: RowId) -> Result<&Row, EvalError> {
        self.rows.get(row).ok_or(EvalError::RowIndexOutOfRange {
            index: row,
            len: self.rows.len(),
        })
    }

    /// Value of `column` in `row`; `*` returns the whole row as an array.
    pub fn lookup(&self, column: &str, row: RowId) -> Result<Value, EvalError> {
        if column == "*" {
            return Ok(Value::Array(self.row(row)?.clone()));
        }

        let index = self
            .column_index(column)
            .ok_or_else(|| EvalError::ColumnNotFound(column.to_string()))?;
        Ok(self.row(row)?[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["col1", "col2"],
            vec![
                vec![Value::Integer(1), Value::from("a")],
                vec![Value::Integer(22), Value::from("b")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let table = sample();
        assert_eq!(table.lookup("col2", 1).unwrap(), Value::from("b"));
        assert_eq!(
            table.lookup("*", 0).unwrap(),
            Value::Array(vec![Value::Integer(1), Value::from("a")])
        );
    }

    #[test]
    fn test_lookup_errors() {
        let table = sample();
        assert!(matches!(
            table.lookup("missing", 0),
            Err(EvalError::ColumnNotFound(name)) if name == "missing"
        ));
        assert!(matches!(
            table.lookup("col1", 2),
            Err(EvalError::RowIndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Table::new(vec!["a", "b"], vec![vec![Value::Integer(1)]]).unwrap_err();
        assert_eq!(
            err,
            TableError::RowWidth {
                row: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = Table::new(vec!["a", "a"], vec![]).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".into()));
    }
}
