use std::{collections::HashMap, rc::Rc};

use crate::{
    interpreter::EvalError,
    table::{RowId, Table},
    value::Value,
};

/// Mutable evaluation state for one query execution.
///
/// Holds the table registry, the table in scope, the working row set (row
/// handles surviving the clauses applied so far), a cursor naming the row
/// being evaluated, and the optional aggregation scope. Not meant to be
/// shared: give each execution its own context. Tables are reference
/// counted so several contexts can share read-only data.
#[derive(Debug, Default)]
pub struct Context {
    tables: HashMap<String, Rc<Table>>,
    current: Option<Rc<Table>>,
    rows: Vec<RowId>,
    cursor: RowId,
    group: Option<Vec<RowId>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `table` under `name`, replacing any previous table of that name.
    pub fn register(&mut self, name: impl Into<String>, table: impl Into<Rc<Table>>) {
        self.tables.insert(name.into(), table.into());
    }

    pub fn get(&self, name: &str) -> Result<Rc<Table>, EvalError> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::TableNotFound(name.to_string()))
    }

    /// Brings `table` into scope with every row in the working set, the
    /// cursor on the first row and no aggregation scope.
    pub fn enter(&mut self, table: Rc<Table>) {
        self.rows = table.row_ids();
        self.current = Some(table);
        self.cursor = 0;
        self.group = None;
    }

    pub fn table(&self) -> Result<&Rc<Table>, EvalError> {
        self.current.as_ref().ok_or(EvalError::NoTableInScope)
    }

    /// Working row set of the table in scope.
    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Vec<RowId>) {
        self.rows = rows;
    }

    pub fn cursor(&self) -> RowId {
        self.cursor
    }

    pub fn set_cursor(&mut self, row: RowId) {
        self.cursor = row;
    }

    pub fn next_row(&mut self) {
        self.cursor += 1;
    }

    /// True once the cursor has moved past the last row of the table in scope.
    pub fn is_end(&self) -> bool {
        match &self.current {
            Some(table) => self.cursor >= table.len(),
            None => true,
        }
    }

    /// Value of `column` at the cursor row of the table in scope.
    pub fn value(&self, column: &str) -> Result<Value, EvalError> {
        self.table()?.lookup(column, self.cursor)
    }

    pub fn group_rows(&self) -> Option<&[RowId]> {
        self.group.as_deref()
    }

    pub fn set_group_rows(&mut self, rows: Option<Vec<RowId>>) {
        self.group = rows;
    }

    /// Rows an aggregate reduces over: the active group, or else the
    /// whole working row set.
    pub fn scope_rows(&self) -> &[RowId] {
        self.group.as_deref().unwrap_or(&self.rows)
    }
}
