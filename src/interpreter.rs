use std::{cmp::Ordering, collections::HashMap, fmt};

use regex::Regex;
use tracing::{debug, debug_span, trace};

use crate::{
    ast::{BinOp, Node, Select},
    context::Context,
    functions::FunctionRegistry,
    pattern::compile_like,
    table::{Row, RowId},
    value::Value,
};

/// Errors that can occur during query evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// No table registered under this name
    TableNotFound(String),

    /// Column absent from the schema of the table in scope
    ColumnNotFound(String),

    /// Cursor outside the rows of the table in scope
    RowIndexOutOfRange { index: usize, len: usize },

    /// A column was read before any table was brought into scope
    NoTableInScope,

    /// The node cannot be evaluated in this position
    UnsupportedNode(String),

    /// Call to a function missing from the registry
    UnknownFunction(String),

    /// Call with the wrong number of arguments
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    /// Type mismatch or invalid operation for the given type
    TypeError(String),

    /// Division by zero
    DivisionByZero,

    /// Integer arithmetic out of range
    Overflow(String),

    /// A `LIKE` pattern that failed to compile
    InvalidPattern(String),

    /// A recognised clause that has no evaluation yet
    NotImplemented(String),
}

impl EvalError {
    /// True for failures raised while applying an operator or function to
    /// values, as opposed to lookup or dispatch failures.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self,
            EvalError::TypeError(_)
                | EvalError::DivisionByZero
                | EvalError::Overflow(_)
                | EvalError::InvalidPattern(_)
                | EvalError::ArgumentCount { .. }
        )
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::TableNotFound(name) => write!(f, "Table {} not found", name),
            EvalError::ColumnNotFound(name) => write!(f, "Column [{}] not found", name),
            EvalError::RowIndexOutOfRange { index, len } => {
                write!(f, "Row index [{}] out of range for {} rows", index, len)
            }
            EvalError::NoTableInScope => write!(f, "No table in scope"),
            EvalError::UnsupportedNode(label) => write!(f, "Unsupported node: {}", label),
            EvalError::UnknownFunction(name) => write!(f, "Unknown function: {}", name),
            EvalError::ArgumentCount {
                function,
                expected,
                found,
            } => write!(
                f,
                "{}() takes {} argument(s), got {}",
                function, expected, found
            ),
            EvalError::TypeError(msg) => write!(f, "Type error: {}", msg),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::Overflow(msg) => write!(f, "Overflow: {}", msg),
            EvalError::InvalidPattern(msg) => write!(f, "Invalid LIKE pattern {}", msg),
            EvalError::NotImplemented(what) => write!(f, "{} is not implemented", what),
        }
    }
}

impl std::error::Error for EvalError {}

/// Rows sharing one `GROUP BY` key, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup {
    pub key: Vec<Value>,
    pub rows: Vec<RowId>,
}

/// A row in the working set together with the group it belongs to.
#[derive(Debug, Clone, Copy)]
struct Slot {
    row: RowId,
    group: Option<usize>,
}

/// Tree-walking interpreter for parsed `SELECT` statements.
///
/// Holds the aggregate function registry and a cache of compiled `LIKE`
/// patterns; all per-query state lives in the [`Context`].
#[derive(Default)]
pub struct Interpreter {
    functions: FunctionRegistry,
    patterns: HashMap<String, Regex>,
}

impl Interpreter {
    /// Creates an interpreter with the built-in aggregate functions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Interpreter {
            functions,
            patterns: HashMap::new(),
        }
    }

    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Executes a parsed statement against the tables registered in `ctx`.
    ///
    /// # Examples
    ///
    /// ```
    /// use minisql::{parse, Context, Interpreter, Table, Value};
    ///
    /// let table = Table::new(
    ///     vec!["col1", "col2"],
    ///     vec![
    ///         vec![Value::Integer(1), Value::from("a")],
    ///         vec![Value::Integer(22), Value::from("b")],
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let mut ctx = Context::new();
    /// ctx.register("table_1", table);
    ///
    /// let root = parse("select * from table_1 where col1 < 3").unwrap();
    /// let rows = Interpreter::new().execute(&root, &mut ctx).unwrap();
    /// assert_eq!(rows, vec![vec![Value::Integer(1), Value::from("a")]]);
    /// ```
    pub fn execute(&mut self, root: &Node, ctx: &mut Context) -> Result<Vec<Row>, EvalError> {
        match root {
            Node::Select(select) => self.execute_select(select, ctx),
            other => Err(EvalError::UnsupportedNode(other.label())),
        }
    }

    fn execute_select(&mut self, select: &Select, ctx: &mut Context) -> Result<Vec<Row>, EvalError> {
        let name = select
            .table_name()
            .ok_or_else(|| EvalError::UnsupportedNode(select.table.label()))?;
        let span = debug_span!("select", table = name);
        let _guard = span.enter();

        let table = ctx.get(name)?;
        let table_len = table.len();
        ctx.enter(table);
        debug!(rows = table_len, "table in scope");

        if let Some(having) = &select.having {
            self.having(having, ctx)?;
        }

        if let Some(filter) = &select.filter {
            let kept = self.filter(filter, ctx)?;
            debug!(kept = kept.len(), scanned = ctx.rows().len(), "where applied");
            ctx.set_rows(kept);
        }

        let projections = select.projections();

        if projections.iter().any(Node::is_aggregate) {
            let scope = ctx.rows().to_vec();
            debug!(rows = scope.len(), "whole-table aggregate");
            // Bare columns next to aggregates read the first scoped row.
            ctx.set_cursor(scope.first().copied().unwrap_or(table_len));
            ctx.set_group_rows(Some(scope));
            return Ok(vec![self.project(projections, ctx)?]);
        }

        let mut groups = Vec::new();
        let mut slots: Vec<Slot> = match &select.group_by {
            Some(group_by) => {
                groups = self.group(group_by, ctx)?;
                debug!(groups = groups.len(), "group by applied");
                groups
                    .iter()
                    .enumerate()
                    .flat_map(|(i, group)| {
                        group.rows.iter().map(move |&row| Slot {
                            row,
                            group: Some(i),
                        })
                    })
                    .collect()
            }
            None => {
                ctx.set_group_rows(None);
                ctx.rows()
                    .iter()
                    .map(|&row| Slot { row, group: None })
                    .collect()
            }
        };

        if let Some(order_by) = &select.order_by {
            let items = order_items(order_by)?;
            slots = self.sort_slots(items, slots, &groups, ctx)?;
            debug!(rows = slots.len(), keys = items.len(), "order by applied");
        }

        let mut active = None;
        let mut result = Vec::with_capacity(slots.len());
        for slot in slots {
            enter_slot(ctx, slot, &groups, &mut active);
            result.push(self.project(projections, ctx)?);
        }
        debug!(rows = result.len(), "projection complete");
        Ok(result)
    }

    /// Evaluates every projection at the cursor row; `*` splices the whole
    /// row in place.
    fn project(&mut self, projections: &[Node], ctx: &mut Context) -> Result<Row, EvalError> {
        let mut row = Vec::with_capacity(projections.len());
        for expr in projections {
            match self.eval(expr, ctx)? {
                Value::Array(values) if expr.is_wildcard() => row.extend(values),
                value => row.push(value),
            }
        }
        Ok(row)
    }

    /// Evaluates an expression node at the context's cursor row.
    ///
    /// Clause nodes have their own entry points ([`Interpreter::filter`],
    /// [`Interpreter::group`], [`Interpreter::order`]) and are rejected here.
    pub fn eval(&mut self, node: &Node, ctx: &mut Context) -> Result<Value, EvalError> {
        match node {
            Node::Num(n) => Ok(Value::from_decimal(*n)),
            Node::Str(s) => Ok(Value::String(s.clone())),
            Node::Ident(name) => ctx.value(name),
            Node::BinOp { op, left, right } => {
                let left = self.eval(left, ctx)?;
                let right = self.eval(right, ctx)?;
                self.apply_binop(*op, left, right)
            }
            Node::As { expr, .. } => self.eval(expr, ctx),
            Node::ExprList(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, ctx)?);
                }
                Ok(Value::Array(values))
            }
            Node::Call { func, args } => self.call(func, args, ctx),
            Node::OrderExpr { .. } => {
                let (value, desc) = self.order_key(node, ctx)?;
                Ok(Value::Array(vec![value, Value::Boolean(desc)]))
            }
            Node::OrderExprList(items) => {
                let mut keys = Vec::with_capacity(items.len());
                for item in items {
                    keys.push(self.eval(item, ctx)?);
                }
                Ok(Value::Array(keys))
            }
            Node::Having(_) => Err(EvalError::NotImplemented("HAVING".to_string())),
            Node::Where(_) | Node::Group(_) | Node::Order(_) | Node::Select(_) => {
                Err(EvalError::UnsupportedNode(node.label()))
            }
        }
    }

    fn apply_binop(&mut self, op: BinOp, left: Value, right: Value) -> Result<Value, EvalError> {
        match op {
            BinOp::Add | BinOp::Subtract | BinOp::Multiply | BinOp::Divide => {
                arithmetic(op, &left, &right)
            }
            BinOp::Equal => Ok(Value::Boolean(left.loose_eq(&right))),
            BinOp::NotEqual => Ok(Value::Boolean(!left.loose_eq(&right))),
            BinOp::LessThan | BinOp::LessEqual | BinOp::GreaterThan | BinOp::GreaterEqual => {
                if left.is_null() || right.is_null() {
                    return Ok(Value::Null);
                }
                let ordering = left.partial_compare(&right).ok_or_else(|| {
                    EvalError::TypeError(format!(
                        "Cannot compare {} {} {}",
                        left.type_name(),
                        op,
                        right.type_name()
                    ))
                })?;
                let result = match op {
                    BinOp::LessThan => ordering.is_lt(),
                    BinOp::LessEqual => ordering.is_le(),
                    BinOp::GreaterThan => ordering.is_gt(),
                    _ => ordering.is_ge(),
                };
                Ok(Value::Boolean(result))
            }
            // Both sides are already evaluated; the operand itself is returned.
            BinOp::And => Ok(if left.is_truthy() { right } else { left }),
            BinOp::Or => Ok(if left.is_truthy() { left } else { right }),
            BinOp::Like => self.like(&left, &right),
        }
    }

    fn like(&mut self, subject: &Value, pattern: &Value) -> Result<Value, EvalError> {
        let pattern = match pattern {
            Value::String(p) => p,
            other => {
                return Err(EvalError::TypeError(format!(
                    "LIKE pattern must be a string, got {}",
                    other.type_name()
                )));
            }
        };
        if subject.is_null() {
            return Ok(Value::Boolean(false));
        }

        if !self.patterns.contains_key(pattern) {
            let compiled = compile_like(pattern)?;
            self.patterns.insert(pattern.clone(), compiled);
        }
        let matched = self.patterns[pattern].is_match(&subject.as_string());
        Ok(Value::Boolean(matched))
    }

    /// Runs an aggregate over the active scope: the current group if one is
    /// set, otherwise the whole working row set.
    fn call(&mut self, func: &str, args: &[Node], ctx: &mut Context) -> Result<Value, EvalError> {
        let function = self.functions.get(func)?;
        if args.len() != function.arity() {
            return Err(EvalError::ArgumentCount {
                function: func.to_string(),
                expected: function.arity(),
                found: args.len(),
            });
        }

        let saved = ctx.cursor();
        let scope = ctx.scope_rows().to_vec();
        let mut values = Vec::with_capacity(scope.len());
        let mut collected = Ok(());
        for row in scope {
            ctx.set_cursor(row);
            match self.eval_args(args, ctx) {
                Ok(Value::Null) => {}
                Ok(value) => values.push(value),
                Err(e) => {
                    collected = Err(e);
                    break;
                }
            }
        }
        ctx.set_cursor(saved);
        collected?;

        function.aggregate(&values)
    }

    /// A single argument yields its value; several yield an array.
    fn eval_args(&mut self, args: &[Node], ctx: &mut Context) -> Result<Value, EvalError> {
        match args {
            [arg] => self.eval(arg, ctx),
            _ => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, ctx)?);
                }
                Ok(Value::Array(values))
            }
        }
    }

    /// `WHERE`: the working rows whose predicates are all truthy, in order.
    pub fn filter(&mut self, node: &Node, ctx: &mut Context) -> Result<Vec<RowId>, EvalError> {
        let Node::Where(predicates) = node else {
            return Err(EvalError::UnsupportedNode(node.label()));
        };

        let mut kept = Vec::new();
        for row in ctx.rows().to_vec() {
            ctx.set_cursor(row);
            let mut keep = true;
            for predicate in predicates {
                if !self.eval(predicate, ctx)?.is_truthy() {
                    keep = false;
                    break;
                }
            }
            if keep {
                kept.push(row);
            }
        }
        Ok(kept)
    }

    /// `GROUP BY`: partitions the working rows by the tuple of key values,
    /// keeping groups in first-seen order.
    pub fn group(&mut self, node: &Node, ctx: &mut Context) -> Result<Vec<RowGroup>, EvalError> {
        let Node::Group(keys) = node else {
            return Err(EvalError::UnsupportedNode(node.label()));
        };

        let mut groups: Vec<RowGroup> = Vec::new();
        for row in ctx.rows().to_vec() {
            ctx.set_cursor(row);
            let key = keys
                .iter()
                .map(|expr| self.eval(expr, ctx))
                .collect::<Result<Vec<_>, _>>()?;

            // Linear in the number of groups: `loose_eq` keys (`1` vs `1.0`) have no
            // hash that agrees with them.
            match groups.iter_mut().find(|g| keys_match(&g.key, &key)) {
                Some(group) => group.rows.push(row),
                None => {
                    trace!(?key, "new group");
                    groups.push(RowGroup {
                        key,
                        rows: vec![row],
                    });
                }
            }
        }
        Ok(groups)
    }

    /// `HAVING` is parsed but never evaluated.
    pub fn having(&mut self, node: &Node, _ctx: &mut Context) -> Result<Vec<RowId>, EvalError> {
        match node {
            Node::Having(_) => Err(EvalError::NotImplemented("HAVING".to_string())),
            other => Err(EvalError::UnsupportedNode(other.label())),
        }
    }

    /// One sort key at the cursor row: its value and whether it sorts descending.
    pub fn order_key(&mut self, node: &Node, ctx: &mut Context) -> Result<(Value, bool), EvalError> {
        match node {
            Node::OrderExpr { expr, desc } => Ok((self.eval(expr, ctx)?, *desc)),
            other => Err(EvalError::UnsupportedNode(other.label())),
        }
    }

    /// `ORDER BY`: the working rows stably sorted by the composite key.
    pub fn order(&mut self, node: &Node, ctx: &mut Context) -> Result<Vec<RowId>, EvalError> {
        let items = order_items(node)?;
        let slots = ctx
            .rows()
            .iter()
            .map(|&row| Slot { row, group: None })
            .collect();
        let sorted = self.sort_slots(items, slots, &[], ctx)?;
        Ok(sorted.into_iter().map(|slot| slot.row).collect())
    }

    fn sort_slots(
        &mut self,
        items: &[Node],
        slots: Vec<Slot>,
        groups: &[RowGroup],
        ctx: &mut Context,
    ) -> Result<Vec<Slot>, EvalError> {
        let mut active = None;
        let mut keyed = Vec::with_capacity(slots.len());
        for slot in slots {
            enter_slot(ctx, slot, groups, &mut active);
            let keys = items
                .iter()
                .map(|item| self.order_key(item, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            keyed.push((slot, keys));
        }

        // `sort_by` is stable: rows with equal keys keep their order.
        keyed.sort_by(|(_, a), (_, b)| compare_keys(a, b));
        Ok(keyed.into_iter().map(|(slot, _)| slot).collect())
    }
}

/// Positions the cursor on `slot`, switching the aggregation scope only
/// when the slot belongs to a different group than the previous one.
fn enter_slot(ctx: &mut Context, slot: Slot, groups: &[RowGroup], active: &mut Option<Option<usize>>) {
    if *active != Some(slot.group) {
        ctx.set_group_rows(slot.group.map(|i| groups[i].rows.clone()));
        *active = Some(slot.group);
    }
    ctx.set_cursor(slot.row);
}

fn order_items(node: &Node) -> Result<&[Node], EvalError> {
    match node {
        Node::Order(items) | Node::OrderExprList(items) => Ok(items),
        other => Err(EvalError::UnsupportedNode(other.label())),
    }
}

/// Compares key tuples left to right, each key in its own direction.
fn compare_keys(a: &[(Value, bool)], b: &[(Value, bool)]) -> Ordering {
    for ((left, desc), (right, _)) in a.iter().zip(b) {
        let ordering = left.sort_cmp(right);
        let ordering = if *desc { ordering.reverse() } else { ordering };
        if ordering.is_ne() {
            return ordering;
        }
    }
    Ordering::Equal
}

fn keys_match(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
}

fn arithmetic(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let mismatch = || {
        let (l, r) = (left.type_name(), right.type_name());
        EvalError::TypeError(match op {
            BinOp::Add => format!("Cannot add {} and {}", l, r),
            BinOp::Subtract => format!("Cannot subtract {} from {}", r, l),
            BinOp::Multiply => format!("Cannot multiply {} by {}", l, r),
            _ => format!("Cannot divide {} by {}", l, r),
        })
    };
    let overflow = || EvalError::Overflow(format!("integer {} out of range", op));

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            let (a, b) = (*a, *b);
            match op {
                BinOp::Add => a.checked_add(b).map(Value::Integer).ok_or_else(overflow),
                BinOp::Subtract => a.checked_sub(b).map(Value::Integer).ok_or_else(overflow),
                BinOp::Multiply => a.checked_mul(b).map(Value::Integer).ok_or_else(overflow),
                _ => {
                    if b == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    // Exact division stays integer.
                    match a.checked_rem(b) {
                        Some(0) => a.checked_div(b).map(Value::Integer).ok_or_else(overflow),
                        Some(_) => Ok(Value::Float(a as f64 / b as f64)),
                        None => Err(overflow()),
                    }
                }
            }
        }
        (Value::Float(a), Value::Float(b)) => {
            let (a, b) = (*a, *b);
            match op {
                BinOp::Add => Ok(Value::Float(a + b)),
                BinOp::Subtract => Ok(Value::Float(a - b)),
                BinOp::Multiply => Ok(Value::Float(a * b)),
                _ if b == 0.0 => Err(EvalError::DivisionByZero),
                _ => Ok(Value::Float(a / b)),
            }
        }
        (l, r) if l.is_numeric() && r.is_numeric() => {
            if op == BinOp::Divide && r.as_float() == Some(0.0) {
                return Err(EvalError::DivisionByZero);
            }
            if let (Some(ad), Some(bd)) = (l.as_decimal(), r.as_decimal()) {
                let exact = match op {
                    BinOp::Add => ad.checked_add(bd),
                    BinOp::Subtract => ad.checked_sub(bd),
                    BinOp::Multiply => ad.checked_mul(bd),
                    _ => ad.checked_div(bd),
                };
                if let Some(rd) = exact {
                    return Ok(Value::from_decimal(rd));
                }
            }
            let (a, b) = (l.as_float().unwrap_or(0.0), r.as_float().unwrap_or(0.0));
            Ok(Value::Float(match op {
                BinOp::Add => a + b,
                BinOp::Subtract => a - b,
                BinOp::Multiply => a * b,
                _ => a / b,
            }))
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::Parser, lexer::Lexer, table::Table};

    fn expr(source: &str) -> Node {
        Parser::new(Lexer::new(source)).unwrap().parse().unwrap()
    }

    fn eval_scalar(source: &str) -> Result<Value, EvalError> {
        Interpreter::new().eval(&expr(source), &mut Context::new())
    }

    #[test]
    fn test_integer_arithmetic() {
        assert_eq!(eval_scalar("1 + 2 * 3").unwrap(), Value::Integer(7));
        assert_eq!(eval_scalar("7 / 2").unwrap(), Value::Float(3.5));
        assert_eq!(eval_scalar("8 / 2").unwrap(), Value::Integer(4));
    }

    #[test]
    fn test_mixed_arithmetic_collapses_whole_results() {
        assert_eq!(eval_scalar("1.5 * 2").unwrap(), Value::Integer(3));
        assert_eq!(eval_scalar("1.5 + 1").unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval_scalar("1 / 0"), Err(EvalError::DivisionByZero));
        assert!(eval_scalar("1 / 0").unwrap_err().is_evaluation_error());
    }

    #[test]
    fn test_non_numeric_operand() {
        let err = eval_scalar("'a' + 1").unwrap_err();
        assert!(matches!(err, EvalError::TypeError(msg) if msg == "Cannot add string and integer"));
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(eval_scalar("0 or 'x'").unwrap(), Value::from("x"));
        assert_eq!(eval_scalar("2 and 5").unwrap(), Value::Integer(5));
        assert_eq!(eval_scalar("0 and 5").unwrap(), Value::Integer(0));
    }

    #[test]
    fn test_clause_in_expression_position() {
        let node = Node::Where(vec![Node::Num(rust_decimal::Decimal::ONE)]);
        let err = Interpreter::new().eval(&node, &mut Context::new()).unwrap_err();
        assert_eq!(err, EvalError::UnsupportedNode("where".to_string()));
    }

    #[test]
    fn test_order_sorts_working_rows() {
        let table = Table::new(
            vec!["n"],
            vec![
                vec![Value::Integer(3)],
                vec![Value::Integer(1)],
                vec![Value::Integer(2)],
            ],
        )
        .unwrap();
        let mut ctx = Context::new();
        ctx.register("t", table);
        let table = ctx.get("t").unwrap();
        ctx.enter(table);

        let order = Node::Order(vec![Node::order_expr(Node::Ident("n".into()), true)]);
        let sorted = Interpreter::new().order(&order, &mut ctx).unwrap();
        assert_eq!(sorted, vec![0, 2, 1]);
    }
}
