use std::fmt;

use rust_decimal::Decimal;

use crate::ast::BinOp;

/// Abstract Syntax Tree node.
///
/// A closed set of variants covering literals, operator applications,
/// clauses and the `SELECT` statement itself. Children are owned by their
/// parent; [`Node::children`] only borrows them for traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Literals
    /// Numeric literal, exact as written
    ///
    /// # Example
    /// ```text
    /// 42
    /// 1.5
    /// ```
    Num(Decimal),

    /// Column reference, or the `*` wildcard for the whole row
    ///
    /// # Example
    /// ```text
    /// col1
    /// *
    /// ```
    Ident(String),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// 'Robert'
    /// ```
    Str(String),

    // Operations
    /// Binary operation (arithmetic, comparison, logical, pattern)
    BinOp {
        op: BinOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// Aliased projection. The alias is display metadata only.
    ///
    /// # Example
    /// ```text
    /// sum(age) as total
    /// ```
    As { expr: Box<Node>, alias: String },

    /// Ordered list of expressions
    ExprList(Vec<Node>),

    /// Aggregate function call
    ///
    /// # Example
    /// ```text
    /// sum(col1 * 2)
    /// ```
    Call { func: String, args: Vec<Node> },

    // Clauses
    /// `WHERE` predicates
    Where(Vec<Node>),

    /// `GROUP BY` key expressions
    Group(Vec<Node>),

    /// `HAVING` predicates
    Having(Vec<Node>),

    /// One `ORDER BY` key with its direction
    OrderExpr { expr: Box<Node>, desc: bool },

    /// Ordered list of [`Node::OrderExpr`]
    OrderExprList(Vec<Node>),

    /// `ORDER BY` clause root, holding [`Node::OrderExpr`] items
    Order(Vec<Node>),

    /// Statement root
    Select(Box<Select>),
}

/// A parsed `SELECT` statement.
///
/// `projection` is always a [`Node::ExprList`] and `table` a [`Node::Ident`];
/// each clause is `None` when absent from the query text.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projection: Node,
    pub table: Node,
    pub filter: Option<Node>,
    pub group_by: Option<Node>,
    pub having: Option<Node>,
    pub order_by: Option<Node>,
}

impl Select {
    /// Name of the source table.
    pub fn table_name(&self) -> Option<&str> {
        match &self.table {
            Node::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Projection expressions in order.
    pub fn projections(&self) -> &[Node] {
        match &self.projection {
            Node::ExprList(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl Node {
    pub fn binary(op: BinOp, left: Node, right: Node) -> Node {
        Node::BinOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn alias(expr: Node, alias: impl Into<String>) -> Node {
        Node::As {
            expr: Box::new(expr),
            alias: alias.into(),
        }
    }

    pub fn call(func: impl Into<String>, args: Vec<Node>) -> Node {
        Node::Call {
            func: func.into(),
            args,
        }
    }

    pub fn order_expr(expr: Node, desc: bool) -> Node {
        Node::OrderExpr {
            expr: Box::new(expr),
            desc,
        }
    }

    pub fn select(select: Select) -> Node {
        Node::Select(Box::new(select))
    }

    /// True for the `*` wildcard column.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Node::Ident(name) if name == "*")
    }

    /// True for an aggregate call, looking through an alias.
    pub fn is_aggregate(&self) -> bool {
        match self {
            Node::Call { .. } => true,
            Node::As { expr, .. } => expr.is_aggregate(),
            _ => false,
        }
    }

    /// Child nodes in order. Leaves return an empty list and absent
    /// `SELECT` clauses are skipped.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Num(_) | Node::Ident(_) | Node::Str(_) => Vec::new(),
            Node::BinOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Node::As { expr, .. } | Node::OrderExpr { expr, .. } => vec![expr.as_ref()],
            Node::ExprList(items)
            | Node::Where(items)
            | Node::Group(items)
            | Node::Having(items)
            | Node::OrderExprList(items)
            | Node::Order(items)
            | Node::Call { args: items, .. } => items.iter().collect(),
            Node::Select(select) => {
                let mut children = vec![&select.projection, &select.table];
                children.extend(
                    [
                        &select.filter,
                        &select.group_by,
                        &select.having,
                        &select.order_by,
                    ]
                    .into_iter()
                    .flatten(),
                );
                children
            }
        }
    }

    /// Single-line label: operator symbol, literal value or clause keyword.
    pub fn label(&self) -> String {
        match self {
            Node::Num(n) => n.to_string(),
            Node::Ident(name) => name.clone(),
            Node::Str(s) => format!("'{}'", s),
            Node::BinOp { op, .. } => op.symbol().to_string(),
            Node::As { alias, .. } => format!("as {}", alias),
            Node::ExprList(_) => "exprs".to_string(),
            Node::Call { func, .. } => format!("{}()", func),
            Node::Where(_) => "where".to_string(),
            Node::Group(_) => "group by".to_string(),
            Node::Having(_) => "having".to_string(),
            Node::OrderExpr { desc, .. } => (if *desc { "desc" } else { "asc" }).to_string(),
            Node::OrderExprList(_) => "order exprs".to_string(),
            Node::Order(_) => "order by".to_string(),
            Node::Select(_) => "select".to_string(),
        }
    }

    /// Pre-order traversal: `func` sees this node, then each child subtree.
    pub fn visit<F>(&self, func: &mut F)
    where
        F: FnMut(&Node),
    {
        func(self);
        for child in self.children() {
            child.visit(func);
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Node], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &Node, parent: BinOp, right: bool) -> fmt::Result {
    match node {
        // Left-associative: a right operand at equal precedence needs parentheses.
        Node::BinOp { op, .. }
            if op.precedence() < parent.precedence()
                || (right && op.precedence() == parent.precedence()) =>
        {
            write!(f, "({})", node)
        }
        _ => write!(f, "{}", node),
    }
}

/// Renders SQL-like source text for the node.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Num(_) | Node::Ident(_) | Node::Str(_) => f.write_str(&self.label()),
            Node::BinOp { op, left, right } => {
                write_operand(f, left, *op, false)?;
                write!(f, " {} ", op)?;
                write_operand(f, right, *op, true)
            }
            Node::As { expr, alias } => write!(f, "{} as {}", expr, alias),
            Node::ExprList(items) | Node::OrderExprList(items) => write_list(f, items, ", "),
            Node::Call { func, args } => {
                write!(f, "{}(", func)?;
                write_list(f, args, ", ")?;
                f.write_str(")")
            }
            Node::Where(items) => {
                f.write_str("where ")?;
                write_list(f, items, " and ")
            }
            Node::Group(items) => {
                f.write_str("group by ")?;
                write_list(f, items, ", ")
            }
            Node::Having(items) => {
                f.write_str("having ")?;
                write_list(f, items, " and ")
            }
            Node::OrderExpr { expr, desc } => {
                write!(f, "{} {}", expr, if *desc { "desc" } else { "asc" })
            }
            Node::Order(items) => {
                f.write_str("order by ")?;
                write_list(f, items, ", ")
            }
            Node::Select(select) => {
                write!(f, "select {} from {}", select.projection, select.table)?;
                for clause in [
                    &select.filter,
                    &select.group_by,
                    &select.having,
                    &select.order_by,
                ]
                .into_iter()
                .flatten()
                {
                    write!(f, " {}", clause)?;
                }
                Ok(())
            }
        }
    }
}
