use std::fmt;

/// Binary operators.
///
/// Every binary production of the grammar builds a single node kind tagged
/// with one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Arithmetic
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,

    // Comparison
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Equal (`=`)
    Equal,
    /// Not equal (`<>`)
    NotEqual,

    // Logical
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,

    // Pattern
    /// Pattern match (`like`), right operand is always a string literal
    Like,
}

impl BinOp {
    /// Source symbol, lowercase for word operators.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::Equal => "=",
            BinOp::NotEqual => "<>",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Like => "like",
        }
    }

    /// Binding strength, higher binds tighter.
    ///
    /// `or` < `and` < comparison/`like` < additive < multiplicative.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::GreaterThan
            | BinOp::GreaterEqual
            | BinOp::LessThan
            | BinOp::LessEqual
            | BinOp::Equal
            | BinOp::NotEqual
            | BinOp::Like => 3,
            BinOp::Add | BinOp::Subtract => 4,
            BinOp::Multiply | BinOp::Divide => 5,
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Subtract | BinOp::Multiply | BinOp::Divide
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
