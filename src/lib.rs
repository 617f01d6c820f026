//! A small SQL `SELECT` engine over in-memory tables.
//!
//! Queries are lexed, parsed into a [`Node`] tree and evaluated by the
//! [`Interpreter`] against tables registered in a [`Context`]:
//!
//! ```
//! use minisql::{parse, Context, Interpreter, Table, Value};
//!
//! let people = Table::new(
//!     vec!["age", "name"],
//!     vec![
//!         vec![Value::Integer(14), Value::from("bob")],
//!         vec![Value::Integer(2), Value::from("cail")],
//!         vec![Value::Integer(18), Value::from("alex")],
//!     ],
//! )
//! .unwrap();
//!
//! let mut ctx = Context::new();
//! ctx.register("people", people);
//!
//! let root = parse("select name from people where age >= 10 order by name asc").unwrap();
//! let rows = Interpreter::new().execute(&root, &mut ctx).unwrap();
//! assert_eq!(rows, vec![vec![Value::from("alex")], vec![Value::from("bob")]]);
//! ```

pub mod ast;
pub mod context;
pub mod functions;
pub mod interpreter;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod pattern;
pub mod table;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{BinOp, Node, Select, Token};
pub use context::Context;
pub use functions::{AggregateFunction, FunctionRegistry};
pub use interpreter::{EvalError, Interpreter, RowGroup};
pub use lexer::{Lexer, Position, SyntaxError};
pub use output::{to_json, to_json_pretty, to_text};
pub use parser::{Parser, parse};
pub use table::{Row, RowId, Table, TableError};
pub use value::Value;
