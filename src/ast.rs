//! # minisql - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for the restricted SQL
//! `SELECT` dialect understood by this crate.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Binary operators (arithmetic, comparison, logical, `LIKE`)
//! - **[node]** - The [`Node`] variants and the [`Select`] statement root
//! - **[tree]** - Indented tree rendering for diagnostics
//!
//! ## Quick Start
//!
//! ```text
//! select name, age * 2 as double_age from people where age >= 10 order by name asc
//! ```
//!
//! parses into a [`Node::Select`] whose projection is an expression list, whose
//! source table is an identifier, and whose optional clauses (`where`,
//! `group by`, `having`, `order by`) are each either present or `None`.
//!
//! ## Precedence
//!
//! From loosest to tightest: `or`, `and`, comparison and `like`, `+ -`,
//! `* /`, atoms (literals, columns, calls, parenthesised expressions). All
//! binary operators are left-associative.
//!
//! ## Traversal
//!
//! Every node lists its children through [`Node::children`], which drives both
//! [`Node::visit`] (pre-order) and [`Node::tree`]:
//!
//! ```text
//! select
//! ├ exprs
//! │ └ name
//! ├ people
//! └ where
//!   └ >=
//!     ├ age
//!     └ 10
//! ```
pub mod node;
pub mod operators;
pub mod tokens;
pub mod tree;

pub use node::{Node, Select};
pub use operators::BinOp;
pub use tokens::Token;
