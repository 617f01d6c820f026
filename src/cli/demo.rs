//! Built-in demonstration tables and queries

use std::fmt::Write;

use super::{CliError, run_query};
use crate::{Context, Table, TableError, Value, output, parse};

/// A titled demo query
#[derive(Debug, Clone, Copy)]
pub struct DemoCase {
    pub title: &'static str,
    pub query: &'static str,
}

pub const DEMO_CASES: [DemoCase; 4] = [
    DemoCase {
        title: "where",
        query: "select * from table_1 where col1 < 3",
    },
    DemoCase {
        title: "order by",
        query: "select name from table_2 where age >= 10 order by name asc",
    },
    DemoCase {
        title: "group by",
        query: "select apple, banana from table_3 group by banana",
    },
    DemoCase {
        title: "like",
        query: "select first_name, age from table_4 where first_name like 'R%'",
    },
];

pub fn demo_tables() -> Result<Vec<(&'static str, Table)>, TableError> {
    Ok(vec![
        (
            "table_1",
            Table::new(
                vec!["col1", "col2"],
                vec![
                    vec![Value::Integer(1), Value::from("a")],
                    vec![Value::Integer(22), Value::from("b")],
                    vec![Value::Integer(3), Value::from("c")],
                    vec![Value::Integer(3), Value::from("c")],
                ],
            )?,
        ),
        (
            "table_2",
            Table::new(
                vec!["age", "name"],
                vec![
                    vec![Value::Integer(14), Value::from("bob")],
                    vec![Value::Integer(32), Value::from("tom")],
                    vec![Value::Integer(2), Value::from("cail")],
                    vec![Value::Integer(11), Value::from("sasha")],
                    vec![Value::Integer(18), Value::from("alex")],
                ],
            )?,
        ),
        (
            "table_3",
            Table::new(
                vec!["apple", "banana"],
                vec![
                    vec![Value::Integer(18), Value::Integer(5)],
                    vec![Value::Integer(14), Value::Integer(8)],
                    vec![Value::Integer(32), Value::Integer(32)],
                    vec![Value::Integer(2), Value::Integer(8)],
                    vec![Value::Integer(14), Value::Integer(32)],
                ],
            )?,
        ),
        (
            "table_4",
            Table::new(
                vec!["first_name", "age"],
                vec![
                    vec![Value::from("John"), Value::Integer(31)],
                    vec![Value::from("Robert"), Value::Integer(22)],
                    vec![Value::from("David"), Value::Integer(22)],
                    vec![Value::from("John"), Value::Integer(25)],
                    vec![Value::from("Betty"), Value::Integer(28)],
                ],
            )?,
        ),
    ])
}

/// Context with every demo table registered.
pub fn demo_context() -> Result<Context, CliError> {
    let mut ctx = Context::new();
    for (name, table) in demo_tables()? {
        ctx.register(name, table);
    }
    Ok(ctx)
}

/// Runs every demo query, returning each one's tree and result rows.
pub fn run_demo() -> Result<String, CliError> {
    let mut ctx = demo_context()?;
    let mut out = String::new();

    for (i, case) in DEMO_CASES.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let tree = parse(case.query)?.render_tree();
        let rows = run_query(case.query, &mut ctx)?;
        // Writing to a String cannot fail.
        let _ = writeln!(out, "-- {}: {}", case.title, case.query);
        let _ = writeln!(out, "{}", tree);
        let _ = writeln!(out, "{}", output::to_json(&rows));
    }
    Ok(out)
}
