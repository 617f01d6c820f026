// tests/cli_tests.rs

#![cfg(feature = "cli")]

use std::{fs, path::PathBuf};

use minisql::cli::{
    self, CliError, DEMO_CASES, OutputFormat, RunOptions, TableSpec, demo_context,
    table_from_json,
};
use minisql::{EvalError, TableError, Value};
use serde_json::json;

fn temp_table(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("minisql-{}-{}.json", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Table JSON
// ============================================================================

#[test]
fn test_table_from_json() {
    let table = table_from_json(json!({
        "columns": ["age", "name", "score", "ok", "note"],
        "rows": [[14, "bob", 2.5, true, null]]
    }))
    .unwrap();

    assert_eq!(table.columns(), &["age", "name", "score", "ok", "note"]);
    assert_eq!(
        table.rows()[0],
        vec![
            Value::Integer(14),
            Value::from("bob"),
            Value::Float(2.5),
            Value::Boolean(true),
            Value::Null,
        ]
    );
}

#[test]
fn test_table_json_rejects_nested_cells() {
    let err = table_from_json(json!({"columns": ["a"], "rows": [[[1, 2]]]})).unwrap_err();
    assert!(matches!(err, CliError::InvalidTableJson(_)));
}

#[test]
fn test_table_json_requires_columns() {
    let err = table_from_json(json!({"rows": []})).unwrap_err();
    assert!(matches!(err, CliError::InvalidTableJson(_)));
}

#[test]
fn test_table_json_ragged_row() {
    let err = table_from_json(json!({"columns": ["a", "b"], "rows": [[1]]})).unwrap_err();
    assert!(matches!(
        err,
        CliError::Table(TableError::RowWidth { row: 0, expected: 2, found: 1 })
    ));
}

// ============================================================================
// Table Specs
// ============================================================================

#[test]
fn test_table_spec_parsing() {
    let spec: TableSpec = "people=data/people.json".parse().unwrap();
    assert_eq!(spec.name, "people");
    assert_eq!(spec.path, PathBuf::from("data/people.json"));

    for bad in ["people", "=x.json", "people="] {
        assert!(
            matches!(bad.parse::<TableSpec>(), Err(CliError::InvalidTableSpec(_))),
            "accepted {}",
            bad
        );
    }
}

// ============================================================================
// Run / Check / Tree
// ============================================================================

#[test]
fn test_execute_run_formats() {
    let path = temp_table(
        "people",
        r#"{"columns": ["age", "name"], "rows": [[14, "bob"], [32, "tom"], [2, "cail"]]}"#,
    );
    let mut options = RunOptions {
        query: "select name, age from people where age > 10 order by age desc".to_string(),
        tables: vec![TableSpec {
            name: "people".to_string(),
            path: path.clone(),
        }],
        format: OutputFormat::Json,
    };

    assert_eq!(cli::execute_run(&options).unwrap(), r#"[["tom",32],["bob",14]]"#);

    options.format = OutputFormat::Text;
    assert_eq!(cli::execute_run(&options).unwrap(), "tom\t32\nbob\t14");

    options.format = OutputFormat::Pretty;
    assert!(cli::execute_run(&options).unwrap().starts_with("[\n  [\n    \"tom\""));

    fs::remove_file(path).unwrap();
}

#[test]
fn test_execute_run_missing_file() {
    let options = RunOptions {
        query: "select * from t".to_string(),
        tables: vec![TableSpec {
            name: "t".to_string(),
            path: PathBuf::from("/nonexistent/minisql/t.json"),
        }],
        format: OutputFormat::Json,
    };
    assert!(matches!(cli::execute_run(&options), Err(CliError::Io(_))));
}

#[test]
fn test_execute_run_unknown_table() {
    let options = RunOptions {
        query: "select * from t".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        cli::execute_run(&options),
        Err(CliError::Eval(EvalError::TableNotFound(name))) if name == "t"
    ));
}

#[test]
fn test_check_syntax() {
    assert!(cli::check_syntax("select a from t").is_ok());
    let err = cli::check_syntax("select from t").unwrap_err();
    assert!(matches!(err, CliError::Syntax(_)));
    assert!(err.to_string().starts_with("Syntax error at line 1, column 8"));
}

#[test]
fn test_render_tree() {
    assert_eq!(
        cli::render_tree("select name from t order by name desc").unwrap(),
        "select\n├ exprs\n│ └ name\n├ t\n└ order by\n  └ desc\n    └ name"
    );
}

// ============================================================================
// Demo
// ============================================================================

#[test]
fn test_demo_results() {
    let mut ctx = demo_context().unwrap();
    let results: Vec<String> = DEMO_CASES
        .iter()
        .map(|case| minisql::to_json(&cli::run_query(case.query, &mut ctx).unwrap()))
        .collect();

    assert_eq!(
        results,
        vec![
            r#"[[1,"a"]]"#,
            r#"[["alex"],["bob"],["sasha"]]"#,
            "[[18,5],[14,8],[2,8],[32,32],[14,32]]",
            r#"[["Robert",22]]"#,
        ]
    );
}

#[test]
fn test_run_demo_prints_each_case() {
    let out = cli::run_demo().unwrap();
    for case in DEMO_CASES {
        assert!(out.contains(case.query));
    }
    assert!(out.contains(r#"[["Robert",22]]"#));
}
