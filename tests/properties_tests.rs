// tests/properties_tests.rs
//
// Behavioural properties checked over generated tables.

use minisql::{Context, Interpreter, Row, Table, Value, parse};

/// Small deterministic generator so every run sees the same tables.
struct Lcg(u64);

impl Lcg {
    fn below(&mut self, bound: i64) -> i64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % bound as u64) as i64
    }
}

const NAMES: [&str; 6] = ["ann", "bob", "cid", "dee", "eve", "fay"];

fn generated(seed: u64, len: usize) -> Table {
    let mut rng = Lcg(seed);
    let rows = (0..len)
        .map(|_| {
            vec![
                Value::Integer(rng.below(10)),
                Value::Integer(rng.below(4)),
                Value::from(NAMES[rng.below(NAMES.len() as i64) as usize]),
            ]
        })
        .collect();
    Table::new(vec!["a", "b", "name"], rows).unwrap()
}

fn run(query: &str, table: &Table) -> Vec<Row> {
    let mut ctx = Context::new();
    ctx.register("t", table.clone());
    Interpreter::new()
        .execute(&parse(query).unwrap(), &mut ctx)
        .unwrap()
}

#[test]
fn test_no_where_projects_every_row() {
    for seed in 0..20 {
        let table = generated(seed, 12);
        assert_eq!(run("select * from t", &table), table.rows().to_vec());
    }
}

#[test]
fn test_where_is_a_pure_filter() {
    for seed in 0..20 {
        let table = generated(seed, 15);
        let result = run("select * from t where a > 4 and b <> 1", &table);

        let expected: Vec<Row> = table
            .rows()
            .iter()
            .filter(|row| {
                matches!((&row[0], &row[1]), (Value::Integer(a), Value::Integer(b)) if *a > 4 && *b != 1)
            })
            .cloned()
            .collect();

        assert!(result.len() <= table.len());
        assert_eq!(result, expected, "seed {}", seed);
    }
}

#[test]
fn test_order_by_mixed_directions_is_sorted() {
    for seed in 0..20 {
        let table = generated(seed, 20);
        let result = run("select a, name from t order by a asc, name desc", &table);
        assert_eq!(result.len(), table.len());

        for pair in result.windows(2) {
            let (a1, a2) = (&pair[0][0], &pair[1][0]);
            assert!(a1.sort_cmp(a2).is_le(), "seed {}: {:?}", seed, pair);
            if a1 == a2 {
                assert!(pair[0][1].sort_cmp(&pair[1][1]).is_ge(), "seed {}: {:?}", seed, pair);
            }
        }
    }
}

#[test]
fn test_group_by_partitions_rows() {
    for seed in 0..20 {
        let table = generated(seed, 16);
        let result = run("select b, name, a from t where a >= 2 group by b, name", &table);

        // Every filtered row appears exactly once.
        let mut expected: Vec<Row> = table
            .rows()
            .iter()
            .filter(|row| matches!(row[0], Value::Integer(a) if a >= 2))
            .map(|row| vec![row[1].clone(), row[2].clone(), row[0].clone()])
            .collect();
        let mut actual = result.clone();
        expected.sort_by(|x, y| Value::Array(x.clone()).sort_cmp(&Value::Array(y.clone())));
        actual.sort_by(|x, y| Value::Array(x.clone()).sort_cmp(&Value::Array(y.clone())));
        assert_eq!(actual, expected, "seed {}", seed);

        // Rows sharing a key are contiguous, and keys appear in first-seen order.
        let mut seen: Vec<(Value, Value)> = Vec::new();
        for row in &result {
            let key = (row[0].clone(), row[1].clone());
            match seen.iter().position(|k| *k == key) {
                Some(i) => assert_eq!(i, seen.len() - 1, "seed {}: split group {:?}", seed, key),
                None => seen.push(key),
            }
        }
    }
}

#[test]
fn test_sum_properties() {
    let mut ctx = Context::new();
    ctx.register(
        "nums",
        Table::new(
            vec!["n"],
            vec![
                vec![Value::Integer(1)],
                vec![Value::Null],
                vec![Value::Integer(2)],
                vec![Value::Integer(3)],
            ],
        )
        .unwrap(),
    );
    let mut interpreter = Interpreter::new();

    let total = interpreter
        .execute(&parse("select sum(n) from nums").unwrap(), &mut ctx)
        .unwrap();
    assert_eq!(total, vec![vec![Value::Integer(6)]]);

    let empty = interpreter
        .execute(&parse("select sum(n) from nums where n > 10").unwrap(), &mut ctx)
        .unwrap();
    assert_eq!(empty, vec![vec![Value::Integer(0)]]);
}

#[test]
fn test_like_examples() {
    let table = Table::new(
        vec!["name"],
        vec![
            vec![Value::from("Robert")],
            vec![Value::from("Betty")],
            vec![Value::from("John")],
        ],
    )
    .unwrap();

    assert_eq!(
        run("select name from t where name like 'R%'", &table),
        vec![vec![Value::from("Robert")]]
    );
    assert_eq!(
        run("select name from t where name like 'J_hn'", &table),
        vec![vec![Value::from("John")]]
    );
}

#[test]
fn test_parse_is_deterministic() {
    let queries = [
        "select * from table_1 where col1 < 3",
        "select name from table_2 where age >= 10 order by name asc",
        "select apple, banana from table_3 group by banana",
        "select first_name, age from table_4 where first_name like 'R%'",
        "select a + b * c as x, sum(d) from t where a = 1 or b <> 2 and c like '_%' order by x desc",
    ];

    for query in queries {
        let first = parse(query).unwrap();
        let second = parse(query).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.tree(), second.tree());
    }
}
