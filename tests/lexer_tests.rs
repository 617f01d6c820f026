// tests/lexer_tests.rs

use minisql::ast::Token;
use minisql::lexer::{Lexer, Position};

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

// ============================================================================
// Operators and Punctuation
// ============================================================================

#[test]
fn test_operator_tokens() {
    let test_cases = vec![
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("*", Token::Star),
        ("/", Token::Slash),
        ("=", Token::Eq),
        ("<>", Token::NotEq),
        ("<", Token::Lt),
        (">", Token::Gt),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("(", Token::LParen),
        (")", Token::RParen),
        (",", Token::Comma),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_adjacent_comparisons() {
    assert_eq!(
        tokens("a<=b<>c"),
        vec![
            Token::Identifier("a".into()),
            Token::LtEq,
            Token::Identifier("b".into()),
            Token::NotEq,
            Token::Identifier("c".into()),
            Token::Eof,
        ]
    );
}

// ============================================================================
// Keywords
// ============================================================================

#[test]
fn test_keywords_any_case() {
    let test_cases = vec![
        ("select", Token::Select),
        ("SELECT", Token::Select),
        ("From", Token::From),
        ("wHeRe", Token::Where),
        ("group", Token::Group),
        ("HAVING", Token::Having),
        ("order", Token::Order),
        ("BY", Token::By),
        ("as", Token::As),
        ("ASC", Token::Asc),
        ("desc", Token::Desc),
        ("and", Token::And),
        ("Or", Token::Or),
        ("LIKE", Token::Like),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), vec![expected, Token::Eof], "Failed for input: {}", input);
    }
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(
        tokens("selected orders"),
        vec![
            Token::Identifier("selected".into()),
            Token::Identifier("orders".into()),
            Token::Eof,
        ]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("42 3.14 0.5"),
        vec![
            Token::Number("42".into()),
            Token::Number("3.14".into()),
            Token::Number("0.5".into()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_trailing_dot_is_not_part_of_number() {
    let mut lexer = Lexer::new("7.");
    assert_eq!(lexer.next_token().unwrap(), Token::Number("7".into()));
    assert!(lexer.next_token().is_err());
}

#[test]
fn test_string_literal_verbatim() {
    assert_eq!(
        tokens("'R%' 'it''s'"),
        vec![
            Token::String("R%".into()),
            Token::String("it".into()),
            Token::String("s".into()),
            Token::Eof,
        ]
    );
    assert_eq!(tokens(r"'a\n'"), vec![Token::String(r"a\n".into()), Token::Eof]);
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::new("select 'abc").tokenize().unwrap_err();
    assert!(err.message.contains("Unterminated string"));
    assert_eq!(err.position.column, 8);
}

// ============================================================================
// Comments and Whitespace
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    let source = "select /* all\ncolumns */ * // trailing\nfrom t";
    assert_eq!(
        tokens(source),
        vec![
            Token::Select,
            Token::Star,
            Token::From,
            Token::Identifier("t".into()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_unterminated_block_comment() {
    let err = Lexer::new("select /* oops").tokenize().unwrap_err();
    assert!(err.message.contains("block comment"));
    assert_eq!(err.position, Position { offset: 7, line: 1, column: 8 });
}

#[test]
fn test_unexpected_character() {
    let err = Lexer::new("select ; from t").tokenize().unwrap_err();
    assert!(err.message.contains("';'"));
    assert_eq!(err.position.offset, 7);
}
