/// Lexical tokens produced by the [`Lexer`](crate::lexer::Lexer).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Numeric literal, kept as source text until the parser builds the node
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// ```
    Number(String),

    /// Single-quoted string literal with the quotes stripped.
    ///
    /// No escape processing: the body between the quotes is taken verbatim.
    ///
    /// # Examples
    /// ```text
    /// 'Robert'
    /// 'R%'
    /// ```
    String(String),

    /// Column, table, alias or function name
    ///
    /// Must start with a letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// col1
    /// first_name
    /// sum
    /// ```
    Identifier(String),

    // Keywords (matched case-insensitively)
    Select,
    From,
    Where,
    Group,
    Having,
    Order,
    By,
    As,
    Asc,
    Desc,

    /// Logical AND (word, not symbol)
    And,

    /// Logical OR (word, not symbol)
    Or,

    /// Pattern match (`LIKE`)
    Like,

    // Comparison
    /// Equality (`=`)
    Eq,

    /// Inequality (`<>`)
    NotEq,

    /// Less than
    Lt,

    /// Greater than
    Gt,

    /// Less than or equal
    LtEq,

    /// Greater than or equal
    GtEq,

    // Arithmetic
    Plus,
    Minus,

    /// Multiplication, or the `*` wildcard column in operand position
    Star,

    Slash,

    // Delimiters
    LParen,
    RParen,
    Comma,

    /// End of input
    Eof,
}

impl Token {
    /// Keyword lookup for a bare word, ignoring case.
    pub fn keyword(word: &str) -> Option<Token> {
        let token = match word.to_ascii_lowercase().as_str() {
            "select" => Token::Select,
            "from" => Token::From,
            "where" => Token::Where,
            "group" => Token::Group,
            "having" => Token::Having,
            "order" => Token::Order,
            "by" => Token::By,
            "as" => Token::As,
            "asc" => Token::Asc,
            "desc" => Token::Desc,
            "and" => Token::And,
            "or" => Token::Or,
            "like" => Token::Like,
            _ => return None,
        };
        Some(token)
    }

    /// Short human-readable form used in syntax error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::String(s) => format!("string '{}'", s),
            Token::Identifier(name) => format!("identifier `{}`", name),
            Token::Select => "SELECT".to_string(),
            Token::From => "FROM".to_string(),
            Token::Where => "WHERE".to_string(),
            Token::Group => "GROUP".to_string(),
            Token::Having => "HAVING".to_string(),
            Token::Order => "ORDER".to_string(),
            Token::By => "BY".to_string(),
            Token::As => "AS".to_string(),
            Token::Asc => "ASC".to_string(),
            Token::Desc => "DESC".to_string(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::Like => "LIKE".to_string(),
            Token::Eq => "'='".to_string(),
            Token::NotEq => "'<>'".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::LtEq => "'<='".to_string(),
            Token::GtEq => "'>='".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}
