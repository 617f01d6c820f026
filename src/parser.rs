use std::{mem, str::FromStr};

use rust_decimal::Decimal;

use crate::{
    ast::{BinOp, Node, Select, Token},
    lexer::{Lexer, Position, SyntaxError},
};

/// Parses a complete `SELECT` statement into its [`Node::Select`] root.
///
/// # Examples
///
/// ```
/// use minisql::{parse, Node};
///
/// let root = parse("select * from table_1 where col1 < 3").unwrap();
/// assert!(matches!(root, Node::Select(_)));
/// ```
pub fn parse(query: &str) -> Result<Node, SyntaxError> {
    let mut parser = Parser::new(Lexer::new(query))?;
    parser.parse_select()
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_position: Position,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, SyntaxError> {
        let current_token = lexer.next_token()?;
        let current_position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_position,
        })
    }

    fn advance(&mut self) -> Result<(), SyntaxError> {
        self.current_token = self.lexer.next_token()?;
        self.current_position = self.lexer.token_start();
        Ok(())
    }

    fn error(&self, expected: &str) -> SyntaxError {
        SyntaxError::new(
            format!("Expected {}, got {}", expected, self.current_token.describe()),
            self.current_position,
        )
    }

    fn expect(&mut self, expected: Token) -> Result<(), SyntaxError> {
        if self.current_token != expected {
            return Err(self.error(&expected.describe()));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        &self.current_token == token
    }

    /// Consumes the current token if it matches.
    fn accept(&mut self, token: &Token) -> Result<bool, SyntaxError> {
        if self.check(token) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, SyntaxError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => {
                self.current_token = other;
                Err(self.error(what))
            }
        }
    }

    fn build_number(&self, text: &str) -> Result<Node, SyntaxError> {
        Decimal::from_str(text).map(Node::Num).map_err(|e| {
            SyntaxError::new(
                format!("Invalid number '{}': {}", text, e),
                self.current_position,
            )
        })
    }

    /// Parse primary expressions (atoms): numbers, strings, columns, `*`,
    /// calls and parenthesised expressions
    fn parse_primary(&mut self) -> Result<Node, SyntaxError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Number(text) => {
                let node = self.build_number(&text)?;
                self.advance()?;
                Ok(node)
            }
            Token::String(s) => {
                self.advance()?;
                Ok(Node::Str(s))
            }
            Token::Star => {
                self.advance()?;
                Ok(Node::Ident("*".to_string()))
            }
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    self.advance()?;
                    let args = if self.check(&Token::RParen) {
                        Vec::new()
                    } else {
                        self.parse_expression_list()?
                    };
                    self.expect(Token::RParen)?;
                    Ok(Node::call(name, args))
                } else {
                    Ok(Node::Ident(name))
                }
            }
            Token::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            token => {
                self.current_token = token;
                Err(self.error("expression"))
            }
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_primary()?;

        loop {
            let op = match &self.current_token {
                Token::Star => BinOp::Multiply,
                Token::Slash => BinOp::Divide,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_primary()?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match &self.current_token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Subtract,
                _ => break,
            };

            self.advance()?;
            let right = self.parse_multiplicative()?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match &self.current_token {
                Token::Eq => BinOp::Equal,
                Token::NotEq => BinOp::NotEqual,
                Token::Lt => BinOp::LessThan,
                Token::Gt => BinOp::GreaterThan,
                Token::LtEq => BinOp::LessEqual,
                Token::GtEq => BinOp::GreaterEqual,
                Token::Like => BinOp::Like,
                _ => break,
            };

            self.advance()?;
            let right = if op == BinOp::Like {
                // The pattern must be a literal, never a computed value.
                match mem::replace(&mut self.current_token, Token::Eof) {
                    Token::String(pattern) => {
                        self.advance()?;
                        Node::Str(pattern)
                    }
                    other => {
                        self.current_token = other;
                        return Err(self.error("string literal pattern after LIKE"));
                    }
                }
            } else {
                self.parse_additive()?
            };
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_comparison()?;

        while self.accept(&Token::And)? {
            let right = self.parse_comparison()?;
            left = Node::binary(BinOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Node, SyntaxError> {
        let mut left = self.parse_and()?;

        while self.accept(&Token::Or)? {
            let right = self.parse_and()?;
            left = Node::binary(BinOp::Or, left, right);
        }
        Ok(left)
    }

    pub fn parse_expression(&mut self) -> Result<Node, SyntaxError> {
        self.parse_or()
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut exprs = vec![self.parse_expression()?];
        while self.accept(&Token::Comma)? {
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    /// Parse a standalone expression; the whole input must be consumed.
    pub fn parse(&mut self) -> Result<Node, SyntaxError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }
}

impl Parser {
    /// Parse a complete `SELECT` statement
    pub fn parse_select(&mut self) -> Result<Node, SyntaxError> {
        self.expect(Token::Select)?;
        let projection = Node::ExprList(self.parse_projection_list()?);

        self.expect(Token::From)?;
        let table = Node::Ident(self.expect_identifier("table name")?);

        let filter = if self.accept(&Token::Where)? {
            Some(Node::Where(vec![self.parse_expression()?]))
        } else {
            None
        };

        let group_by = if self.accept(&Token::Group)? {
            self.expect(Token::By)?;
            Some(Node::Group(self.parse_expression_list()?))
        } else {
            None
        };

        let having = if self.accept(&Token::Having)? {
            Some(Node::Having(vec![self.parse_expression()?]))
        } else {
            None
        };

        let order_by = if self.accept(&Token::Order)? {
            self.expect(Token::By)?;
            Some(self.parse_order_list()?)
        } else {
            None
        };

        self.expect(Token::Eof)?;

        Ok(Node::select(Select {
            projection,
            table,
            filter,
            group_by,
            having,
            order_by,
        }))
    }

    fn parse_projection_list(&mut self) -> Result<Vec<Node>, SyntaxError> {
        let mut projections = vec![self.parse_projection()?];
        while self.accept(&Token::Comma)? {
            projections.push(self.parse_projection()?);
        }
        Ok(projections)
    }

    /// `expr [[AS] alias]`
    fn parse_projection(&mut self) -> Result<Node, SyntaxError> {
        let expr = self.parse_expression()?;

        if self.accept(&Token::As)? {
            let alias = self.expect_identifier("alias after AS")?;
            return Ok(Node::alias(expr, alias));
        }

        if matches!(self.current_token, Token::Identifier(_)) {
            let alias = self.expect_identifier("alias")?;
            return Ok(Node::alias(expr, alias));
        }

        Ok(expr)
    }

    fn parse_order_list(&mut self) -> Result<Node, SyntaxError> {
        let mut items = vec![self.parse_order_item()?];
        while self.accept(&Token::Comma)? {
            items.push(self.parse_order_item()?);
        }
        Ok(Node::Order(items))
    }

    /// `expr [ASC | DESC]`
    fn parse_order_item(&mut self) -> Result<Node, SyntaxError> {
        let expr = self.parse_expression()?;
        let desc = if self.accept(&Token::Desc)? {
            true
        } else {
            self.accept(&Token::Asc)?;
            false
        };
        Ok(Node::order_expr(expr, desc))
    }
}
