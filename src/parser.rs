//! The recursive-descent parser.
//!
//! [`Parser`] consumes a token stream and produces one root [`LuaTable`]
//! holding every top-level assignment. Only the literal data subset is
//! accepted:
//!
//! ```text
//! program    := { line } EOS
//! line       := EOL | COMMENT | statement
//! statement  := namelist ['=' exprlist]
//! namelist   := NAME {',' NAME}
//! exprlist   := expr {',' expr}
//! expr       := NIL | TRUE | FALSE | NUMBER | STRING | table
//! table      := '{' fields '}'
//! fields     := field {(',' | ';') field}
//! field      := '[' expr ']' '=' expr | expr
//! ```
//!
//! An unassigned `namelist` binds each name to `nil`. Anything outside the
//! subset fails fast with a positioned error: there is no recovery and no
//! partial result. Lookahead is exactly one token; the parser holds the
//! current token and pulls the next on demand.
//!
//! ```rust
//! use luadata::{parse_text, LuaValue};
//!
//! let root = parse_text("enabled = true\ncount = 3\n").unwrap();
//! let key = LuaValue::Identifier("count".into());
//! assert_eq!(root.get(&key), Some(&LuaValue::from(3)));
//! ```

use crate::error::{Error, Result};
use crate::table::LuaTable;
use crate::token::{Token, TokenKind};
use crate::value::LuaValue;
use num_bigint::BigInt;

/// One table-constructor field, before duplicate-key resolution.
enum Field {
    Positional(LuaValue),
    Keyed(LuaValue, LuaValue),
}

/// The parser. Drives a token source one token at a time; construct one per
/// parse via [`Parser::new`] and run it with [`Parser::parse`].
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: I,
    current: Option<Token>,
    last: (usize, usize),
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Parser {
            tokens,
            current: None,
            last: (1, 1),
        }
    }

    /// Parses the whole stream into the root table.
    pub fn parse(mut self) -> Result<LuaTable> {
        let mut root = LuaTable::new();
        loop {
            match self.peek()?.kind {
                TokenKind::EndOfStream => break,
                TokenKind::EndOfLine | TokenKind::Comment => self.bump(),
                _ => self.statement(&mut root)?,
            }
        }
        Ok(root)
    }

    /// Current token, pulling one from the source if needed. A lexer error
    /// token is never returned; it becomes the lexical error layer here.
    fn peek(&mut self) -> Result<&Token> {
        let tokens = &mut self.tokens;
        let last = &mut self.last;
        let token = self.current.get_or_insert_with(|| match tokens.next() {
            Some(token) => {
                *last = (token.line, token.column);
                token
            }
            // a well-formed stream ends with END_OF_STREAM; treat a dry
            // source as if it had
            None => Token::new(last.0, last.1, TokenKind::EndOfStream, ""),
        });
        if token.kind == TokenKind::Error {
            Err(Error::lexical(token))
        } else {
            Ok(token)
        }
    }

    fn bump(&mut self) {
        self.current = None;
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        let token = self.peek()?;
        if token.kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(Error::unexpected(token, &[kind]))
        }
    }

    fn statement(&mut self, root: &mut LuaTable) -> Result<()> {
        let names = self.namelist()?;
        if self.peek()?.kind == TokenKind::Equal {
            self.bump();
            let values = self.exprlist()?;
            if names.len() != values.len() {
                let token = self.peek()?.clone();
                return Err(Error::count_mismatch(&token, names.len(), values.len()));
            }
            for (name, value) in names.into_iter().zip(values) {
                root.set(name, value);
            }
        } else if names.is_empty() {
            let token = self.peek()?;
            return Err(Error::unexpected(token, &[]));
        } else {
            for name in names {
                root.set(name, LuaValue::Nil);
            }
        }
        Ok(())
    }

    /// `NAME {',' NAME}`. A comma at end of line continues the list on the
    /// next line; a name at end of line ends the statement.
    fn namelist(&mut self) -> Result<Vec<LuaValue>> {
        let mut names = Vec::new();
        let mut got_name = false;
        loop {
            let token = self.peek()?;
            match token.kind {
                TokenKind::Name => {
                    if got_name {
                        return Err(Error::unexpected(
                            token,
                            &[TokenKind::Comma, TokenKind::Equal],
                        ));
                    }
                    names.push(LuaValue::Identifier(token.text.clone()));
                    self.bump();
                    got_name = true;
                }
                TokenKind::Comma => {
                    if !got_name {
                        return Err(Error::name_missing(token));
                    }
                    self.bump();
                    got_name = false;
                }
                TokenKind::EndOfLine => {
                    if got_name || names.is_empty() {
                        break;
                    }
                    self.bump();
                }
                TokenKind::Equal | TokenKind::Semicolon | TokenKind::EndOfStream => break,
                _ => return Err(Error::unexpected(token, &[])),
            }
        }
        Ok(names)
    }

    /// `expr {',' expr}` on a single line, no trailing comma.
    fn exprlist(&mut self) -> Result<Vec<LuaValue>> {
        let mut exprs = Vec::new();
        let mut wait_for_expr = true;
        loop {
            let token = self.peek()?;
            match token.kind {
                TokenKind::Comma => {
                    if wait_for_expr {
                        return Err(Error::expression_missing(token));
                    }
                    self.bump();
                    wait_for_expr = true;
                }
                TokenKind::EndOfLine
                | TokenKind::CloseBrace
                | TokenKind::CloseParen
                | TokenKind::Semicolon
                | TokenKind::EndOfStream => {
                    if wait_for_expr {
                        return Err(Error::expression_missing(token));
                    }
                    break;
                }
                _ => {
                    if !wait_for_expr {
                        return Err(if token.kind.is_out_of_subset() {
                            Error::unsupported(token)
                        } else {
                            Error::unexpected(token, &[])
                        });
                    }
                    exprs.push(self.expression()?);
                    wait_for_expr = false;
                }
            }
        }
        Ok(exprs)
    }

    fn expression(&mut self) -> Result<LuaValue> {
        let token = self.peek()?.clone();
        match token.kind {
            TokenKind::Nil => {
                self.bump();
                Ok(LuaValue::Nil)
            }
            TokenKind::True => {
                self.bump();
                Ok(LuaValue::Boolean(true))
            }
            TokenKind::False => {
                self.bump();
                Ok(LuaValue::Boolean(false))
            }
            TokenKind::Number => {
                let value = number_value(&token)?;
                self.bump();
                Ok(value)
            }
            TokenKind::String => {
                self.bump();
                Ok(LuaValue::String(token.text))
            }
            // a bare name here is a variable reference
            TokenKind::Name => Err(Error::unsupported(&token)),
            TokenKind::OpenBrace => self.table(),
            kind if kind.is_out_of_subset() => Err(Error::unsupported(&token)),
            _ => Err(Error::unexpected(&token, &[])),
        }
    }

    fn table(&mut self) -> Result<LuaValue> {
        self.expect(TokenKind::OpenBrace)?;
        let fields = self.fields()?;
        self.expect(TokenKind::CloseBrace)?;
        let mut table = LuaTable::new();
        for field in fields {
            match field {
                Field::Positional(value) => {
                    table.append(value);
                }
                Field::Keyed(key, value) => {
                    table.set(key, value);
                }
            }
        }
        Ok(LuaValue::Table(table))
    }

    /// Fields separated by `,` or `;`, with line endings and comments
    /// allowed between them.
    fn fields(&mut self) -> Result<Vec<Field>> {
        let mut fields = Vec::new();
        loop {
            match self.peek()?.kind {
                TokenKind::EndOfLine | TokenKind::Comment => self.bump(),
                TokenKind::CloseBrace | TokenKind::CloseParen | TokenKind::EndOfStream => break,
                _ => {
                    fields.push(self.field()?);
                    match self.peek()?.kind {
                        TokenKind::Comma | TokenKind::Semicolon => self.bump(),
                        _ => break,
                    }
                }
            }
        }
        Ok(fields)
    }

    fn field(&mut self) -> Result<Field> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::OpenBracket => {
                self.bump();
                let key_token = self.peek()?.clone();
                if key_token.kind == TokenKind::Nil {
                    return Err(Error::unsupported(&key_token));
                }
                let key = self.expression()?;
                self.expect(TokenKind::CloseBracket)?;
                self.expect(TokenKind::Equal)?;
                let value = self.expression()?;
                Ok(Field::Keyed(key, value))
            }
            // the `name = expr` shorthand needs name resolution; out of subset
            TokenKind::Name => Err(Error::unsupported(token)),
            _ => Ok(Field::Positional(self.expression()?)),
        }
    }
}

fn number_value(token: &Token) -> Result<LuaValue> {
    let text = &token.text;
    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>()
            .map(LuaValue::Numeric)
            .map_err(|_| malformed_number(token))
    } else {
        text.parse::<BigInt>()
            .map(LuaValue::Integer)
            .map_err(|_| malformed_number(token))
    }
}

fn malformed_number(token: &Token) -> Error {
    Error::Lexical {
        line: token.line,
        column: token.column,
        message: format!("malformed number: {}", token.text),
    }
}
