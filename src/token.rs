//! Token type and the closed set of token kinds.
//!
//! The [`Tokenizer`](crate::Tokenizer) produces a stream of [`Token`]s, each
//! carrying its start position (1-based line and column) and the raw or
//! already-decoded text it stands for. [`TokenKind`] covers the full lexical
//! grammar: every Lua reserved word, every operator spelling the format can
//! contain, and the value/structure classes the parser dispatches on.

use std::fmt;

/// The closed enumeration of token kinds.
///
/// Keywords carry their spelling in [`Token::text`]; so do operators. For
/// `Number` the text is the raw source spelling (sign, digits, dot,
/// exponent), for `String` it is the decoded content with escapes already
/// applied, for `Comment` the comment body, and for `Error` a description of
/// the offending input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords.
    Nil,
    True,
    False,
    And,
    Break,
    Do,
    Else,
    Elseif,
    End,
    For,
    Function,
    Goto,
    If,
    In,
    Local,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    Until,
    While,

    // Operators and punctuation.
    Ellipsis,
    Concat,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    NotEqual,
    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Equal,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    Less,
    Greater,

    // Value and structure classes.
    Number,
    String,
    Name,
    Comment,
    EndOfLine,
    EndOfStream,
    Error,
}

impl TokenKind {
    /// The fixed source spelling for keywords and operators, or a class name
    /// (`NAME`, `NUMBER`, ...) for the rest. Used in diagnostics.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            TokenKind::Nil => "'nil'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::And => "'and'",
            TokenKind::Break => "'break'",
            TokenKind::Do => "'do'",
            TokenKind::Else => "'else'",
            TokenKind::Elseif => "'elseif'",
            TokenKind::End => "'end'",
            TokenKind::For => "'for'",
            TokenKind::Function => "'function'",
            TokenKind::Goto => "'goto'",
            TokenKind::If => "'if'",
            TokenKind::In => "'in'",
            TokenKind::Local => "'local'",
            TokenKind::Not => "'not'",
            TokenKind::Or => "'or'",
            TokenKind::Repeat => "'repeat'",
            TokenKind::Return => "'return'",
            TokenKind::Then => "'then'",
            TokenKind::Until => "'until'",
            TokenKind::While => "'while'",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Concat => "'..'",
            TokenKind::LessEqual => "'<='",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::EqualEqual => "'=='",
            TokenKind::NotEqual => "'~='",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::Equal => "'='",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::Percent => "'%'",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Name => "NAME",
            TokenKind::Comment => "COMMENT",
            TokenKind::EndOfLine => "END_OF_LINE",
            TokenKind::EndOfStream => "END_OF_STREAM",
            TokenKind::Error => "ERROR",
        }
    }

    /// Returns `true` for tokens that are valid Lua but outside the literal
    /// data subset: operators, calls, and the non-literal keywords. The
    /// parser reports these as unsupported rather than unexpected.
    #[must_use]
    pub const fn is_out_of_subset(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Break
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::Elseif
                | TokenKind::End
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::Goto
                | TokenKind::If
                | TokenKind::In
                | TokenKind::Local
                | TokenKind::Not
                | TokenKind::Or
                | TokenKind::Repeat
                | TokenKind::Return
                | TokenKind::Then
                | TokenKind::Until
                | TokenKind::While
                | TokenKind::Ellipsis
                | TokenKind::Concat
                | TokenKind::LessEqual
                | TokenKind::GreaterEqual
                | TokenKind::EqualEqual
                | TokenKind::NotEqual
                | TokenKind::OpenParen
                | TokenKind::CloseParen
                | TokenKind::Colon
                | TokenKind::Dot
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Caret
                | TokenKind::Percent
                | TokenKind::Less
                | TokenKind::Greater
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Looks up an identifier in the fixed keyword table.
#[must_use]
pub fn keyword(name: &str) -> Option<TokenKind> {
    let kind = match name {
        "nil" => TokenKind::Nil,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "and" => TokenKind::And,
        "break" => TokenKind::Break,
        "do" => TokenKind::Do,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::Elseif,
        "end" => TokenKind::End,
        "for" => TokenKind::For,
        "function" => TokenKind::Function,
        "goto" => TokenKind::Goto,
        "if" => TokenKind::If,
        "in" => TokenKind::In,
        "local" => TokenKind::Local,
        "not" => TokenKind::Not,
        "or" => TokenKind::Or,
        "repeat" => TokenKind::Repeat,
        "return" => TokenKind::Return,
        "then" => TokenKind::Then,
        "until" => TokenKind::Until,
        "while" => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}

/// Operator spellings in match order. Longer spellings come before their
/// prefixes so the lexer's first match is the longest match.
pub(crate) const OPERATORS: &[(&str, TokenKind)] = &[
    ("...", TokenKind::Ellipsis),
    ("..", TokenKind::Concat),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("==", TokenKind::EqualEqual),
    ("~=", TokenKind::NotEqual),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
    ("=", TokenKind::Equal),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
    (".", TokenKind::Dot),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("^", TokenKind::Caret),
    ("%", TokenKind::Percent),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
];

/// One lexed token with its start position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// 1-based physical line of the token's first character.
    pub line: usize,
    /// 1-based character column of the token's first character.
    pub column: usize,
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub(crate) fn new(line: usize, column: usize, kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            line,
            column,
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(line={}, column={}, kind={}, text='{}')",
            self.line, self.column, self.kind, self.text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert_eq!(keyword("nil"), Some(TokenKind::Nil));
        assert_eq!(keyword("elseif"), Some(TokenKind::Elseif));
        assert_eq!(keyword("goto"), Some(TokenKind::Goto));
        assert_eq!(keyword("Nil"), None);
        assert_eq!(keyword("nils"), None);
    }

    #[test]
    fn operators_are_longest_first() {
        for (i, (spelling, _)) in OPERATORS.iter().enumerate() {
            for (later, _) in &OPERATORS[i + 1..] {
                assert!(
                    !later.starts_with(spelling) || later.len() <= spelling.len(),
                    "{later:?} is shadowed by earlier {spelling:?}"
                );
            }
        }
    }

    #[test]
    fn token_display() {
        let token = Token::new(10, 22, TokenKind::Number, "-23.543e-4");
        assert_eq!(
            token.to_string(),
            "Token(line=10, column=22, kind=NUMBER, text='-23.543e-4')"
        );
    }
}
