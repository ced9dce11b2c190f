//! The pull-based tokenizer.
//!
//! [`Tokenizer`] turns a source of physical text lines into a stream of
//! [`Token`]s, one per pull. It recognizes the full lexical grammar of the
//! format: quoted strings with backslash escapes, multi-line long-bracket
//! strings and comments (`[==[ ... ]==]`), signed decimal numbers, keywords,
//! and the fixed operator table.
//!
//! Lines must include their terminators (the last line may omit it); both
//! [`Tokenizer::from_text`] and the reader entry points in the crate root
//! take care of that. The stream always ends with exactly one
//! [`TokenKind::EndOfStream`]. A lexical failure produces a single
//! [`TokenKind::Error`] token and halts the stream: the next pull yields the
//! end marker and nothing follows it.
//!
//! ```rust
//! use luadata::{tokenize_text, TokenKind};
//!
//! let kinds: Vec<TokenKind> = tokenize_text("zones = 42\n").map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         TokenKind::Name,
//!         TokenKind::Equal,
//!         TokenKind::Number,
//!         TokenKind::EndOfLine,
//!         TokenKind::EndOfStream,
//!     ]
//! );
//! ```

use crate::token::{keyword, Token, TokenKind, OPERATORS};

/// Line-ending spellings, longest first. A lone `\r` is accepted last so
/// CR-only sources still produce one end-of-line per physical line.
const EOLS: &[&str] = &["\n\r", "\r\n", "\n", "\r"];

fn eol_len(text: &str) -> usize {
    EOLS.iter()
        .find(|eol| text.starts_with(**eol))
        .map_or(0, |eol| eol.len())
}

fn trailing_eol_len(text: &str) -> usize {
    EOLS.iter()
        .find(|eol| text.ends_with(**eol))
        .map_or(0, |eol| eol.len())
}

fn digit_run(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

/// Length of a long-bracket opener (`[`, zero or more `=`, `[`) at the start
/// of `text`, if present.
fn long_bracket_opener(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let eqs = bytes[1..].iter().take_while(|b| **b == b'=').count();
    if bytes.get(1 + eqs) == Some(&b'[') {
        Some(eqs + 2)
    } else {
        None
    }
}

fn unescape_char(c: char) -> Option<char> {
    Some(match c {
        'a' => '\u{0007}',
        'b' => '\u{0008}',
        'f' => '\u{000C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{000B}',
        '\'' => '\'',
        '"' => '"',
        '\\' => '\\',
        '[' => '[',
        ']' => ']',
        _ => return None,
    })
}

/// An open long-bracket region being accumulated across lines.
struct Block {
    closer: String,
    comment: bool,
    content: String,
    line: usize,
    column: usize,
}

/// The tokenizer. Construct one per parse; it is restartable per invocation
/// but not resumable mid-stream.
pub struct Tokenizer<L> {
    lines: L,
    line: String,
    pos: usize,
    line_no: usize,
    column: usize,
    block: Option<Block>,
    halted: bool,
    finished: bool,
}

impl Tokenizer<std::vec::IntoIter<String>> {
    /// Tokenizes a complete in-memory text, splitting it into physical lines.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text.split_inclusive('\n').map(String::from).collect();
        Tokenizer::new(lines.into_iter())
    }
}

impl<L: Iterator<Item = String>> Tokenizer<L> {
    /// Creates a tokenizer over a line source. Each yielded line is one
    /// physical line including its terminator; the final line may omit it.
    pub fn new(lines: L) -> Self {
        Tokenizer {
            lines,
            line: String::new(),
            pos: 0,
            line_no: 0,
            column: 1,
            block: None,
            halted: false,
            finished: false,
        }
    }

    fn rest(&self) -> &str {
        &self.line[self.pos..]
    }

    fn advance(&mut self, bytes: usize) {
        let consumed = &self.line[self.pos..self.pos + bytes];
        self.column += consumed.chars().count();
        self.pos += bytes;
    }

    fn make(&self, kind: TokenKind, text: impl Into<String>) -> Token {
        Token::new(self.line_no.max(1), self.column, kind, text)
    }

    fn open_block(&mut self, opener_len: usize, comment: bool, line: usize, column: usize) {
        let closer = format!("]{}]", "=".repeat(opener_len - 2));
        self.advance(opener_len);
        self.block = Some(Block {
            closer,
            comment,
            content: String::new(),
            line,
            column,
        });
    }

    /// Continues an open long-bracket block with the current line remainder.
    /// Returns the finished token once the closer is found.
    fn scan_block(&mut self, mut block: Block) -> Option<Token> {
        match self.rest().find(&block.closer) {
            Some(idx) => {
                block.content.push_str(&self.line[self.pos..self.pos + idx]);
                self.advance(idx + block.closer.len());
                // one line-ending directly after the opener is not content
                let skip = eol_len(&block.content);
                let content = block.content.split_off(skip);
                let kind = if block.comment {
                    TokenKind::Comment
                } else {
                    TokenKind::String
                };
                Some(Token::new(block.line, block.column, kind, content))
            }
            None => {
                block.content.push_str(self.rest());
                let len = self.rest().len();
                self.advance(len);
                self.block = Some(block);
                None
            }
        }
    }

    /// Matches a signed decimal number at the current position and returns
    /// its byte length. The match must reach the end of the line or a
    /// non-word character, and the whole text must parse as `f64`; otherwise
    /// the position is left for the following branches.
    fn match_number(&self) -> Option<usize> {
        let bytes = self.rest().as_bytes();
        let mut i = 0;
        if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let whole = digit_run(bytes, i);
        if whole > 0 {
            i += whole;
            if bytes.get(i) == Some(&b'.') {
                i += 1;
                i += digit_run(bytes, i);
            }
        } else if bytes.get(i) == Some(&b'.') {
            let frac = digit_run(bytes, i + 1);
            if frac == 0 {
                return None;
            }
            i += 1 + frac;
        } else {
            return None;
        }
        // exponent counts only when complete
        if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
                j += 1;
            }
            let exp = digit_run(bytes, j);
            if exp > 0 {
                i = j + exp;
            }
        }
        if let Some(&next) = bytes.get(i) {
            if next == b'_' || next.is_ascii_alphanumeric() {
                return None;
            }
        }
        self.rest()[..i].parse::<f64>().ok().map(|_| i)
    }

    fn scan_quoted(&mut self, quote: char) -> Token {
        let (line, column) = (self.line_no, self.column);
        self.advance(1);
        let mut value = String::new();
        loop {
            let rest = self.rest();
            if rest.is_empty() || eol_len(rest) > 0 {
                self.halted = true;
                return Token::new(
                    line,
                    column,
                    TokenKind::Error,
                    format!("unterminated string: missing closing {quote}"),
                );
            }
            let mut chars = rest.chars();
            match chars.next() {
                Some(c) if c == quote => {
                    self.advance(c.len_utf8());
                    return Token::new(line, column, TokenKind::String, value);
                }
                Some('\\') => match chars.next() {
                    Some(esc) => match unescape_char(esc) {
                        Some(decoded) => {
                            value.push(decoded);
                            self.advance(1 + esc.len_utf8());
                        }
                        None => {
                            self.halted = true;
                            return Token::new(
                                line,
                                column,
                                TokenKind::Error,
                                format!("bad escape: \\{esc}"),
                            );
                        }
                    },
                    None => {
                        self.halted = true;
                        return Token::new(
                            line,
                            column,
                            TokenKind::Error,
                            format!("unterminated string: missing closing {quote}"),
                        );
                    }
                },
                Some(c) => {
                    value.push(c);
                    self.advance(c.len_utf8());
                }
                None => {
                    self.halted = true;
                    return Token::new(
                        line,
                        column,
                        TokenKind::Error,
                        format!("unterminated string: missing closing {quote}"),
                    );
                }
            }
        }
    }

    /// Produces the next token. The ordered match attempts are: refill /
    /// open-block continuation, line ending, whitespace skip, comment,
    /// identifier or keyword, number, long-bracket string, operator
    /// (longest match), quoted string, error.
    fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        if self.halted {
            self.finished = true;
            return Some(self.make(TokenKind::EndOfStream, ""));
        }
        loop {
            if self.pos >= self.line.len() {
                match self.lines.next() {
                    Some(next) => {
                        self.line = next;
                        self.pos = 0;
                        self.line_no += 1;
                        self.column = 1;
                        continue;
                    }
                    None => {
                        if self.block.take().is_some() {
                            self.halted = true;
                            return Some(self.make(TokenKind::Error, "missing closing bracket"));
                        }
                        self.finished = true;
                        return Some(self.make(TokenKind::EndOfStream, ""));
                    }
                }
            }
            if let Some(block) = self.block.take() {
                match self.scan_block(block) {
                    Some(token) => return Some(token),
                    None => continue,
                }
            }
            let n = eol_len(self.rest());
            if n > 0 {
                let (line, column) = (self.line_no, self.column);
                self.advance(n);
                return Some(Token::new(line, column, TokenKind::EndOfLine, ""));
            }
            let ws = self.rest().len() - self.rest().trim_start_matches([' ', '\t']).len();
            if ws > 0 {
                self.advance(ws);
                continue;
            }
            let (line, column) = (self.line_no, self.column);
            if self.rest().starts_with("--") {
                self.advance(2);
                if let Some(opener) = long_bracket_opener(self.rest()) {
                    self.open_block(opener, true, line, column);
                    continue;
                }
                // the remainder of the physical line, terminator consumed
                let rest = self.rest();
                let body = rest[..rest.len() - trailing_eol_len(rest)].to_string();
                let len = rest.len();
                self.advance(len);
                return Some(Token::new(line, column, TokenKind::Comment, body));
            }
            let Some(c) = self.rest().chars().next() else {
                continue;
            };
            if c == '_' || c.is_ascii_alphabetic() {
                let len = self
                    .rest()
                    .find(|ch: char| !(ch == '_' || ch.is_ascii_alphanumeric()))
                    .unwrap_or(self.rest().len());
                let text = self.rest()[..len].to_string();
                self.advance(len);
                let kind = keyword(&text).unwrap_or(TokenKind::Name);
                return Some(Token::new(line, column, kind, text));
            }
            if let Some(len) = self.match_number() {
                let text = self.rest()[..len].to_string();
                self.advance(len);
                return Some(Token::new(line, column, TokenKind::Number, text));
            }
            if let Some(opener) = long_bracket_opener(self.rest()) {
                self.open_block(opener, false, line, column);
                continue;
            }
            if let Some((spelling, kind)) = OPERATORS
                .iter()
                .copied()
                .find(|&(spelling, _)| self.rest().starts_with(spelling))
            {
                self.advance(spelling.len());
                return Some(Token::new(line, column, kind, spelling));
            }
            if c == '"' || c == '\'' {
                return Some(self.scan_quoted(c));
            }
            let rest = self.rest();
            let offending = rest[..rest.len() - trailing_eol_len(rest)].to_string();
            let len = rest.len();
            self.advance(len);
            self.halted = true;
            return Some(Token::new(line, column, TokenKind::Error, offending));
        }
    }
}

impl<L: Iterator<Item = String>> Iterator for Tokenizer<L> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        Tokenizer::from_text(text).map(|t| t.kind).collect()
    }

    fn texts_no_eol(text: &str) -> Vec<String> {
        Tokenizer::from_text(text)
            .filter(|t| t.kind != TokenKind::EndOfLine && t.kind != TokenKind::EndOfStream)
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::EndOfStream]);
    }

    #[test]
    fn single_eol() {
        assert_eq!(
            kinds("\n"),
            vec![TokenKind::EndOfLine, TokenKind::EndOfStream]
        );
    }

    #[test]
    fn eols_with_spaces() {
        assert_eq!(
            kinds("\n \n  \n   "),
            vec![
                TokenKind::EndOfLine,
                TokenKind::EndOfLine,
                TokenKind::EndOfLine,
                TokenKind::EndOfStream,
            ]
        );
    }

    #[test]
    fn crlf_lines() {
        assert_eq!(
            kinds("a\r\nb\r\n"),
            vec![
                TokenKind::Name,
                TokenKind::EndOfLine,
                TokenKind::Name,
                TokenKind::EndOfLine,
                TokenKind::EndOfStream,
            ]
        );
    }

    #[test]
    fn line_comments() {
        assert_eq!(
            kinds("-- comment \n  -- another comment"),
            vec![
                TokenKind::Comment,
                TokenKind::Comment,
                TokenKind::EndOfStream,
            ]
        );
    }

    #[test]
    fn block_comment() {
        let tokens: Vec<Token> = Tokenizer::from_text("--[[ first line\n second line]]").collect();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, " first line\n second line");
        assert_eq!(tokens[1].kind, TokenKind::EndOfStream);
    }

    #[test]
    fn block_comment_closes_at_first_plain_closer() {
        let tokens: Vec<Token> =
            Tokenizer::from_text("--[[ --[==[ first line\n second line ]==] ]]").collect();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, " --[==[ first line\n second line ]==] ");
        assert_eq!(tokens[1].kind, TokenKind::EndOfStream);
    }

    #[test]
    fn keywords() {
        let text = "nil false true and or not do end while for in repeat until \
                    break goto if then else elseif function local return";
        let expected = vec![
            TokenKind::Nil,
            TokenKind::False,
            TokenKind::True,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::Do,
            TokenKind::End,
            TokenKind::While,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Repeat,
            TokenKind::Until,
            TokenKind::Break,
            TokenKind::Goto,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::Elseif,
            TokenKind::Function,
            TokenKind::Local,
            TokenKind::Return,
            TokenKind::EndOfStream,
        ];
        assert_eq!(kinds(text), expected);
    }

    #[test]
    fn simple_strings() {
        let text = "   'nil' 'hello!'\n        \"double quoted string\"\n";
        assert_eq!(texts_no_eol(text), vec!["nil", "hello!", "double quoted string"]);
    }

    #[test]
    fn escapes() {
        let text = r#""\a" "\b" "\f" "\n" "\r" "\t" "\v" "\'" "\"" "\\" "\[" "\]""#;
        assert_eq!(
            texts_no_eol(text),
            vec![
                "\u{0007}", "\u{0008}", "\u{000C}", "\n", "\r", "\t", "\u{000B}", "'", "\"",
                "\\", "[", "]",
            ]
        );
    }

    #[test]
    fn bad_escape_halts() {
        let tokens: Vec<Token> = Tokenizer::from_text(r#"x = "\q rest is lost""#).collect();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Name,
                TokenKind::Equal,
                TokenKind::Error,
                TokenKind::EndOfStream,
            ]
        );
        assert_eq!(tokens[2].text, "bad escape: \\q");
    }

    #[test]
    fn unterminated_quote_halts() {
        assert_eq!(
            kinds("s = \"no closer\nt = 1\n"),
            vec![
                TokenKind::Name,
                TokenKind::Equal,
                TokenKind::Error,
                TokenKind::EndOfStream,
            ]
        );
    }

    #[test]
    fn long_bracket_strings() {
        let text = "[[\nfirst\nmultiline\nstring\n]]\n[===[\nsecond\n[[multiline]]\nstring\n]===]\n";
        assert_eq!(
            texts_no_eol(text),
            vec!["first\nmultiline\nstring\n", "second\n[[multiline]]\nstring\n"]
        );
    }

    #[test]
    fn unterminated_long_bracket() {
        assert_eq!(
            kinds("[[unterminated"),
            vec![TokenKind::Error, TokenKind::EndOfStream]
        );
        let tokens: Vec<Token> = Tokenizer::from_text("[[unterminated").collect();
        assert_eq!(tokens[0].text, "missing closing bracket");
    }

    #[test]
    fn numbers() {
        let text = "0 +1 -23 4. .5 -6.789 10.11e12 -0.13e-14";
        let tokens: Vec<Token> = Tokenizer::from_text(text).collect();
        let numbers: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(
            numbers,
            vec!["0", "+1", "-23", "4.", ".5", "-6.789", "10.11e12", "-0.13e-14"]
        );
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Error));
    }

    #[test]
    fn number_needs_terminator() {
        // a number glued to a word character is not a number, and nothing
        // else can lex it either
        let tokens: Vec<Token> = Tokenizer::from_text("123abc").collect();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[1].kind, TokenKind::EndOfStream);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn operator_soup() {
        let text = "... .. ..... <= >= == ~= => =<[](){}=,;:.+-*/^%<>";
        let expected = vec![
            TokenKind::Ellipsis,
            TokenKind::Concat,
            TokenKind::Ellipsis,
            TokenKind::Concat,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::EqualEqual,
            TokenKind::NotEqual,
            TokenKind::Equal,
            TokenKind::Greater,
            TokenKind::Equal,
            TokenKind::Less,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenBrace,
            TokenKind::CloseBrace,
            TokenKind::Equal,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Dot,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Caret,
            TokenKind::Percent,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::EndOfStream,
        ];
        assert_eq!(kinds(text), expected);
    }

    #[test]
    fn mixed_statement() {
        let values = texts_no_eol("dx=x0+R*sin(angle)--calculate horizontal offset");
        assert_eq!(
            values,
            vec![
                "dx", "=", "x0", "+", "R", "*", "sin", "(", "angle", ")",
                "calculate horizontal offset",
            ]
        );
    }

    #[test]
    fn positions_are_one_based() {
        let tokens: Vec<Token> = Tokenizer::from_text("ab = 1\n  cd = 2\n").collect();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1)); // ab
        assert_eq!((tokens[1].line, tokens[1].column), (1, 4)); // =
        assert_eq!((tokens[2].line, tokens[2].column), (1, 6)); // 1
        assert_eq!((tokens[3].line, tokens[3].column), (1, 7)); // eol
        assert_eq!((tokens[4].line, tokens[4].column), (2, 3)); // cd
    }

    #[test]
    fn unknown_character_carries_remainder() {
        let tokens: Vec<Token> = Tokenizer::from_text("x = @rest of line\nmore\n").collect();
        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[2].text, "@rest of line");
        assert_eq!(tokens[3].kind, TokenKind::EndOfStream);
        assert_eq!(tokens.len(), 4);
    }
}
