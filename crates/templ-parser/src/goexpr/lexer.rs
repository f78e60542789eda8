//! A Go token lexer.
//!
//! Produces the token stream consumed by the expression scanners. Strings,
//! runes, raw strings, and comments are lexed as opaque spans so that bracket
//! characters inside them never affect nesting depth. Semicolons are inserted
//! at line ends following the same rule the Go scanner applies, because the
//! expression scanners use them as statement boundaries.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword,
    Func,
    Int,
    Float,
    Imag,
    Char,
    Str,
    Comment,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBrack,
    RBrack,
    Period,
    Comma,
    Semicolon,
    Colon,
    Operator,
    Illegal,
    Eof,
}

impl TokenKind {
    /// Returns true for tokens that close a bracket pair.
    pub fn is_closer(self) -> bool {
        matches!(self, Self::RParen | Self::RBrace | Self::RBrack)
    }

    /// The opening token matching a closer.
    pub fn matching_open(self) -> Option<Self> {
        match self {
            Self::RParen => Some(Self::LParen),
            Self::RBrace => Some(Self::LBrace),
            Self::RBrack => Some(Self::LBrack),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBrack => "[",
            Self::RBrack => "]",
            Self::Period => ".",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Eof => "EOF",
            other => return write!(f, "{other:?}"),
        };
        f.write_str(s)
    }
}

/// A token with its byte span in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first byte of the token.
    pub start: usize,
    /// Byte offset one past the last byte of the token.
    pub end: usize,
}

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var",
];

/// Three-, two-, then one-byte operators, longest match first.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=",
    "<=", ">=", ":=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<",
    ">>", "&^", "+", "-", "*", "/", "%", "&", "|", "^", "<", ">", "=", "!",
    "~",
];

pub struct Lexer<'a> {
    src: &'a str,
    offset: usize,
    /// Whether a line end should produce an inserted semicolon.
    insert_semi: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            offset: 0,
            insert_semi: false,
        }
    }

    /// The text of a token, sliced from the scanned input.
    pub fn text(&self, token: Token) -> &'a str {
        &self.src[token.start..token.end]
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.offset).copied()
    }

    fn peek_byte_at(&self, n: usize) -> Option<u8> {
        self.src.as_bytes().get(self.offset + n).copied()
    }

    /// Scans the next token.
    pub fn next_token(&mut self) -> Token {
        // Skip whitespace, inserting a semicolon at a line end when the
        // previous token could end a statement.
        while let Some(b) = self.peek_byte() {
            match b {
                b' ' | b'\t' | b'\r' => self.offset += 1,
                b'\n' => {
                    if self.insert_semi {
                        self.insert_semi = false;
                        let at = self.offset;
                        self.offset += 1;
                        return Token {
                            kind: TokenKind::Semicolon,
                            start: at,
                            end: at + 1,
                        };
                    }
                    self.offset += 1;
                }
                _ => break,
            }
        }

        let start = self.offset;
        let Some(b) = self.peek_byte() else {
            return Token {
                kind: TokenKind::Eof,
                start,
                end: start,
            };
        };

        let kind = match b {
            b'(' => self.single(TokenKind::LParen, false),
            b')' => self.single(TokenKind::RParen, true),
            b'[' => self.single(TokenKind::LBrack, false),
            b']' => self.single(TokenKind::RBrack, true),
            b'{' => self.single(TokenKind::LBrace, false),
            b'}' => self.single(TokenKind::RBrace, true),
            b',' => self.single(TokenKind::Comma, false),
            b';' => self.single(TokenKind::Semicolon, false),
            b'"' => self.scan_string(b'"'),
            b'`' => self.scan_raw_string(),
            b'\'' => self.scan_string(b'\''),
            b'/' => match self.peek_byte_at(1) {
                Some(b'/') => self.scan_line_comment(),
                Some(b'*') => self.scan_block_comment(),
                _ => self.scan_operator(),
            },
            b'.' => {
                if self.peek_byte_at(1).is_some_and(|d| d.is_ascii_digit()) {
                    self.scan_number()
                } else if self.src[self.offset..].starts_with("...") {
                    self.offset += 3;
                    self.insert_semi = false;
                    TokenKind::Operator
                } else {
                    self.single(TokenKind::Period, false)
                }
            }
            b':' => {
                if self.peek_byte_at(1) == Some(b'=') {
                    self.offset += 2;
                    self.insert_semi = false;
                    TokenKind::Operator
                } else {
                    self.single(TokenKind::Colon, false)
                }
            }
            b'0'..=b'9' => self.scan_number(),
            _ => {
                let c = self.src[self.offset..].chars().next().unwrap();
                if c == '_' || c.is_alphabetic() {
                    self.scan_ident()
                } else if b.is_ascii() {
                    self.scan_operator()
                } else {
                    self.offset += c.len_utf8();
                    self.insert_semi = false;
                    TokenKind::Illegal
                }
            }
        };

        Token {
            kind,
            start,
            end: self.offset,
        }
    }

    fn single(&mut self, kind: TokenKind, insert_semi: bool) -> TokenKind {
        self.offset += 1;
        self.insert_semi = insert_semi;
        kind
    }

    fn scan_ident(&mut self) -> TokenKind {
        let rest = &self.src[self.offset..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let word = &rest[..len];
        self.offset += len;
        if word == "func" {
            self.insert_semi = false;
            return TokenKind::Func;
        }
        if GO_KEYWORDS.contains(&word) {
            self.insert_semi = matches!(word, "break" | "continue" | "fallthrough" | "return");
            return TokenKind::Keyword;
        }
        self.insert_semi = true;
        TokenKind::Ident
    }

    fn scan_number(&mut self) -> TokenKind {
        let bytes = self.src.as_bytes();
        let mut kind = TokenKind::Int;

        let is_digit = |b: u8, hex: bool| -> bool {
            b == b'_' || b.is_ascii_digit() || (hex && b.is_ascii_hexdigit())
        };

        let mut hex = false;
        if bytes[self.offset] == b'0' {
            match self.peek_byte_at(1) {
                Some(b'x') | Some(b'X') => {
                    hex = true;
                    self.offset += 2;
                }
                Some(b'b') | Some(b'B') | Some(b'o') | Some(b'O') => self.offset += 2,
                _ => {}
            }
        }
        while self.peek_byte().is_some_and(|b| is_digit(b, hex)) {
            self.offset += 1;
        }
        // Fraction.
        if self.peek_byte() == Some(b'.')
            && self.peek_byte_at(1).is_some_and(|b| is_digit(b, hex))
        {
            kind = TokenKind::Float;
            self.offset += 1;
            while self.peek_byte().is_some_and(|b| is_digit(b, hex)) {
                self.offset += 1;
            }
        }
        // Exponent.
        if self
            .peek_byte()
            .is_some_and(|b| matches!(b, b'e' | b'E' | b'p' | b'P'))
        {
            let mut ahead = 1;
            if self
                .peek_byte_at(1)
                .is_some_and(|b| b == b'+' || b == b'-')
            {
                ahead = 2;
            }
            if self.peek_byte_at(ahead).is_some_and(|b| b.is_ascii_digit()) {
                kind = TokenKind::Float;
                self.offset += ahead;
                while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
                    self.offset += 1;
                }
            }
        }
        if self.peek_byte() == Some(b'i') {
            kind = TokenKind::Imag;
            self.offset += 1;
        }
        self.insert_semi = true;
        kind
    }

    fn scan_string(&mut self, quote: u8) -> TokenKind {
        self.offset += 1;
        while let Some(b) = self.peek_byte() {
            match b {
                b'\\' => {
                    self.offset += 2.min(self.src.len() - self.offset);
                }
                b'\n' => {
                    // Interpreted strings and runes cannot span lines.
                    self.insert_semi = true;
                    return TokenKind::Illegal;
                }
                _ if b == quote => {
                    self.offset += 1;
                    self.insert_semi = true;
                    return if quote == b'\'' {
                        TokenKind::Char
                    } else {
                        TokenKind::Str
                    };
                }
                _ => self.offset += 1,
            }
        }
        self.insert_semi = true;
        TokenKind::Illegal
    }

    fn scan_raw_string(&mut self) -> TokenKind {
        self.offset += 1;
        while let Some(b) = self.peek_byte() {
            self.offset += 1;
            if b == b'`' {
                self.insert_semi = true;
                return TokenKind::Str;
            }
        }
        self.insert_semi = true;
        TokenKind::Illegal
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        while self.peek_byte().is_some_and(|b| b != b'\n') {
            self.offset += 1;
        }
        TokenKind::Comment
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        self.offset += 2;
        while self.offset < self.src.len() {
            if self.src[self.offset..].starts_with("*/") {
                self.offset += 2;
                return TokenKind::Comment;
            }
            self.offset += 1;
        }
        TokenKind::Illegal
    }

    fn scan_operator(&mut self) -> TokenKind {
        let rest = &self.src[self.offset..];
        for op in OPERATORS {
            if rest.starts_with(op) {
                self.offset += op.len();
                self.insert_semi = matches!(*op, "++" | "--");
                return TokenKind::Operator;
            }
        }
        self.offset += 1;
        self.insert_semi = false;
        TokenKind::Illegal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let t = lexer.next_token();
            if t.kind == TokenKind::Eof {
                break;
            }
            out.push(t.kind);
        }
        out
    }

    #[test]
    fn test_ident_chain() {
        use TokenKind::*;
        assert_eq!(
            kinds("components.Variable"),
            vec![Ident, Period, Ident]
        );
    }

    #[test]
    fn test_braces_in_strings_are_opaque() {
        use TokenKind::*;
        assert_eq!(
            kinds(r#"f("}", '}', '\'')"#),
            vec![Ident, LParen, Str, Comma, Char, Comma, Char, RParen]
        );
    }

    #[test]
    fn test_raw_string_spans_lines() {
        use TokenKind::*;
        assert_eq!(kinds("`a\n}`"), vec![Str]);
    }

    #[test]
    fn test_keywords_and_func() {
        use TokenKind::*;
        assert_eq!(
            kinds("func() bool { return true }"),
            vec![Func, LParen, RParen, Ident, LBrace, Keyword, Ident, RBrace]
        );
    }

    #[test]
    fn test_semicolon_inserted_after_ident_at_line_end() {
        use TokenKind::*;
        assert_eq!(kinds("a\nb"), vec![Ident, Semicolon, Ident]);
        // No insertion after an operator.
        assert_eq!(kinds("a +\nb"), vec![Ident, Operator, Ident]);
    }

    #[test]
    fn test_numbers() {
        use TokenKind::*;
        assert_eq!(kinds("123 45.6 0x1f 1e9 2i"), vec![Int, Float, Int, Float, Imag]);
    }

    #[test]
    fn test_comments() {
        use TokenKind::*;
        assert_eq!(kinds("a /* b */ c // d"), vec![Ident, Comment, Ident, Comment]);
    }

    #[test]
    fn test_token_spans() {
        let mut lexer = Lexer::new("ab cd");
        let t = lexer.next_token();
        assert_eq!((t.start, t.end), (0, 2));
        let t = lexer.next_token();
        assert_eq!((t.start, t.end), (3, 5));
        assert_eq!(lexer.text(t), "cd");
    }

    #[test]
    fn test_unterminated_string_is_illegal() {
        use TokenKind::*;
        assert_eq!(kinds("\"abc"), vec![Illegal]);
    }
}
