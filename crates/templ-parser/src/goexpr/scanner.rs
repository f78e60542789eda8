//! State machine for scanning a single Go expression from a token stream.

use thiserror::Error;

use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unbalanced '{0}'")]
    Unbalanced(char),
    #[error("illegal token: {0}")]
    Illegal(String),
    #[error("expected node not found")]
    ExpectedNodeNotFound,
}

fn closer_char(kind: TokenKind) -> char {
    match kind {
        TokenKind::RParen => ')',
        TokenKind::RBrack => ']',
        _ => '}',
    }
}

/// Scans a chain of identifiers, field selectors, index and call suffixes,
/// stopping at the first token that cannot extend the chain.
///
/// Accepts input such as:
///
/// ```text
/// components.Variable
/// components[0].Variable
/// components["name"].Function()
/// functionCall(withLots(), func() bool { return true })
/// ```
///
/// The ambiguity between a composite literal brace and the brace that closes
/// the surrounding template block is resolved by two rules: a top-level `{`
/// only continues the expression when it directly follows an identifier with
/// no space, and never when the scanner is outside all function literals and
/// a space precedes it.
pub struct ExpressionScanner {
    stack: Vec<TokenKind>,
    /// Byte offset one past the last accepted token.
    pub end: usize,
    previous: TokenKind,
    /// Bracket depth at each `func` keyword not yet closed.
    fns: Vec<usize>,
}

impl Default for ExpressionScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionScanner {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            end: 0,
            // A leading identifier is always accepted, as if it followed a
            // selector dot.
            previous: TokenKind::Period,
            fns: Vec::new(),
        }
    }

    /// Feeds one token. Returns `Ok(true)` when the expression has ended at
    /// [`ExpressionScanner::end`], before this token.
    pub fn insert(&mut self, token: Token, text: &str) -> Result<bool, ScanError> {
        let stop = self.step(token, text)?;
        self.previous = token.kind;
        Ok(stop)
    }

    fn step(&mut self, token: Token, text: &str) -> Result<bool, ScanError> {
        let kind = token.kind;

        if kind == TokenKind::Eof {
            if let Some(open) = self.stack.last() {
                let unclosed = match open {
                    TokenKind::LParen => ')',
                    TokenKind::LBrack => ']',
                    _ => '}',
                };
                return Err(ScanError::Unbalanced(unclosed));
            }
            return Ok(true);
        }
        if kind == TokenKind::Illegal {
            return Err(ScanError::Illegal(text.to_string()));
        }

        if kind == TokenKind::Func {
            // The next open brace belongs to a function literal body.
            self.fns.push(self.stack.len());
            self.end = token.end;
            return Ok(false);
        }

        // Opening a pair. A pair can open after an ident (a call or index),
        // or as part of a function literal.
        if matches!(kind, TokenKind::LParen | TokenKind::LBrace | TokenKind::LBrack) {
            if kind == TokenKind::LBrace {
                if self.previous != TokenKind::Ident {
                    return Ok(true);
                }
                let has_space = token.start > self.end;
                if has_space && self.fns.is_empty() {
                    // A space before a top-level brace means it opens the
                    // template block, not a composite literal.
                    return Ok(true);
                }
            }
            self.stack.push(kind);
            self.end = token.end;
            return Ok(false);
        }

        // Closing a pair.
        if let Some(expected) = kind.matching_open() {
            let Some(actual) = self.stack.pop() else {
                // Nothing to close: the expression ended before this token.
                return Ok(true);
            };
            if actual != expected {
                return Err(ScanError::Unbalanced(closer_char(kind)));
            }
            if kind == TokenKind::RBrace && Some(&self.stack.len()) == self.fns.last() {
                self.fns.pop();
            }
            self.end = token.end;
            return Ok(false);
        }

        // Inside a pair, anything goes.
        if !self.stack.is_empty() {
            self.end = token.end;
            return Ok(false);
        }

        // A selector dot after an ident or a closer, e.g. "pkg.name" or
        // "Type{field: v}.name()".
        if kind == TokenKind::Period
            && (self.previous == TokenKind::Ident || self.previous.is_closer())
        {
            self.end = token.end;
            return Ok(false);
        }

        // An ident after a dot or a closer, but not across a space:
        // "call().name" continues, "call() .name" does not.
        if kind == TokenKind::Ident
            && (self.previous == TokenKind::Period || self.previous.is_closer())
        {
            if token.start > self.end {
                return Ok(true);
            }
            self.end = token.end;
            return Ok(false);
        }

        Ok(true)
    }
}

/// Scans a header expression for `if`, `for`, or `switch`, stopping at the
/// brace that opens the block body.
///
/// Function literal bodies inside the header are tracked so their braces do
/// not end the scan. In Go, a composite literal in a header must be
/// parenthesized, so any other top-level `{` is the block brace.
pub struct HeaderScanner {
    stack: Vec<TokenKind>,
    pub end: usize,
    fns: Vec<usize>,
}

impl HeaderScanner {
    pub fn new(start: usize) -> Self {
        Self {
            stack: Vec::new(),
            end: start,
            fns: Vec::new(),
        }
    }

    /// Feeds one token. Returns `Ok(true)` when the block-opening brace has
    /// been reached; the header ends at [`HeaderScanner::end`].
    pub fn insert(&mut self, token: Token, text: &str) -> Result<bool, ScanError> {
        match token.kind {
            TokenKind::Eof => {
                if self.stack.is_empty() {
                    // No block brace found; treat EOF as the header end so
                    // the caller reports the missing brace at the right spot.
                    Ok(true)
                } else {
                    Err(ScanError::Unbalanced('}'))
                }
            }
            TokenKind::Illegal => Err(ScanError::Illegal(text.to_string())),
            TokenKind::Func => {
                self.fns.push(self.stack.len());
                self.end = token.end;
                Ok(false)
            }
            TokenKind::LBrace => {
                if self.fns.is_empty() && self.stack.is_empty() {
                    return Ok(true);
                }
                self.stack.push(TokenKind::LBrace);
                self.end = token.end;
                Ok(false)
            }
            TokenKind::LParen | TokenKind::LBrack => {
                self.stack.push(token.kind);
                self.end = token.end;
                Ok(false)
            }
            kind if kind.is_closer() => {
                let expected = kind.matching_open();
                match self.stack.pop() {
                    Some(actual) if Some(actual) == expected => {
                        if kind == TokenKind::RBrace
                            && Some(&self.stack.len()) == self.fns.last()
                        {
                            self.fns.pop();
                        }
                        self.end = token.end;
                        Ok(false)
                    }
                    _ => Err(ScanError::Unbalanced(closer_char(kind))),
                }
            }
            TokenKind::Semicolon => {
                // An explicit semicolon separates an init statement from the
                // condition and stays part of the header. An inserted one
                // spans a newline and does not extend it.
                if text == ";" {
                    self.end = token.end;
                }
                Ok(false)
            }
            _ => {
                self.end = token.end;
                Ok(false)
            }
        }
    }
}
