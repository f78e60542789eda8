//! Boundary scanning for Go code embedded in templates.
//!
//! Template syntax interleaves HTML-like markup with fragments of Go: `if`
//! and `for` headers, attribute expressions, component invocations. The
//! parser needs to know where each fragment ends without understanding the
//! Go itself, so the functions here scan a token stream and return the byte
//! offset of the end of exactly one syntactic unit. The text is never
//! interpreted beyond token boundaries; brackets inside strings, runes, and
//! comments are opaque.

mod lexer;
mod scanner;

pub use lexer::{Lexer, Token, TokenKind};
pub use scanner::{ExpressionScanner, HeaderScanner, ScanError};

/// Scans a chained identifier expression such as a component invocation:
/// `components["name"].Function()`. Returns the exclusive end offset.
pub fn templ_expression(src: &str) -> Result<usize, ScanError> {
    let mut lexer = Lexer::new(src);
    let mut scanner = ExpressionScanner::new();
    loop {
        let token = lexer.next_token();
        if scanner.insert(token, lexer.text(token))? {
            return Ok(scanner.end);
        }
    }
}

/// Scans a bare expression, stopping at the `}` that would unbalance it.
///
/// Bracket pairs are tracked with depth counters only; an expression such as
/// `123.45 == true` or `functionCall(a, func() bool { return true })` is
/// consumed whole, and the scan ends at EOF or at a top-level close brace.
pub fn expression(src: &str) -> Result<usize, ScanError> {
    let mut lexer = Lexer::new(src);
    let mut brace_depth: i32 = 0;
    let mut end = 0;
    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::LParen | TokenKind::LBrack => {}
            TokenKind::LBrace => brace_depth += 1,
            TokenKind::RBrace => {
                brace_depth -= 1;
                if brace_depth < 0 {
                    break;
                }
                end = token.end;
            }
            TokenKind::RParen | TokenKind::RBrack => end = token.end,
            TokenKind::Semicolon => continue,
            TokenKind::Illegal => {
                return Err(ScanError::Illegal(lexer.text(token).to_string()))
            }
            _ => end = token.end,
        }
    }
    Ok(end)
}

/// A scanned control-flow header: the byte span of the expression between
/// the keyword and the block-opening brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub start: usize,
    pub end: usize,
}

/// Scans an `if` header: `if p.Test` or `if x := f(); x`. The condition is
/// required.
pub fn if_header(src: &str) -> Result<Header, ScanError> {
    header(src, "if", false)
}

/// Scans a `for` header: clause, range clause, or nothing (`for {`).
pub fn for_header(src: &str) -> Result<Header, ScanError> {
    header(src, "for", true)
}

/// Scans a `switch` header; tagless switches (`switch {`) are allowed.
pub fn switch_header(src: &str) -> Result<Header, ScanError> {
    header(src, "switch", true)
}

fn header(src: &str, keyword: &str, allow_empty: bool) -> Result<Header, ScanError> {
    let rest = src
        .strip_prefix(keyword)
        .ok_or(ScanError::ExpectedNodeNotFound)?;
    if rest.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_') {
        return Err(ScanError::ExpectedNodeNotFound);
    }

    let mut lexer = Lexer::new(src);
    // The first token is the keyword itself.
    let kw = lexer.next_token();
    debug_assert_eq!(lexer.text(kw), keyword);

    let mut scanner = HeaderScanner::new(kw.end);
    let mut start = None;
    loop {
        let token = lexer.next_token();
        let before = scanner.end;
        if scanner.insert(token, lexer.text(token))? {
            break;
        }
        if scanner.end > before && start.is_none() {
            start = Some(token.start);
        }
    }
    match start {
        Some(start) => Ok(Header {
            start,
            end: scanner.end,
        }),
        None if allow_empty => Ok(Header {
            start: kw.end,
            end: kw.end,
        }),
        None => Err(ScanError::ExpectedNodeNotFound),
    }
}

/// Scans a `case` or `default` clause head, returning the exclusive end
/// offset of the terminating colon. The span starts at offset 0 and includes
/// the keyword and the colon.
pub fn case_clause(src: &str) -> Result<usize, ScanError> {
    if let Some(rest) = src.strip_prefix("default") {
        let trimmed = rest.trim_start_matches([' ', '\t']);
        if let Some(stripped) = trimmed.strip_prefix(':') {
            return Ok(src.len() - stripped.len());
        }
        return Err(ScanError::ExpectedNodeNotFound);
    }
    if !src.starts_with("case ") {
        return Err(ScanError::ExpectedNodeNotFound);
    }

    let mut lexer = Lexer::new(src);
    let mut stack: Vec<TokenKind> = Vec::new();
    let mut fns: Vec<usize> = Vec::new();
    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Eof => return Err(ScanError::ExpectedNodeNotFound),
            TokenKind::Illegal => {
                return Err(ScanError::Illegal(lexer.text(token).to_string()))
            }
            TokenKind::Colon if stack.is_empty() => return Ok(token.end),
            TokenKind::Func => fns.push(stack.len()),
            TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => {
                stack.push(token.kind)
            }
            kind if kind.is_closer() => match stack.pop() {
                Some(actual) if Some(actual) == kind.matching_open() => {
                    if kind == TokenKind::RBrace && Some(&stack.len()) == fns.last() {
                        fns.pop();
                    }
                }
                _ => {
                    let c = match kind {
                        TokenKind::RParen => ')',
                        TokenKind::RBrack => ']',
                        _ => '}',
                    };
                    return Err(ScanError::Unbalanced(c));
                }
            },
            _ => {}
        }
    }
}

/// A scanned template function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSignature {
    /// The function name.
    pub name: String,
    /// Exclusive end offset of the parameter list's closing paren.
    pub end: usize,
}

/// Scans a function signature: an optional receiver, a name, optional type
/// parameters, and a parenthesized parameter list. The input starts at the
/// receiver or name, after the declaring keyword.
pub fn func_signature(src: &str) -> Result<FuncSignature, ScanError> {
    let mut lexer = Lexer::new(src);
    let mut token = lexer.next_token();

    // Optional receiver: "(x []string) Name()".
    if token.kind == TokenKind::LParen {
        balanced(&mut lexer, TokenKind::LParen)?;
        token = lexer.next_token();
    }

    if token.kind != TokenKind::Ident {
        return Err(ScanError::ExpectedNodeNotFound);
    }
    let name = lexer.text(token).to_string();

    token = lexer.next_token();
    // Optional type parameter list: "Name[T any](items []T)".
    if token.kind == TokenKind::LBrack {
        balanced(&mut lexer, TokenKind::LBrack)?;
        token = lexer.next_token();
    }

    if token.kind != TokenKind::LParen {
        return Err(ScanError::ExpectedNodeNotFound);
    }
    let end = balanced(&mut lexer, TokenKind::LParen)?;

    Ok(FuncSignature { name, end })
}

/// Consumes tokens until the pair opened by `open` closes, returning the
/// exclusive end offset of the closing token.
fn balanced(lexer: &mut Lexer<'_>, open: TokenKind) -> Result<usize, ScanError> {
    let mut stack = vec![open];
    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Eof => return Err(ScanError::ExpectedNodeNotFound),
            TokenKind::Illegal => {
                return Err(ScanError::Illegal(lexer.text(token).to_string()))
            }
            TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => {
                stack.push(token.kind)
            }
            kind if kind.is_closer() => match stack.pop() {
                Some(actual) if Some(actual) == kind.matching_open() => {
                    if stack.is_empty() {
                        return Ok(token.end);
                    }
                }
                _ => {
                    let c = match kind {
                        TokenKind::RParen => ')',
                        TokenKind::RBrack => ']',
                        _ => '}',
                    };
                    return Err(ScanError::Unbalanced(c));
                }
            },
            _ => {}
        }
    }
}

/// Scans a comma-separated argument list, stopping at EOF or at a closing
/// bracket that belongs to the surrounding construct. Returns the exclusive
/// end offset of the last argument token, including any trailing comma.
pub fn slice_args(src: &str) -> Result<usize, ScanError> {
    let mut lexer = Lexer::new(src);
    let mut stack: Vec<TokenKind> = Vec::new();
    let mut end = 0;
    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Illegal => {
                return Err(ScanError::Illegal(lexer.text(token).to_string()))
            }
            TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => {
                stack.push(token.kind);
                end = token.end;
            }
            kind if kind.is_closer() => {
                match stack.pop() {
                    Some(actual) if Some(actual) == kind.matching_open() => {
                        end = token.end
                    }
                    Some(_) => {
                        let c = match kind {
                            TokenKind::RParen => ')',
                            TokenKind::RBrack => ']',
                            _ => '}',
                        };
                        return Err(ScanError::Unbalanced(c));
                    }
                    // A closer with nothing open ends the argument list.
                    None => break,
                }
            }
            TokenKind::Semicolon if lexer.text(token) != ";" => continue,
            _ => end = token.end,
        }
    }
    Ok(end)
}
