//! Small composable parsing primitives over [`Cursor`].
//!
//! Primitives return `Option`: `Some` consumes input, `None` leaves the
//! cursor where it was. Fatal errors only arise once a parser has committed
//! to a construct; [`must`] is the promotion point from a soft no-match to a
//! positioned [`ParseError`].

use crate::error::ParseError;
use crate::input::Cursor;

/// Matches an exact string.
pub fn literal<'a>(input: &mut Cursor<'a>, s: &str) -> Option<&'a str> {
    if input.starts_with(s) {
        Some(input.take_bytes(s.len()))
    } else {
        None
    }
}

/// Matches a string ignoring ASCII case.
pub fn literal_insensitive<'a>(input: &mut Cursor<'a>, s: &str) -> Option<&'a str> {
    // s.len() may land inside a multibyte character of the input, so the
    // prefix has to be sliced fallibly.
    let prefix = input.rest().get(..s.len())?;
    if prefix.eq_ignore_ascii_case(s) {
        Some(input.take_bytes(s.len()))
    } else {
        None
    }
}

/// Matches a single character from the set.
pub fn rune_in(input: &mut Cursor<'_>, set: &str) -> Option<char> {
    let c = input.peek()?;
    if set.contains(c) {
        input.take();
        Some(c)
    } else {
        None
    }
}

/// Matches a single character satisfying the predicate.
pub fn rune_where(input: &mut Cursor<'_>, pred: impl Fn(char) -> bool) -> Option<char> {
    let c = input.peek()?;
    if pred(c) {
        input.take();
        Some(c)
    } else {
        None
    }
}

/// Consumes characters from the set, requiring at least one.
pub fn runes_in<'a>(input: &mut Cursor<'a>, set: &str) -> Option<&'a str> {
    let taken = input.take_while(|c| set.contains(c));
    if taken.is_empty() {
        None
    } else {
        Some(taken)
    }
}

/// Consumes input up to, but not including, the next occurrence of `stop`.
///
/// No-match if `stop` never occurs; the cursor is left unmoved in that case.
pub fn until<'a>(input: &mut Cursor<'a>, stop: &str) -> Option<&'a str> {
    let offset = input.rest().find(stop)?;
    Some(input.take_bytes(offset))
}

/// Consumes input up to the first position where `stop` matches.
///
/// `stop` is a peek: it is run on a clone and never consumes. No-match if no
/// position before EOF satisfies it.
pub fn until_match<'a>(
    input: &mut Cursor<'a>,
    stop: impl Fn(&Cursor<'a>) -> bool,
) -> Option<&'a str> {
    let start = input.position();
    let mut probe = input.clone();
    loop {
        if stop(&probe) {
            let len = probe.index() - start.index;
            return Some(input.take_bytes(len));
        }
        if probe.take().is_none() {
            return None;
        }
    }
}

/// Consumes a run of whitespace, requiring at least one character.
pub fn whitespace<'a>(input: &mut Cursor<'a>) -> Option<&'a str> {
    let taken = input.take_while(char::is_whitespace);
    if taken.is_empty() {
        None
    } else {
        Some(taken)
    }
}

/// Consumes a possibly empty run of whitespace.
pub fn optional_whitespace<'a>(input: &mut Cursor<'a>) -> &'a str {
    input.take_while(char::is_whitespace)
}

/// Consumes a possibly empty run of spaces and tabs.
pub fn horizontal_whitespace<'a>(input: &mut Cursor<'a>) -> &'a str {
    input.take_while(|c| c == ' ' || c == '\t')
}

/// Matches a line break, either `\n` or `\r\n`.
pub fn newline<'a>(input: &mut Cursor<'a>) -> Option<&'a str> {
    literal(input, "\r\n").or_else(|| literal(input, "\n"))
}

/// Promotes a soft no-match to a fatal, positioned error.
///
/// Used once a parser has committed to a construct, where the alternatives
/// no longer apply and the absence of the expected token is a grammar
/// violation.
pub fn must<T>(
    value: Option<T>,
    message: impl Into<String>,
    input: &Cursor<'_>,
) -> Result<T, ParseError> {
    value.ok_or_else(|| ParseError::syntax(message, input.position()))
}
