//! `script Name(params) { ... }` templates: client-side functions whose
//! bodies are carried verbatim.

use source_map::Range;

use crate::ast::{Expression, ScriptTemplate};
use crate::combinator::{literal, must, newline, rune_where, until};
use crate::error::ParseError;
use crate::input::Cursor;

use super::open_brace_with_optional_padding;

pub(super) fn script_template(input: &mut Cursor<'_>) -> Result<Option<ScriptTemplate>, ParseError> {
    let start = input.position();
    if literal(input, "script ").is_none() {
        return Ok(None);
    }

    let name_from = input.position();
    if rune_where(input, |c| c.is_ascii_alphabetic()).is_none() {
        return Err(ParseError::syntax(
            "script expression: invalid name",
            input.position(),
        ));
    }
    input.take_while(|c| c.is_ascii_alphanumeric());
    let name = Expression::new(
        &input.source()[name_from.index..input.index()],
        Range::new(name_from, input.position()),
    );

    must(
        literal(input, "("),
        "script expression: parameters missing open bracket",
        input,
    )?;
    let params_from = input.position();
    let params = must(
        until(input, ")"),
        "script expression: parameters missing close bracket",
        input,
    )?
    .to_string();
    let parameters = Expression::new(params, Range::new(params_from, input.position()));
    if literal(input, ")").is_none() || open_brace_with_optional_padding(input).is_none() {
        return Err(ParseError::syntax(
            "script expression: unterminated (missing ') {')",
            input.position(),
        ));
    }
    must(
        newline(input),
        "script expression: missing terminating newline",
        input,
    )?;

    let value = script_body(input)?;
    must(
        literal(input, "}"),
        "script template: missing closing brace",
        input,
    )?;
    Ok(Some(ScriptTemplate {
        range: Range::new(start, input.position()),
        name,
        parameters,
        value,
    }))
}

/// Reads the raw body up to the brace that closes the template, tracking
/// brace depth so object literals and nested functions stay inside. Quotes
/// and comments make braces opaque.
fn script_body(input: &mut Cursor<'_>) -> Result<String, ParseError> {
    let start = input.index();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    loop {
        if quote.is_none() {
            if input.starts_with("//") {
                match until(input, "\n") {
                    Some(_) => {
                        literal(input, "\n");
                    }
                    None => {
                        let len = input.rest().len();
                        input.take_bytes(len);
                    }
                }
                continue;
            }
            if input.starts_with("/*") {
                if until(input, "*/").is_none() {
                    return Err(ParseError::syntax(
                        "script template: missing closing brace",
                        input.position(),
                    ));
                }
                literal(input, "*/");
                continue;
            }
        }
        let Some(c) = input.peek() else {
            return Err(ParseError::syntax(
                "script template: missing closing brace",
                input.position(),
            ));
        };
        match c {
            '\\' if quote.is_some() => {
                input.take();
                input.take();
                continue;
            }
            '"' | '\'' | '`' => match quote {
                None => quote = Some(c),
                Some(q) if q == c => quote = None,
                Some(_) => {}
            },
            '{' if quote.is_none() => depth += 1,
            '}' if quote.is_none() => {
                if depth == 0 {
                    return Ok(input.source()[start..input.index()].to_string());
                }
                depth -= 1;
            }
            _ => {}
        }
        input.take();
    }
}
