//! HTML comments, Go comments within markup, and the doctype.

use crate::ast::{DocType, GoComment, HtmlComment, Node};
use crate::combinator::{literal, literal_insensitive, must, until};
use crate::error::ParseError;
use crate::input::Cursor;

/// `<!-- ... -->`. The contents must not contain `--`.
pub(super) fn html_comment(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    if literal(input, "<!--").is_none() {
        return Ok(None);
    }
    let contents = must(
        until(input, "--"),
        "expected end comment literal '-->' not found",
        input,
    )?
    .to_string();
    literal(input, "--");
    must(
        literal(input, ">"),
        "comment contains invalid sequence '--'",
        input,
    )?;
    Ok(Some(Node::HtmlComment(HtmlComment { contents })))
}

/// `// ...` or `/* ... */` in markup. Kept in the tree for formatting but
/// never rendered.
pub(super) fn go_comment(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    if literal(input, "//").is_some() {
        // Runs to the end of the line; the line break itself is not part of
        // the comment. A comment on the last line ends at EOF.
        let contents = match until(input, "\n") {
            Some(c) => c.to_string(),
            None => {
                let len = input.rest().len();
                input.take_bytes(len).to_string()
            }
        };
        return Ok(Some(Node::GoComment(GoComment {
            contents,
            multiline: false,
        })));
    }
    let start = input.position();
    if literal(input, "/*").is_some() {
        let Some(contents) = until(input, "*/") else {
            return Err(ParseError::syntax(
                "expected end comment literal '*/' not found",
                start,
            ));
        };
        let contents = contents.to_string();
        literal(input, "*/");
        return Ok(Some(Node::GoComment(GoComment {
            contents,
            multiline: true,
        })));
    }
    Ok(None)
}

/// `<!DOCTYPE html>`, matched without regard to case.
pub(super) fn doc_type(input: &mut Cursor<'_>) -> Result<Option<Node>, ParseError> {
    if literal_insensitive(input, "<!doctype").is_none() {
        return Ok(None);
    }
    let value = must(until(input, ">"), "unclosed DOCTYPE", input)?
        .trim()
        .to_string();
    literal(input, ">");
    Ok(Some(Node::DocType(DocType { value })))
}
