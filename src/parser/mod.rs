//! RepoInit grammar.
//!
//! A single pass over the script text. Each statement is recognized by its
//! leading keywords; after those the parser commits (`cut`), so the first
//! error is reported where it happens and parsing stops there. No partial
//! operation list is ever returned.

mod acl;
mod statements;
mod tokens;

use nom::IResult;
use nom::error::{VerboseError, VerboseErrorKind};
use thiserror::Error;

use crate::types::Operation;

pub(crate) type Res<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Diagnostic for the first unparseable token of a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Encountered \"{token}\" at line {line}, column {column}: expected {expected}")]
pub(crate) struct SyntaxError {
    pub(crate) token: String,
    pub(crate) line: usize,
    pub(crate) column: usize,
    pub(crate) expected: String,
}

const MAX_TOKEN_CHARS: usize = 40;

impl SyntaxError {
    fn from_nom(source: &str, err: nom::Err<VerboseError<&str>>) -> Self {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => Self::from_verbose(source, &e),
            nom::Err::Incomplete(_) => Self::at(source, "", "more input".to_string()),
        }
    }

    /// The innermost failure gives the position. The expectation comes from
    /// the outermost context still attached to the innermost context's
    /// position, so `a privilege` wins over the generic `a name`.
    fn from_verbose(source: &str, err: &VerboseError<&str>) -> Self {
        let remaining = err.errors.first().map_or("", |(rest, _)| *rest);
        let mut contexts = err.errors.iter().filter_map(|(rest, kind)| match kind {
            VerboseErrorKind::Context(ctx) => {
                Some((rest.trim_start_matches(tokens::is_blank).len(), *ctx))
            }
            _ => None,
        });
        let expected = match contexts.next() {
            Some((position, innermost)) => contexts
                .take_while(|(other, _)| *other == position)
                .last()
                .map_or(innermost, |(_, ctx)| ctx)
                .to_string(),
            None => err
                .errors
                .iter()
                .find_map(|(_, kind)| match kind {
                    VerboseErrorKind::Char(c) => Some(format!("'{c}'")),
                    _ => None,
                })
                .unwrap_or_else(|| "a valid statement".to_string()),
        };
        Self::at(source, remaining, expected)
    }

    /// `remaining` is the unparsed suffix of `source` where the error occurred.
    fn at(source: &str, remaining: &str, expected: String) -> Self {
        let remaining = remaining.trim_start_matches(tokens::is_blank);
        let offset = source.len().saturating_sub(remaining.len());
        let consumed = source.get(..offset).unwrap_or(source);
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |last| last.chars().count())
            + 1;

        let token = if remaining.is_empty() {
            "<EOF>".to_string()
        } else if remaining.starts_with('\n') {
            "<EOL>".to_string()
        } else {
            remaining
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .chars()
                .take(MAX_TOKEN_CHARS)
                .collect()
        };

        SyntaxError {
            token,
            line,
            column,
            expected,
        }
    }
}

/// Parse a complete script into its operations, in source order.
pub(crate) fn parse_script(source: &str) -> Result<Vec<Operation>, SyntaxError> {
    script(source)
        .map(|(_, operations)| operations)
        .map_err(|err| SyntaxError::from_nom(source, err))
}

fn script(mut input: &str) -> Res<'_, Vec<Operation>> {
    let mut operations = Vec::new();
    loop {
        (input, _) = tokens::blank_lines(input)?;
        if input.is_empty() {
            return Ok((input, operations));
        }
        let (rest, parsed) = statements::statement(input)?;
        operations.extend(parsed);
        input = rest;
    }
}
