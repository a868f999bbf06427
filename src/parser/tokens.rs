//! Token-level parsers shared by the statement grammar.
//!
//! Every token parser skips leading blanks itself, so the grammar never has
//! to thread whitespace handling between tokens. Keywords, names and
//! punctuation also skip `/* ... */` comments; values (paths, restriction
//! values, bare words) only skip blanks, since `/*` is a valid glob there.
//! Newlines are significant and only consumed by [`eol`] and [`blank_lines`].

use nom::{
    Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{char, none_of, satisfy},
    combinator::{cut, eof, map, not, opt, recognize, value},
    error::{ContextError, ErrorKind, ParseError as NomParseError, VerboseError, context},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, terminated},
};

use super::Res;

pub(crate) fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || "_-.:@$".contains(c)
}

fn is_path_char(c: char) -> bool {
    !c.is_whitespace() && !",()#".contains(c)
}

/// Skips blanks and `/* ... */` comments. Never consumes a bare newline.
pub(crate) fn sp(input: &str) -> Res<'_, ()> {
    let mut rest = input.trim_start_matches(is_blank);
    while let Some(body) = rest.strip_prefix("/*") {
        match body.find("*/") {
            Some(end) => rest = body[end + 2..].trim_start_matches(is_blank),
            None => {
                return Err(nom::Err::Failure(VerboseError::add_context(
                    rest,
                    "'*/' closing the comment",
                    VerboseError::from_error_kind(rest, ErrorKind::TakeUntil),
                )));
            }
        }
    }
    Ok((rest, ()))
}

/// Skips blanks only. Used in front of values, where `/*` is content.
pub(crate) fn blanks(input: &str) -> Res<'_, ()> {
    Ok((input.trim_start_matches(is_blank), ()))
}

fn line_comment(input: &str) -> Res<'_, &str> {
    preceded(alt((tag("#"), tag("//"))), take_till(|c| c == '\n'))(input)
}

/// End of a line: an optional trailing comment, then a newline or end of input.
pub(crate) fn eol(input: &str) -> Res<'_, ()> {
    let (input, _) = sp(input)?;
    let (input, _) = opt(line_comment)(input)?;
    value((), alt((tag("\n"), eof)))(input)
}

/// Committed [`eol`]: anything left on the line is an error.
pub(crate) fn end_of_line(input: &str) -> Res<'_, ()> {
    cut(context("end of line", eol))(input)
}

/// Skips empty and comment-only lines. Stops at the start of the next line
/// with content, or at end of input.
pub(crate) fn blank_lines(input: &str) -> Res<'_, ()> {
    let mut rest = input;
    loop {
        let (after, _) = sp(rest)?;
        let (after, _) = opt(line_comment)(after)?;
        match after.strip_prefix('\n') {
            Some(next) => rest = next,
            None if after.is_empty() => return Ok((after, ())),
            None => return Ok((rest, ())),
        }
    }
}

/// A case-sensitive keyword that is not the prefix of a longer word.
pub(crate) fn kw<'a>(word: &'static str) -> impl FnMut(&'a str) -> Res<'a, &'a str> {
    move |input| preceded(sp, terminated(tag(word), not(satisfy(is_word_char))))(input)
}

/// A single punctuation character, after optional blanks.
pub(crate) fn punct<'a>(c: char) -> impl FnMut(&'a str) -> Res<'a, char> {
    move |input| preceded(sp, char(c))(input)
}

fn comma(input: &str) -> Res<'_, char> {
    punct(',')(input)
}

/// One or more items separated by commas.
pub(crate) fn list<'a, O, F>(item: F) -> impl FnMut(&'a str) -> Res<'a, Vec<O>>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    separated_list1(comma, item)
}

/// Principal, group, privilege, node type or namespace prefix.
pub(crate) fn name(input: &str) -> Res<'_, String> {
    context(
        "a name",
        map(preceded(sp, take_while1(is_name_char)), String::from),
    )(input)
}

/// An absolute repository path, e.g. `/content/site`.
pub(crate) fn path(input: &str) -> Res<'_, String> {
    context(
        "a path starting with '/'",
        map(
            preceded(blanks, recognize(pair(char('/'), take_while(is_path_char)))),
            String::from,
        ),
    )(input)
}

/// Any run of non-whitespace characters; used for URIs and passwords.
pub(crate) fn bare_word(input: &str) -> Res<'_, String> {
    map(
        preceded(blanks, take_while1(|c: char| !c.is_whitespace())),
        String::from,
    )(input)
}

/// A double-quoted string with `\"`, `\\`, `\n`, `\t` escapes.
pub(crate) fn quoted(input: &str) -> Res<'_, String> {
    let (input, _) = punct('"')(input)?;
    let (input, text) = opt(nom::bytes::complete::escaped_transform(
        none_of("\"\\"),
        '\\',
        alt((
            value('\n', char('n')),
            value('\t', char('t')),
            value('\\', char('\\')),
            value('"', char('"')),
        )),
    ))(input)?;
    let (input, _) = cut(context("'\"' closing the string", char('"')))(input)?;
    Ok((input, text.unwrap_or_default()))
}

/// `(value)` with optional blanks inside the parentheses.
pub(crate) fn parenthesized<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> Res<'a, O>
where
    F: Parser<&'a str, O, VerboseError<&'a str>>,
{
    delimited(punct('('), cut(inner), cut(context("')'", punct(')'))))
}
