//! Top-level statements other than the ACL blocks.

use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{alpha1, char},
    combinator::{cut, map, map_res, opt},
    error::context,
    multi::{many0, many1},
    sequence::{delimited, pair, preceded, terminated},
};

use crate::types::{
    CreatePath, Operation, PathSegmentDefinition, PropertyGroup, PropertyLine, PropertyType,
};

use super::Res;
use super::acl::{set_acl, set_repository_acl};
use super::tokens::{
    bare_word, blank_lines, blanks, end_of_line, is_blank, kw, list, name, parenthesized, path,
    punct, quoted, sp,
};

/// One statement including its line terminator. Statements naming several
/// users or groups expand to one operation per name.
pub(crate) fn statement(input: &str) -> Res<'_, Vec<Operation>> {
    context(
        "a statement",
        alt((
            preceded(kw("create"), cut(create)),
            preceded(kw("delete"), cut(delete)),
            preceded(kw("disable"), cut(map(disable_service_user, one))),
            preceded(kw("add"), cut(map(add_group_members, one))),
            preceded(kw("remove"), cut(map(remove_group_members, one))),
            preceded(kw("set"), cut(map(set, one))),
            preceded(kw("register"), cut(map(register, one))),
        )),
    )(input)
}

fn one(operation: Operation) -> Vec<Operation> {
    vec![operation]
}

fn create(input: &str) -> Res<'_, Vec<Operation>> {
    context(
        "'service user', 'user', 'group' or 'path' after 'create'",
        alt((
            preceded(pair(kw("service"), kw("user")), cut(create_service_users)),
            preceded(kw("user"), cut(map(create_user, one))),
            preceded(kw("group"), cut(map(create_group, one))),
            preceded(kw("path"), cut(map(create_path, one))),
        )),
    )(input)
}

fn delete(input: &str) -> Res<'_, Vec<Operation>> {
    context(
        "'service user', 'user' or 'group' after 'delete'",
        alt((
            preceded(
                pair(kw("service"), kw("user")),
                cut(|i| delete_names(i, |username| Operation::DeleteServiceUser { username })),
            ),
            preceded(
                kw("user"),
                cut(|i| delete_names(i, |username| Operation::DeleteUser { username })),
            ),
            preceded(
                kw("group"),
                cut(|i| delete_names(i, |name| Operation::DeleteGroup { name })),
            ),
        )),
    )(input)
}

fn delete_names(input: &str, build: fn(String) -> Operation) -> Res<'_, Vec<Operation>> {
    let (input, names) = list(name)(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, names.into_iter().map(build).collect()))
}

fn with_path(input: &str) -> Res<'_, Option<String>> {
    opt(preceded(pair(kw("with"), kw("path")), cut(path)))(input)
}

fn create_service_users(input: &str) -> Res<'_, Vec<Operation>> {
    let (input, usernames) = list(name)(input)?;
    let (input, path) = with_path(input)?;
    let (input, _) = end_of_line(input)?;
    let operations = usernames
        .into_iter()
        .map(|username| Operation::CreateServiceUser {
            username,
            path: path.clone(),
        })
        .collect();
    Ok((input, operations))
}

fn create_user(input: &str) -> Res<'_, Operation> {
    let (input, username) = name(input)?;
    let (input, password) = opt(preceded(
        pair(kw("with"), kw("password")),
        cut(context("a password", bare_word)),
    ))(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::CreateUser { username, password }))
}

fn create_group(input: &str) -> Res<'_, Operation> {
    let (input, group) = name(input)?;
    let (input, path) = with_path(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::CreateGroup { name: group, path }))
}

/// `create path [(default type)] /seg(type)/seg`
fn create_path(input: &str) -> Res<'_, Operation> {
    let (input, default_type) = opt(parenthesized(name))(input)?;
    let (input, segments) = preceded(
        blanks,
        context("a path starting with '/'", many1(path_segment)),
    )(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((
        input,
        Operation::CreatePath(CreatePath::new(default_type, segments)),
    ))
}

fn path_segment(input: &str) -> Res<'_, PathSegmentDefinition> {
    let (input, _) = char('/')(input)?;
    let (input, segment) = cut(context(
        "a path segment",
        take_while1(|c: char| !c.is_whitespace() && !"/(),#".contains(c)),
    ))(input)?;
    let (input, primary_type) = opt(delimited(
        char('('),
        cut(name),
        cut(context("')' closing the node type", punct(')'))),
    ))(input)?;
    Ok((input, PathSegmentDefinition::new(segment, primary_type)))
}

/// `disable service user NAME : "reason"`
fn disable_service_user(input: &str) -> Res<'_, Operation> {
    let (input, _) = context(
        "'service user' after 'disable'",
        pair(kw("service"), kw("user")),
    )(input)?;
    let (input, username) = name(input)?;
    let (input, _) = context("':' before the reason", punct(':'))(input)?;
    let (input, reason) = context("a quoted reason", quoted)(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::DisableServiceUser { username, reason }))
}

/// `add NAMES to group NAME`
fn add_group_members(input: &str) -> Res<'_, Operation> {
    let (input, members) = list(name)(input)?;
    let (input, _) = context("'to group'", pair(kw("to"), kw("group")))(input)?;
    let (input, group) = name(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::AddGroupMembers { members, group }))
}

/// `remove NAMES from group NAME`
fn remove_group_members(input: &str) -> Res<'_, Operation> {
    let (input, members) = list(name)(input)?;
    let (input, _) = context("'from group'", pair(kw("from"), kw("group")))(input)?;
    let (input, group) = name(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::RemoveGroupMembers { members, group }))
}

fn set(input: &str) -> Res<'_, Operation> {
    context(
        "'ACL', 'repository ACL' or 'properties' after 'set'",
        alt((set_acl, set_repository_acl, set_properties)),
    )(input)
}

fn register(input: &str) -> Res<'_, Operation> {
    context(
        "'namespace' or 'nodetypes' after 'register'",
        alt((
            preceded(kw("namespace"), cut(register_namespace)),
            preceded(kw("nodetypes"), cut(register_nodetypes)),
        )),
    )(input)
}

/// `( prefix ) uri`
fn register_namespace(input: &str) -> Res<'_, Operation> {
    let (input, prefix) = parenthesized(name)(input)?;
    let (input, uri) = context("a namespace URI", bare_word)(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::RegisterNamespace { prefix, uri }))
}

/// CND text between `<<===` and `===>>`, each line prefixed with `<<`.
fn register_nodetypes(input: &str) -> Res<'_, Operation> {
    let (input, _) = end_of_line(input)?;
    let (input, _) = blank_lines(input)?;
    let (input, _) = context(
        "'<<===' opening the CND block",
        preceded(sp, tag("<<===")),
    )(input)?;
    let (input, body) = context(
        "'===>>' closing the CND block",
        take_until("===>>"),
    )(input)?;
    let (input, _) = tag("===>>")(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::RegisterNodetypes { cnd: cnd_text(body) }))
}

/// Drops the `<<` marker and one separating space from each line. Any
/// further indentation belongs to the CND text and is kept.
fn cnd_text(body: &str) -> String {
    body.lines()
        .map(|line| line.trim_start_matches(is_blank).trim_end())
        .filter(|line| !line.is_empty())
        .map(|line| {
            let text = line.strip_prefix("<<").unwrap_or(line);
            format!("{}\n", text.strip_prefix(' ').unwrap_or(text))
        })
        .collect()
}

/// Everything after `set properties`.
fn set_properties(input: &str) -> Res<'_, Operation> {
    let (input, _) = kw("properties")(input)?;
    let (input, _) = cut(context("'on' after 'set properties'", kw("on")))(input)?;
    let (input, paths) = cut(list(path))(input)?;
    let (input, _) = end_of_line(input)?;
    let (input, _) = blank_lines(input)?;
    let (input, lines) =
        many0(terminated(property_line, pair(end_of_line, blank_lines)))(input)?;
    let (input, _) = cut(context(
        "'end' closing the set properties block",
        kw("end"),
    ))(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, Operation::SetProperties(PropertyGroup::new(paths, lines))))
}

/// `set|default name[{Type}] to v1, v2`
fn property_line(input: &str) -> Res<'_, PropertyLine> {
    let (input, default_only) =
        alt((map(kw("set"), |_| false), map(kw("default"), |_| true)))(input)?;
    let (input, property_name) = cut(name)(input)?;
    let (input, property_type) = opt(delimited(
        char('{'),
        cut(context(
            "a property type (String, Long, Double, Date or Boolean)",
            map_res(alpha1, PropertyType::from_str),
        )),
        cut(context("'}' closing the property type", char('}'))),
    ))(input)?;
    let (input, _) = cut(context("'to'", kw("to")))(input)?;
    let (input, values) = cut(context("a property value", list(property_value)))(input)?;
    Ok((
        input,
        PropertyLine::new(
            property_name,
            property_type.unwrap_or_default(),
            values,
            default_only,
        ),
    ))
}

fn property_value(input: &str) -> Res<'_, String> {
    alt((
        quoted,
        map(
            preceded(blanks, take_while1(|c: char| !c.is_whitespace() && c != ',')),
            String::from,
        ),
    ))(input)
}
