//! `set ACL for`, `set ACL on` and `set repository ACL for` blocks.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    combinator::{cut, map, opt, value},
    error::context,
    multi::many0,
    sequence::{pair, preceded, terminated},
};

use crate::types::{AclAction, AclGroup, AclLine, Operation, RestrictionClause};

use super::Res;
use super::tokens::{blank_lines, blanks, end_of_line, kw, list, name, path, punct, sp};

/// What the lines of a block name as their targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineScope {
    /// Lines of `set ACL for`: `allow ... on /paths`.
    OnPaths,
    /// Lines of `set ACL on`: `allow ... for principals`.
    ForPrincipals,
    /// Lines of `set repository ACL for`: privileges only.
    Repository,
}

/// Everything after `set ACL`.
pub(crate) fn set_acl(input: &str) -> Res<'_, Operation> {
    let (input, _) = kw("ACL")(input)?;
    cut(context(
        "'for' or 'on' after 'set ACL'",
        alt((
            preceded(kw("for"), cut(acl_for_principals)),
            preceded(kw("on"), cut(acl_on_paths)),
        )),
    ))(input)
}

/// Everything after `set repository`.
pub(crate) fn set_repository_acl(input: &str) -> Res<'_, Operation> {
    let (input, _) = kw("repository")(input)?;
    let (input, _) = cut(context(
        "'ACL for' after 'set repository'",
        pair(kw("ACL"), kw("for")),
    ))(input)?;
    let (input, principals) = cut(list(name))(input)?;
    let (input, _) = end_of_line(input)?;
    let (input, lines) = acl_block(input, LineScope::Repository)?;
    Ok((
        input,
        Operation::SetRepositoryAcl(AclGroup::new(principals, Vec::new(), lines)),
    ))
}

fn acl_for_principals(input: &str) -> Res<'_, Operation> {
    let (input, principals) = list(name)(input)?;
    let (input, options) = opt(acl_options)(input)?;
    let (input, _) = end_of_line(input)?;
    let (input, lines) = acl_block(input, LineScope::OnPaths)?;
    Ok((
        input,
        Operation::SetAclPrincipals(AclGroup::new(
            principals,
            options.unwrap_or_default(),
            lines,
        )),
    ))
}

fn acl_on_paths(input: &str) -> Res<'_, Operation> {
    let (input, paths) = list(path)(input)?;
    let (input, options) = opt(acl_options)(input)?;
    let (input, _) = end_of_line(input)?;
    let (input, lines) = acl_block(input, LineScope::ForPrincipals)?;
    Ok((
        input,
        Operation::SetAclPaths(AclGroup::new(paths, options.unwrap_or_default(), lines)),
    ))
}

/// `(ACLOptions=merge,mergePreserve)`
fn acl_options(input: &str) -> Res<'_, Vec<String>> {
    let (input, _) = punct('(')(input)?;
    let (input, _) = cut(context(
        "'ACLOptions='",
        pair(preceded(sp, tag("ACLOptions")), punct('=')),
    ))(input)?;
    let (input, options) = cut(list(name))(input)?;
    let (input, _) = cut(context("')' closing ACLOptions", punct(')')))(input)?;
    Ok((input, options))
}

/// Lines up to and including the closing `end`.
fn acl_block(input: &str, scope: LineScope) -> Res<'_, Vec<AclLine>> {
    let (input, _) = blank_lines(input)?;
    let (input, lines) = many0(terminated(
        |i| acl_line(i, scope),
        pair(end_of_line, blank_lines),
    ))(input)?;
    let (input, _) = cut(context("'end' closing the set ACL block", kw("end")))(input)?;
    let (input, _) = end_of_line(input)?;
    Ok((input, lines))
}

fn acl_line(input: &str, scope: LineScope) -> Res<'_, AclLine> {
    if scope == LineScope::Repository {
        return grant_line(input, scope);
    }
    alt((|i| remove_line(i, scope), |i| grant_line(i, scope)))(input)
}

/// `allow|deny privileges <targets> [nodetypes ...] [restriction(...)]*`
fn grant_line(input: &str, scope: LineScope) -> Res<'_, AclLine> {
    let (input, action) = alt((
        value(AclAction::Allow, kw("allow")),
        value(AclAction::Deny, kw("deny")),
    ))(input)?;
    let (input, privileges) = cut(context("a privilege", list(name)))(input)?;
    let (input, targets) = cut(|i| line_targets(i, scope))(input)?;
    let line = with_targets(AclLine::new(action).with_privileges(privileges), scope, targets);
    if scope == LineScope::Repository {
        return Ok((input, line));
    }
    let (input, nodetypes) = opt(preceded(kw("nodetypes"), cut(list(name))))(input)?;
    let (input, restrictions) = many0(restriction)(input)?;
    Ok((
        input,
        line.with_nodetypes(nodetypes.unwrap_or_default())
            .with_restrictions(restrictions),
    ))
}

/// `remove * <targets>` or `remove privileges <targets>`
fn remove_line(input: &str, scope: LineScope) -> Res<'_, AclLine> {
    let (input, _) = kw("remove")(input)?;
    let (input, privileges) = cut(context(
        "'*' or a privilege after 'remove'",
        alt((value(None, punct('*')), map(list(name), Some))),
    ))(input)?;
    let (input, targets) = cut(|i| line_targets(i, scope))(input)?;
    let line = match privileges {
        Some(privileges) => AclLine::new(AclAction::Remove).with_privileges(privileges),
        None => AclLine::new(AclAction::RemoveAll),
    };
    Ok((input, with_targets(line, scope, targets)))
}

fn line_targets(input: &str, scope: LineScope) -> Res<'_, Vec<String>> {
    match scope {
        LineScope::OnPaths => preceded(context("'on'", kw("on")), cut(list(path)))(input),
        LineScope::ForPrincipals => {
            preceded(context("'for'", kw("for")), cut(list(name)))(input)
        }
        LineScope::Repository => Ok((input, Vec::new())),
    }
}

fn with_targets(line: AclLine, scope: LineScope, targets: Vec<String>) -> AclLine {
    match scope {
        LineScope::OnPaths => line.with_paths(targets),
        LineScope::ForPrincipals => line.with_principals(targets),
        LineScope::Repository => line,
    }
}

/// `restriction(rep:glob,*abc*)`; the value list may be empty.
fn restriction(input: &str) -> Res<'_, RestrictionClause> {
    let (input, _) = kw("restriction")(input)?;
    let (input, _) = cut(context("'(' after 'restriction'", punct('(')))(input)?;
    let (input, restriction_name) = cut(name)(input)?;
    let (input, values) = many0(preceded(punct(','), cut(restriction_value)))(input)?;
    let (input, _) = cut(context("')' closing the restriction", punct(')')))(input)?;
    Ok((input, RestrictionClause::new(restriction_name, values)))
}

fn restriction_value(input: &str) -> Res<'_, String> {
    context(
        "a restriction value",
        map(
            preceded(
                blanks,
                take_while1(|c: char| !c.is_whitespace() && c != ',' && c != ')'),
            ),
            String::from,
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(operation: &Operation) -> &AclGroup {
        operation.acl_group().expect("an ACL operation")
    }

    #[test]
    fn test_principal_block() {
        let script = "ACL for alice, bob\n  allow jcr:read,jcr:write on /a, /b\n  deny jcr:all on /c\nend\n";
        let (rest, operation) = set_acl(script).unwrap();
        assert_eq!(rest, "");
        assert_eq!(operation.kind(), crate::OperationKind::SetAclPrincipals);

        let group = group(&operation);
        assert_eq!(group.targets(), ["alice", "bob"]);
        assert_eq!(group.lines().len(), 2);
        assert_eq!(group.lines()[0].privileges(), ["jcr:read", "jcr:write"]);
        assert_eq!(group.lines()[0].paths(), ["/a", "/b"]);
        assert_eq!(group.lines()[1].action(), AclAction::Deny);
    }

    #[test]
    fn test_path_block_with_remove_all() {
        let script = "ACL on /content (ACLOptions=merge)\nremove * for alice\nallow jcr:read for bob, carol\nend";
        let (_, operation) = set_acl(script).unwrap();
        let group = group(&operation);
        assert_eq!(group.targets(), ["/content"]);
        assert_eq!(group.options(), ["merge"]);
        assert_eq!(group.lines()[0].action(), AclAction::RemoveAll);
        assert!(group.lines()[0].privileges().is_empty());
        assert_eq!(group.lines()[0].principals(), ["alice"]);
        assert_eq!(group.lines()[1].principals(), ["bob", "carol"]);
    }

    #[test]
    fn test_remove_privileges() {
        let (_, operation) = set_acl("ACL for alice\nremove jcr:write on /a\nend").unwrap();
        let line = &group(&operation).lines()[0];
        assert_eq!(line.action(), AclAction::Remove);
        assert_eq!(line.privileges(), ["jcr:write"]);
    }

    #[test]
    fn test_restrictions_and_nodetypes() {
        let script = "ACL for alice\ndeny jcr:addChildNodes on / nodetypes sling:Folder, nt:unstructured restriction(rep:glob,*abc*) restriction(rep:itemNames)\nend";
        let (_, operation) = set_acl(script).unwrap();
        let line = &group(&operation).lines()[0];
        assert_eq!(line.nodetypes(), ["sling:Folder", "nt:unstructured"]);
        assert_eq!(line.restrictions().len(), 2);
        assert_eq!(line.restrictions()[0].name(), "rep:glob");
        assert_eq!(line.restrictions()[0].values(), ["*abc*"]);
        assert!(line.restrictions()[1].values().is_empty());
    }

    #[test]
    fn test_multi_valued_restriction() {
        let script = "ACL for alice\nallow jcr:read on /a restriction(rep:ntNames, nt:folder , sling:Folder)\nend";
        let (_, operation) = set_acl(script).unwrap();
        let restriction = &group(&operation).lines()[0].restrictions()[0];
        assert_eq!(restriction.values(), ["nt:folder", "sling:Folder"]);
    }

    #[test]
    fn test_glob_restriction_is_not_a_comment() {
        let script = "ACL for alice\nallow jcr:read on /content restriction(rep:glob,/*)\nend\n";
        let (rest, operation) = set_acl(script).unwrap();
        assert_eq!(rest, "");
        let restriction = &group(&operation).lines()[0].restrictions()[0];
        assert_eq!(restriction.values(), ["/*"]);
    }

    #[test]
    fn test_glob_restriction_before_block_comment() {
        let script = "ACL for alice\n  allow jcr:read on /a restriction(rep:glob, /*)\n  /* note */\n  deny jcr:write on /b\nend\n";
        let (rest, operation) = set_acl(script).unwrap();
        assert_eq!(rest, "");
        let lines = group(&operation).lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].restrictions()[0].values(), ["/*"]);
        assert_eq!(lines[1].action(), AclAction::Deny);
        assert_eq!(lines[1].paths(), ["/b"]);
    }

    #[test]
    fn test_repository_block() {
        let script = "repository ACL for alice\nallow jcr:namespaceManagement,jcr:nodeTypeDefinitionManagement\nend\n";
        let (rest, operation) = set_repository_acl(script).unwrap();
        assert_eq!(rest, "");
        let group = group(&operation);
        assert_eq!(group.targets(), ["alice"]);
        let line = &group.lines()[0];
        assert!(line.paths().is_empty());
        assert_eq!(line.privileges().len(), 2);
    }

    #[test]
    fn test_blank_and_comment_lines_inside_block() {
        let script = "ACL for alice\n\n  # read first\n  allow jcr:read on /a # trailing\n\n  /* then write */ allow jcr:write on /a\nend";
        let (_, operation) = set_acl(script).unwrap();
        assert_eq!(group(&operation).lines().len(), 2);
    }

    #[test]
    fn test_empty_block() {
        let (_, operation) = set_acl("ACL for alice\nend").unwrap();
        assert!(group(&operation).lines().is_empty());
    }

    #[test]
    fn test_missing_end_is_failure() {
        let result = set_acl("ACL for alice\nallow jcr:read on /a\n");
        assert!(matches!(result, Err(nom::Err::Failure(_))));
    }

    #[test]
    fn test_missing_on_is_failure() {
        let result = set_acl("ACL for alice\nallow jcr:read /a\nend");
        assert!(matches!(result, Err(nom::Err::Failure(_))));
    }
}
