use serde::Serialize;
use utoipa::ToSchema;

use super::acl_line::AclLine;

/// Shared body of the `set ... ACL` statements.
///
/// `targets` are the principals of `set ACL for` and `set repository ACL for`,
/// or the paths of `set ACL on`. The lines are handed out as a slice only, so
/// their order and content are fixed once the parser has built the group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct AclGroup {
    targets: Vec<String>,
    options: Vec<String>,
    lines: Vec<AclLine>,
}

impl AclGroup {
    pub(crate) fn new(targets: Vec<String>, options: Vec<String>, lines: Vec<AclLine>) -> Self {
        AclGroup {
            targets,
            options,
            lines,
        }
    }

    /// Principals or paths named on the `set ... ACL` line, in source order.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Values of the `(ACLOptions=...)` clause, e.g. `merge` or `mergePreserve`.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Whether `option` was given in `ACLOptions`. Case-sensitive.
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// The block's lines, in source order.
    pub fn lines(&self) -> &[AclLine] {
        &self.lines
    }

    pub(crate) fn describe(&self, preposition: &str) -> String {
        let mut out = format!("{preposition} {}", self.targets.join(", "));
        if !self.options.is_empty() {
            out.push_str(&format!(" ACLOptions=[{}]", self.options.join(", ")));
        }
        for line in &self.lines {
            out.push_str("\n  ");
            out.push_str(&line.to_string());
        }
        out
    }
}
