//! Single ACL clauses and their restrictions.

use std::fmt::{Display, Formatter, Result as FmtResult};

use itertools::Itertools;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// What an [`AclLine`] does to the access control list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclAction {
    Allow,
    Deny,
    /// Remove entries for the listed privileges.
    Remove,
    /// `remove *`, drop every entry for the targets.
    RemoveAll,
}

/// A `restriction(name, value, ...)` clause, e.g. `restriction(rep:glob,*abc*)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct RestrictionClause {
    name: String,
    values: Vec<String>,
}

impl RestrictionClause {
    pub(crate) fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        RestrictionClause {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Restriction values, possibly empty (`restriction(rep:itemNames)`).
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Display for RestrictionClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}=[{}]", self.name, self.values.join(", "))
    }
}

/// One grant, deny or remove clause inside an ACL block.
///
/// Which of `principals` and `paths` is filled depends on the block: lines in
/// `set ACL for` name paths, lines in `set ACL on` name principals, and
/// repository-level lines name neither.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct AclLine {
    action: AclAction,
    principals: Vec<String>,
    paths: Vec<String>,
    privileges: Vec<String>,
    nodetypes: Vec<String>,
    restrictions: Vec<RestrictionClause>,
}

impl AclLine {
    pub(crate) fn new(action: AclAction) -> Self {
        AclLine {
            action,
            principals: Vec::new(),
            paths: Vec::new(),
            privileges: Vec::new(),
            nodetypes: Vec::new(),
            restrictions: Vec::new(),
        }
    }

    pub(crate) fn with_principals(mut self, principals: Vec<String>) -> Self {
        self.principals = principals;
        self
    }

    pub(crate) fn with_paths(mut self, paths: Vec<String>) -> Self {
        self.paths = paths;
        self
    }

    pub(crate) fn with_privileges(mut self, privileges: Vec<String>) -> Self {
        self.privileges = privileges;
        self
    }

    pub(crate) fn with_nodetypes(mut self, nodetypes: Vec<String>) -> Self {
        self.nodetypes = nodetypes;
        self
    }

    pub(crate) fn with_restrictions(mut self, restrictions: Vec<RestrictionClause>) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn action(&self) -> AclAction {
        self.action
    }

    /// Principals of a `set ACL on` line; empty elsewhere.
    pub fn principals(&self) -> &[String] {
        &self.principals
    }

    /// Paths of a `set ACL for` line; empty elsewhere.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Privileges in source order. Empty for [`AclAction::RemoveAll`].
    pub fn privileges(&self) -> &[String] {
        &self.privileges
    }

    pub fn nodetypes(&self) -> &[String] {
        &self.nodetypes
    }

    pub fn restrictions(&self) -> &[RestrictionClause] {
        &self.restrictions
    }
}

impl Display for AclLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let restrictions: Vec<String> = self.restrictions.iter().map(ToString::to_string).collect();
        let properties = [
            ("nodetypes", &self.nodetypes),
            ("paths", &self.paths),
            ("principals", &self.principals),
            ("privileges", &self.privileges),
            ("restrictions", &restrictions),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(key, values)| format!("{key}=[{}]", values.join(", ")))
        .join(", ");
        write!(f, "AclLine {} {{{properties}}}", self.action)
    }
}
