//! `set properties` blocks.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Value type given in braces after a property name, `String` when omitted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum PropertyType {
    #[default]
    String,
    Long,
    Double,
    Date,
    Boolean,
}

/// `set name{Type} to v1, v2` or `default name{Type} to v1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct PropertyLine {
    name: String,
    property_type: PropertyType,
    values: Vec<String>,
    default_only: bool,
}

impl PropertyLine {
    pub(crate) fn new(
        name: impl Into<String>,
        property_type: PropertyType,
        values: Vec<String>,
        default_only: bool,
    ) -> Self {
        PropertyLine {
            name: name.into(),
            property_type,
            values,
            default_only,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `true` for `default` lines, which only apply when the property is unset.
    pub fn is_default_only(&self) -> bool {
        self.default_only
    }
}

impl Display for PropertyLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mode = if self.default_only { "default " } else { "" };
        write!(
            f,
            "PropertyLine {mode}{}{{{}}}=[{}]",
            self.name,
            self.property_type,
            self.values.join(", ")
        )
    }
}

/// Body of a `set properties on <paths>` block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct PropertyGroup {
    paths: Vec<String>,
    lines: Vec<PropertyLine>,
}

impl PropertyGroup {
    pub(crate) fn new(paths: Vec<String>, lines: Vec<PropertyLine>) -> Self {
        PropertyGroup { paths, lines }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn lines(&self) -> &[PropertyLine] {
        &self.lines
    }

    pub(crate) fn describe(&self) -> String {
        let mut out = format!("on {}", self.paths.join(", "));
        for line in &self.lines {
            out.push_str("\n  ");
            out.push_str(&line.to_string());
        }
        out
    }
}
