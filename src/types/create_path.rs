use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Serialize;
use utoipa::ToSchema;

/// One `/segment(type)` element of a `create path` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct PathSegmentDefinition {
    segment: String,
    primary_type: Option<String>,
}

impl PathSegmentDefinition {
    pub(crate) fn new(segment: impl Into<String>, primary_type: Option<String>) -> Self {
        PathSegmentDefinition {
            segment: segment.into(),
            primary_type,
        }
    }

    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.primary_type.as_deref()
    }
}

impl Display for PathSegmentDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.primary_type {
            Some(primary_type) => write!(f, "/{}({primary_type})", self.segment),
            None => write!(f, "/{}", self.segment),
        }
    }
}

/// A `create path [(default type)] /a(type)/b` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct CreatePath {
    default_primary_type: Option<String>,
    segments: Vec<PathSegmentDefinition>,
}

impl CreatePath {
    pub(crate) fn new(
        default_primary_type: Option<String>,
        segments: Vec<PathSegmentDefinition>,
    ) -> Self {
        CreatePath {
            default_primary_type,
            segments,
        }
    }

    /// Type used for segments that do not name their own.
    pub fn default_primary_type(&self) -> Option<&str> {
        self.default_primary_type.as_deref()
    }

    pub fn segments(&self) -> &[PathSegmentDefinition] {
        &self.segments
    }

    /// The plain path without node types, e.g. `/var/discovery/somefolder`.
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("/{}", s.segment))
            .collect()
    }
}

impl Display for CreatePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if let Some(default_type) = &self.default_primary_type {
            write!(f, "({default_type}) ")?;
        }
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
