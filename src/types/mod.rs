//! Immutable operation model produced by the parser.
//!
//! Every parsed statement becomes one [`Operation`]. ACL blocks share the
//! [`AclGroup`] body, which owns its [`AclLine`]s in source order.

mod acl_group;
mod acl_line;
mod create_path;
mod operation;
mod property_line;

pub use acl_group::AclGroup;
pub use acl_line::{AclAction, AclLine, RestrictionClause};
pub use create_path::{CreatePath, PathSegmentDefinition};
pub use operation::{Operation, OperationKind};
pub use property_line::{PropertyGroup, PropertyLine, PropertyType};
