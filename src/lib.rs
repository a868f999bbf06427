//! Parser for RepoInit, the repository initialization language.
//!
//! A script is compiled into an ordered list of [`Operation`] values that an
//! executor applies to a content repository:
//!
//! ```
//! use repoinit_parser::{Operation, RepoInitParser, RepoInitParserService};
//!
//! let script = "create service user alice\nset ACL for alice\n  allow jcr:read on /content\nend\n";
//! let operations = RepoInitParserService::new().parse(script.as_bytes()).unwrap();
//!
//! assert_eq!(operations.len(), 2);
//! assert!(matches!(
//!     &operations[0],
//!     Operation::CreateServiceUser { username, .. } if username == "alice"
//! ));
//! ```
//!
//! Parsing stops at the first error, which is reported as a
//! [`RepoInitParsingError`] with the line and column of the offending token.

pub use error::RepoInitParsingError;
pub use service::{RepoInitParser, RepoInitParserService};
pub use settings::{DEFAULT_MAX_SCRIPT_BYTES, ParserSettings};
pub use types::{
    AclAction, AclGroup, AclLine, CreatePath, Operation, OperationKind, PathSegmentDefinition,
    PropertyGroup, PropertyLine, PropertyType, RestrictionClause,
};

mod error;
pub mod metrics;
mod parser;
mod service;
mod settings;
mod types;
