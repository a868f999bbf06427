use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumDiscriminants};
use utoipa::ToSchema;

use super::acl_group::AclGroup;
use super::create_path::CreatePath;
use super::property_line::PropertyGroup;

/// One parsed RepoInit statement.
///
/// The set of statement kinds is closed; executors are expected to match on
/// it exhaustively. Statements naming several users or groups to create or
/// delete are split into one operation per name, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema, EnumDiscriminants)]
#[strum_discriminants(name(OperationKind), derive(Display, AsRefStr, Hash, Serialize))]
pub enum Operation {
    CreateServiceUser {
        username: String,
        path: Option<String>,
    },
    DeleteServiceUser {
        username: String,
    },
    DisableServiceUser {
        username: String,
        reason: String,
    },
    CreateUser {
        username: String,
        #[serde(skip)]
        password: Option<String>,
    },
    DeleteUser {
        username: String,
    },
    CreateGroup {
        name: String,
        path: Option<String>,
    },
    DeleteGroup {
        name: String,
    },
    AddGroupMembers {
        members: Vec<String>,
        group: String,
    },
    RemoveGroupMembers {
        members: Vec<String>,
        group: String,
    },
    CreatePath(CreatePath),
    SetAclPrincipals(AclGroup),
    SetAclPaths(AclGroup),
    SetRepositoryAcl(AclGroup),
    RegisterNamespace {
        prefix: String,
        uri: String,
    },
    RegisterNodetypes {
        cnd: String,
    },
    SetProperties(PropertyGroup),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        OperationKind::from(self)
    }

    /// The ACL body of the `set ... ACL` statements.
    pub fn acl_group(&self) -> Option<&AclGroup> {
        match self {
            Operation::SetAclPrincipals(group)
            | Operation::SetAclPaths(group)
            | Operation::SetRepositoryAcl(group) => Some(group),
            _ => None,
        }
    }

    /// Human-readable rendering of the statement's content, for logs.
    ///
    /// Not a serialization format: the output does not parse back as RepoInit.
    pub fn parameters_description(&self) -> String {
        match self {
            Operation::CreateServiceUser { username, path } => with_path(username, path),
            Operation::DeleteServiceUser { username } | Operation::DeleteUser { username } => {
                username.clone()
            }
            Operation::DisableServiceUser { username, reason } => {
                format!("{username} : \"{reason}\"")
            }
            Operation::CreateUser { username, password } => match password {
                Some(_) => format!("{username} (with password)"),
                None => username.clone(),
            },
            Operation::CreateGroup { name, path } => with_path(name, path),
            Operation::DeleteGroup { name } => name.clone(),
            Operation::AddGroupMembers { members, group } => {
                format!("{} to {group}", members.join(", "))
            }
            Operation::RemoveGroupMembers { members, group } => {
                format!("{} from {group}", members.join(", "))
            }
            Operation::CreatePath(create_path) => create_path.to_string(),
            Operation::SetAclPrincipals(group) | Operation::SetRepositoryAcl(group) => {
                group.describe("for")
            }
            Operation::SetAclPaths(group) => group.describe("on"),
            Operation::RegisterNamespace { prefix, uri } => format!("({prefix}) {uri}"),
            Operation::RegisterNodetypes { cnd } => {
                cnd.lines().map(|line| format!("\n  {line}")).collect()
            }
            Operation::SetProperties(group) => group.describe(),
        }
    }
}

fn with_path(name: &str, path: &Option<String>) -> String {
    match path {
        Some(path) => format!("{name} with path {path}"),
        None => name.to_string(),
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = self.parameters_description();
        if description.is_empty() || description.starts_with('\n') {
            write!(f, "{}{description}", self.kind())
        } else {
            write!(f, "{} {description}", self.kind())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AclAction, AclLine, PathSegmentDefinition};
    use insta::assert_snapshot;
    use yare::parameterized;

    fn service_user(name: &str) -> Operation {
        Operation::CreateServiceUser {
            username: name.to_string(),
            path: None,
        }
    }

    #[parameterized(
        create_service_user = { service_user("alice"), "CreateServiceUser alice" },
        create_service_user_with_path = {
            Operation::CreateServiceUser {
                username: "alice".into(),
                path: Some("/home/system".into()),
            },
            "CreateServiceUser alice with path /home/system"
        },
        delete_user = { Operation::DeleteUser { username: "bob".into() }, "DeleteUser bob" },
        disable_service_user = {
            Operation::DisableServiceUser { username: "svc".into(), reason: "retired".into() },
            r#"DisableServiceUser svc : "retired""#
        },
        create_user_hides_password = {
            Operation::CreateUser { username: "bob".into(), password: Some("secret".into()) },
            "CreateUser bob (with password)"
        },
        add_members = {
            Operation::AddGroupMembers { members: vec!["a".into(), "b".into()], group: "g".into() },
            "AddGroupMembers a, b to g"
        },
        remove_members = {
            Operation::RemoveGroupMembers { members: vec!["a".into()], group: "g".into() },
            "RemoveGroupMembers a from g"
        },
        register_namespace = {
            Operation::RegisterNamespace {
                prefix: "foo".into(),
                uri: "http://foo.example/ns/1.0".into(),
            },
            "RegisterNamespace (foo) http://foo.example/ns/1.0"
        },
    )]
    fn test_display(operation: Operation, expected: &str) {
        assert_eq!(operation.to_string(), expected);
    }

    #[test]
    fn test_kind() {
        assert_eq!(service_user("alice").kind(), OperationKind::CreateServiceUser);
        assert_eq!(OperationKind::SetAclPaths.to_string(), "SetAclPaths");
        assert_eq!(OperationKind::RegisterNodetypes.as_ref(), "RegisterNodetypes");
    }

    #[test]
    fn test_acl_display_is_multi_line() {
        let operation = Operation::SetAclPaths(AclGroup::new(
            vec!["/content".into()],
            Vec::new(),
            vec![AclLine::new(AclAction::Allow)
                .with_principals(vec!["alice".into()])
                .with_privileges(vec!["jcr:read".into()])],
        ));
        assert_snapshot!(operation.to_string(), @r"
        SetAclPaths on /content
          AclLine ALLOW {principals=[alice], privileges=[jcr:read]}
        ");
        assert!(operation.acl_group().is_some());
    }

    #[test]
    fn test_nodetypes_display() {
        let operation = Operation::RegisterNodetypes {
            cnd: "<foo='http://foo'>\n[foo:bar] > nt:base\n".into(),
        };
        assert_eq!(
            operation.to_string(),
            "RegisterNodetypes\n  <foo='http://foo'>\n  [foo:bar] > nt:base"
        );
        assert!(operation.acl_group().is_none());
    }

    #[test]
    fn test_create_path_display() {
        let operation = Operation::CreatePath(CreatePath::new(
            None,
            vec![PathSegmentDefinition::new("apps", Some("sling:Folder".into()))],
        ));
        assert_eq!(operation.to_string(), "CreatePath /apps(sling:Folder)");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(service_user("alice"), service_user("alice"));
        assert_ne!(service_user("alice"), service_user("bob"));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let operation = Operation::CreateUser {
            username: "bob".into(),
            password: Some("secret".into()),
        };
        let json = serde_json::to_string(&operation).unwrap();
        assert!(json.contains("bob"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_operations_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Operation>();
        assert_send_sync::<Vec<Operation>>();
    }
}
