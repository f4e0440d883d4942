use crate::errors::user::UserError;
use crate::types::internal::auth::Role;

/// User-management operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    Create,
    List,
    Get,
    UpdateStatus,
    UpdateRole,
    ResetPassword,
    UpdateProfile,
    Delete,
}

impl UserOperation {
    fn describe(&self) -> &'static str {
        match self {
            UserOperation::Create => "create users",
            UserOperation::List => "list users",
            UserOperation::Get => "view users",
            UserOperation::UpdateStatus => "change user status",
            UserOperation::UpdateRole => "change user roles",
            UserOperation::ResetPassword => "reset passwords",
            UserOperation::UpdateProfile => "update user profiles",
            UserOperation::Delete => "delete users",
        }
    }
}

/// Decide whether a role may perform a user-management operation.
///
/// Administrators may perform every operation; all other roles are denied.
/// The decision is made before the lifecycle manager touches storage, so a
/// denial never leaves a partial mutation behind.
pub fn authorize(role: Role, operation: UserOperation) -> Result<(), UserError> {
    match role {
        Role::Administrator => Ok(()),
        _ => Err(UserError::forbidden(format!(
            "Role {} is not permitted to {}",
            role,
            operation.describe()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPERATIONS: [UserOperation; 8] = [
        UserOperation::Create,
        UserOperation::List,
        UserOperation::Get,
        UserOperation::UpdateStatus,
        UserOperation::UpdateRole,
        UserOperation::ResetPassword,
        UserOperation::UpdateProfile,
        UserOperation::Delete,
    ];

    #[test]
    fn test_administrator_may_perform_every_operation() {
        for operation in ALL_OPERATIONS {
            assert!(authorize(Role::Administrator, operation).is_ok());
        }
    }

    #[test]
    fn test_non_administrators_are_denied_every_operation() {
        for role in [Role::Employee, Role::Dapur, Role::Delivery] {
            for operation in ALL_OPERATIONS {
                let result = authorize(role, operation);
                assert!(
                    matches!(result, Err(UserError::Forbidden(_))),
                    "{:?} should be denied {:?}",
                    role,
                    operation
                );
            }
        }
    }

    #[test]
    fn test_denial_message_names_the_operation() {
        let err = authorize(Role::Dapur, UserOperation::UpdateRole).unwrap_err();
        assert!(err.message().contains("change user roles"));
    }
}
