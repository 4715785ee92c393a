use serde::Deserialize;
use thiserror::Error;

use crate::domain::types::{TypeConstraintError, UserRole};

#[derive(Deserialize)]
pub struct SetUserRoleForm {
    pub role: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetUserRoleFormPayload {
    pub role: UserRole,
}

#[derive(Debug, Error)]
pub enum SetUserRoleFormError {
    #[error("Role form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<TypeConstraintError> for SetUserRoleFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<SetUserRoleForm> for SetUserRoleFormPayload {
    type Error = SetUserRoleFormError;

    fn try_from(value: SetUserRoleForm) -> Result<Self, Self::Error> {
        Ok(Self {
            role: UserRole::try_from(value.role)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        let payload = SetUserRoleFormPayload::try_from(SetUserRoleForm {
            role: "superuser".into(),
        })
        .unwrap();
        assert_eq!(payload.role, UserRole::Superuser);
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(
            SetUserRoleFormPayload::try_from(SetUserRoleForm {
                role: "wizard".into(),
            })
            .is_err()
        );
    }
}
