use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    Email, TypeConstraintError, UserFirstName, UserLastName, UserRole, UserStatus,
};
use crate::domain::user::NewUser;

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub email: Email,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum LoginFormError {
    #[error("Login form validation failed: {0}")]
    Validation(String),
    #[error("Login form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for LoginFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for LoginFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = LoginFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            email: Email::new(value.email)?,
            password: value.password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterFormPayload {
    pub first_name: UserFirstName,
    pub last_name: UserLastName,
    pub email: Email,
    pub password: String,
}

impl RegisterFormPayload {
    /// Builds the account row; the caller supplies the password hash so the
    /// form layer stays free of crypto.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            email: self.email,
            password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            role: UserRole::Customer,
            status: UserStatus::Active,
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterFormError {
    #[error("Register form validation failed: {0}")]
    Validation(String),
    #[error("Register form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RegisterFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RegisterFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RegisterForm> for RegisterFormPayload {
    type Error = RegisterFormError;

    fn try_from(value: RegisterForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            first_name: UserFirstName::new(value.first_name)?,
            last_name: UserLastName::new(value.last_name)?,
            email: Email::new(value.email)?,
            password: value.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_rejects_bad_email() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        assert!(LoginFormPayload::try_from(form).is_err());
    }

    #[test]
    fn register_form_requires_eight_char_password() {
        let form = RegisterForm {
            first_name: "Ana".into(),
            last_name: "Rojas".into(),
            email: "ana@example.com".into(),
            password: "short".into(),
        };
        assert!(RegisterFormPayload::try_from(form).is_err());
    }

    #[test]
    fn register_payload_builds_customer_account() {
        let form = RegisterForm {
            first_name: "Ana".into(),
            last_name: "Rojas".into(),
            email: "ana@example.com".into(),
            password: "supersecret".into(),
        };
        let payload = RegisterFormPayload::try_from(form).unwrap();
        let user = payload.into_new_user("hash".into());
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(user.status, UserStatus::Active);
    }
}
