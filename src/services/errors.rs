use thiserror::Error;

use crate::ai::client::AiError;
use crate::domain::types::TypeConstraintError;
use crate::forms::auth::{LoginFormError, RegisterFormError};
use crate::forms::builds::BuildFormError;
use crate::forms::components::ProductFormError;
use crate::forms::users::SetUserRoleFormError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The user is not authorized to perform the operation.
    #[error("unauthorized")]
    Unauthorized,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// User input failed validation; the message is shown to the user.
    #[error("{0}")]
    Form(String),
    /// An AI flow produced no usable output.
    #[error("AI flow failed: {0}")]
    Ai(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TypeConstraintError> for ServiceError {
    fn from(value: TypeConstraintError) -> Self {
        Self::Form(value.to_string())
    }
}

impl From<AiError> for ServiceError {
    fn from(value: AiError) -> Self {
        Self::Ai(value.to_string())
    }
}

impl From<LoginFormError> for ServiceError {
    fn from(value: LoginFormError) -> Self {
        Self::Form(value.to_string())
    }
}

impl From<RegisterFormError> for ServiceError {
    fn from(value: RegisterFormError) -> Self {
        Self::Form(value.to_string())
    }
}

impl From<BuildFormError> for ServiceError {
    fn from(value: BuildFormError) -> Self {
        Self::Form(value.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(value: ProductFormError) -> Self {
        Self::Form(value.to_string())
    }
}

impl From<SetUserRoleFormError> for ServiceError {
    fn from(value: SetUserRoleFormError) -> Self {
        Self::Form(value.to_string())
    }
}
