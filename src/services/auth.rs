use crate::auth::AuthenticatedUser;
use crate::domain::types::UserStatus;
use crate::forms::auth::{LoginFormPayload, RegisterFormPayload};
use crate::repository::{UserReader, UserWriter};

use super::{ServiceError, ServiceResult};

const BAD_CREDENTIALS: &str = "Correo o contraseña incorrectos";

/// Verifies credentials and produces the session claims.
///
/// Wrong email and wrong password produce the same message on purpose.
pub fn login<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader,
{
    let hash = match repo.get_password_hash(&payload.email) {
        Ok(Some(hash)) => hash,
        Ok(None) => return Err(ServiceError::Form(BAD_CREDENTIALS.to_string())),
        Err(e) => {
            log::error!("Failed to load password hash: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match bcrypt::verify(&payload.password, &hash) {
        Ok(true) => {}
        Ok(false) => return Err(ServiceError::Form(BAD_CREDENTIALS.to_string())),
        Err(e) => {
            log::error!("Password verification failed: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let profile = match repo.get_user_by_email(&payload.email) {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(ServiceError::Form(BAD_CREDENTIALS.to_string())),
        Err(e) => {
            log::error!("Failed to load user profile: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if profile.status != UserStatus::Active {
        return Err(ServiceError::Form(
            "Tu cuenta está suspendida".to_string(),
        ));
    }

    Ok(AuthenticatedUser::from_profile(&profile))
}

/// Registers a new customer account and produces the session claims.
pub fn register<R>(payload: RegisterFormPayload, repo: &R) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + UserWriter,
{
    match repo.get_user_by_email(&payload.email) {
        Ok(Some(_)) => {
            return Err(ServiceError::Form(
                "Ya existe una cuenta con ese correo".to_string(),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check existing account: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let password_hash = match bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("Password hashing failed: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let email = payload.email.clone();
    let new_user = payload.into_new_user(password_hash);
    if let Err(e) = repo.create_user(&new_user) {
        log::error!("Failed to create user: {e}");
        return Err(ServiceError::Internal);
    }

    match repo.get_user_by_email(&email) {
        Ok(Some(profile)) => Ok(AuthenticatedUser::from_profile(&profile)),
        Ok(None) => {
            log::error!("Created user not found by email");
            Err(ServiceError::Internal)
        }
        Err(e) => {
            log::error!("Failed to reload created user: {e}");
            Err(ServiceError::Internal)
        }
    }
}
