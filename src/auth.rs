//! Session-backed authentication.
//!
//! Login serializes the signed-in user's claims into the identity cookie;
//! extraction deserializes them without touching the database. Role changes
//! therefore take effect at the next login, which is all the admin area
//! requires.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::UserProfile;

/// Claims carried in the identity cookie for the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.get(),
            email: profile.email.as_str().to_string(),
            name: profile.full_name(),
            role: profile.role.as_str().to_string(),
        }
    }

    /// Validated owner identifier for repository calls.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        UserId::new(self.id)
    }

    /// Serialized claims handed to `Identity::login`.
    pub fn to_claims(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Rejection produced when a protected route is hit without a session.
#[derive(Debug, Error)]
#[error("authentication required")]
pub struct AuthenticationRequired;

impl ResponseError for AuthenticationRequired {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/login"))
            .finish()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let claims = Identity::from_request(req, payload)
            .into_inner()
            .ok()
            .and_then(|identity| identity.id().ok())
            .and_then(|raw| serde_json::from_str(&raw).ok());

        ready(claims.ok_or_else(|| AuthenticationRequired.into()))
    }
}

/// Whether the user's role satisfies `required`.
pub fn check_role(required: &str, role: &str) -> bool {
    role == required
}

/// Guard used at route level: redirects to `redirect_to` (or returns 401)
/// when the role requirement is not met.
pub fn ensure_role(
    user: &AuthenticatedUser,
    required: &str,
    redirect_to: Option<&str>,
) -> Result<(), HttpResponse> {
    if check_role(required, &user.role) {
        return Ok(());
    }
    match redirect_to {
        Some(location) => Err(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, location.to_string()))
            .finish()),
        None => Err(HttpResponse::Unauthorized().finish()),
    }
}
