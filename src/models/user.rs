use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{
    Email, TypeConstraintError, UserFirstName, UserLastName, UserRole, UserStatus,
};
use crate::domain::user::{NewUser as DomainNewUser, UserProfile};

/// Diesel model representing a row in the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`User`] used for registration.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<User> for UserProfile {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: user.id.try_into()?,
            email: Email::new(user.email)?,
            first_name: UserFirstName::new(user.first_name)?,
            last_name: UserLastName::new(user.last_name)?,
            role: UserRole::try_from(user.role)?,
            status: UserStatus::try_from(user.status)?,
            created_at: user.created_at,
        })
    }
}

impl From<DomainNewUser> for NewUser {
    fn from(user: DomainNewUser) -> Self {
        Self {
            email: user.email.into_inner(),
            password_hash: user.password_hash,
            first_name: user.first_name.into_inner(),
            last_name: user.last_name.into_inner(),
            role: user.role.as_str().to_string(),
            status: user.status.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
