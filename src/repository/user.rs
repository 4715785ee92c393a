use diesel::prelude::*;

use crate::domain::types::{Email, UserId, UserRole};
use crate::domain::user::{NewUser, UserProfile};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserListQuery, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<UserProfile>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let query_builder = || users::table.into_boxed::<diesel::sqlite::Sqlite>();

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order(users::created_at.asc())
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<UserProfile>, _>>()?;

        Ok((total, items))
    }

    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<UserProfile>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<UserProfile>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_password_hash(&self, email: &Email) -> RepositoryResult<Option<String>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        Ok(users::table
            .filter(users::email.eq(email.as_str()))
            .select(users::password_hash)
            .first::<String>(&mut conn)
            .optional()?)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.clone().into();

        let affected = diesel::insert_into(users::table)
            .values(db_user)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_user_role(&self, id: UserId, role: UserRole) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let affected = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(users::role.eq(role.as_str()))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
