use diesel::prelude::*;

use crate::domain::build::{Build, NewBuild};
use crate::domain::types::{BuildId, UserId};
use crate::models::build::{Build as DbBuild, NewBuild as DbNewBuild};
use crate::repository::errors::RepositoryResult;
use crate::repository::{BuildListQuery, BuildReader, BuildWriter, DieselRepository};

impl BuildReader for DieselRepository {
    fn list_builds(&self, query: BuildListQuery) -> RepositoryResult<(usize, Vec<Build>)> {
        use crate::schema::builds;

        let mut conn = self.conn()?;

        let query_builder = || {
            builds::table
                .filter(builds::user_id.eq(query.user_id.get()))
                .into_boxed::<diesel::sqlite::Sqlite>()
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order(builds::created_at.desc())
            .load::<DbBuild>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Build>, _>>()?;

        Ok((total, items))
    }

    fn get_build_by_id(&self, id: BuildId, user_id: UserId) -> RepositoryResult<Option<Build>> {
        use crate::schema::builds;

        let mut conn = self.conn()?;

        let build = builds::table
            .filter(builds::id.eq(id.get()))
            .filter(builds::user_id.eq(user_id.get()))
            .first::<DbBuild>(&mut conn)
            .optional()?;

        let build = build.map(TryInto::try_into).transpose()?;
        Ok(build)
    }
}

impl BuildWriter for DieselRepository {
    fn create_build(&self, build: &NewBuild) -> RepositoryResult<usize> {
        use crate::schema::builds;

        let mut conn = self.conn()?;
        let db_build: DbNewBuild = build.clone().try_into()?;

        let affected = diesel::insert_into(builds::table)
            .values(db_build)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_build(&self, id: BuildId, user_id: UserId) -> RepositoryResult<usize> {
        use crate::schema::builds;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            builds::table
                .filter(builds::id.eq(id.get()))
                .filter(builds::user_id.eq(user_id.get())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }
}
