use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::build::{Build as DomainBuild, NewBuild as DomainNewBuild};
use crate::domain::types::{
    BuildName, Category, ComponentPrice, ComponentSlug, TypeConstraintError,
};

/// Diesel model representing a row in the `builds` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::builds)]
pub struct Build {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    /// Category → slug-list map serialized as JSON text.
    pub components: String,
    pub total_price: f64,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Build`] used for creating new rows.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::builds)]
pub struct NewBuild {
    pub user_id: i32,
    pub name: String,
    pub components: String,
    pub total_price: f64,
    pub created_at: NaiveDateTime,
}

fn parse_components(
    raw: &str,
) -> Result<BTreeMap<Category, Vec<ComponentSlug>>, TypeConstraintError> {
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("build components json: {e}")))
}

impl TryFrom<Build> for DomainBuild {
    type Error = TypeConstraintError;

    fn try_from(build: Build) -> Result<Self, Self::Error> {
        Ok(Self {
            id: build.id.try_into()?,
            user_id: build.user_id.try_into()?,
            name: BuildName::new(build.name)?,
            components: parse_components(&build.components)?,
            total_price: ComponentPrice::new(build.total_price)?,
            created_at: build.created_at,
        })
    }
}

impl TryFrom<DomainNewBuild> for NewBuild {
    type Error = TypeConstraintError;

    fn try_from(build: DomainNewBuild) -> Result<Self, Self::Error> {
        let components = serde_json::to_string(&build.components)
            .map_err(|e| TypeConstraintError::InvalidValue(format!("build components: {e}")))?;
        Ok(Self {
            user_id: build.user_id.get(),
            name: build.name.into_inner(),
            components,
            total_price: build.total_price.get(),
            created_at: build.created_at,
        })
    }
}
