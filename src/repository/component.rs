use diesel::prelude::*;

use crate::db::DbConnection;
use crate::domain::component::{
    Component, NewComponent, PriceEntry, PriceHistoryPoint,
};
use crate::domain::types::{ComponentId, ComponentSlug};
use crate::models::component::{
    Component as DbComponent, ComponentChangeset, NewComponent as DbNewComponent,
    NewPriceEntry as DbNewPriceEntry, NewPriceHistoryPoint as DbNewPriceHistoryPoint,
    PriceEntry as DbPriceEntry, PriceHistoryPoint as DbPriceHistoryPoint,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ComponentListQuery, ComponentReader, ComponentSort, ComponentWriter, DieselRepository,
};

/// Loads price entries and trend points for a page of component rows and
/// assembles domain components.
fn attach_relations(
    conn: &mut DbConnection,
    rows: Vec<DbComponent>,
) -> RepositoryResult<Vec<Component>> {
    use crate::schema::price_history;

    let entries = DbPriceEntry::belonging_to(&rows)
        .load::<DbPriceEntry>(conn)?
        .grouped_by(&rows);
    let history = DbPriceHistoryPoint::belonging_to(&rows)
        .order(price_history::recorded_on.asc())
        .load::<DbPriceHistoryPoint>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(entries)
        .zip(history)
        .map(|((component, prices), points)| {
            Component::try_from((component, prices, points)).map_err(Into::into)
        })
        .collect()
}

impl ComponentReader for DieselRepository {
    fn list_components(
        &self,
        query: ComponentListQuery,
    ) -> RepositoryResult<(usize, Vec<Component>)> {
        use crate::schema::components;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = components::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(category) = query.category {
                items = items.filter(components::category.eq(category.as_str()));
            }

            if let Some(brand) = &query.brand {
                items = items.filter(components::brand.eq(brand));
            }

            if let Some(search) = &query.search {
                let pattern = format!("%{}%", search.trim());
                items = items.filter(
                    components::name
                        .like(pattern.clone())
                        .or(components::sku.like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        items = match query.sort {
            ComponentSort::NameAsc => items.order(components::name.asc()),
            ComponentSort::NameDesc => items.order(components::name.desc()),
            ComponentSort::PriceAsc => items.order(components::price.asc()),
            ComponentSort::PriceDesc => items.order(components::price.desc()),
        };

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbComponent>(&mut conn)?;
        let items = attach_relations(&mut conn, rows)?;

        Ok((total, items))
    }

    fn get_component_by_id(&self, id: ComponentId) -> RepositoryResult<Option<Component>> {
        use crate::schema::components;

        let mut conn = self.conn()?;

        let row = components::table
            .filter(components::id.eq(id.get()))
            .first::<DbComponent>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(attach_relations(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn get_component_by_slug(&self, slug: &ComponentSlug) -> RepositoryResult<Option<Component>> {
        use crate::schema::components;

        let mut conn = self.conn()?;

        let row = components::table
            .filter(components::slug.eq(slug.as_str()))
            .first::<DbComponent>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(attach_relations(&mut conn, vec![row])?.pop()),
            None => Ok(None),
        }
    }

    fn get_components_by_slugs(
        &self,
        slugs: &[ComponentSlug],
    ) -> RepositoryResult<Vec<Component>> {
        use crate::schema::components;

        if slugs.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;

        let raw: Vec<&str> = slugs.iter().map(ComponentSlug::as_str).collect();
        let rows = components::table
            .filter(components::slug.eq_any(raw))
            .load::<DbComponent>(&mut conn)?;

        attach_relations(&mut conn, rows)
    }

    fn list_brands(&self) -> RepositoryResult<Vec<String>> {
        use crate::schema::components;

        let mut conn = self.conn()?;

        Ok(components::table
            .select(components::brand)
            .distinct()
            .order(components::brand.asc())
            .load::<String>(&mut conn)?)
    }
}

impl ComponentWriter for DieselRepository {
    fn create_component(&self, component: &NewComponent) -> RepositoryResult<usize> {
        use crate::schema::components;

        let mut conn = self.conn()?;
        let db_component: DbNewComponent = component.clone().into();

        let affected = diesel::insert_into(components::table)
            .values(db_component)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn update_component(
        &self,
        id: ComponentId,
        component: &NewComponent,
    ) -> RepositoryResult<usize> {
        use crate::schema::components;

        let mut conn = self.conn()?;
        let db_component: DbNewComponent = component.clone().into();
        let changeset = ComponentChangeset {
            name: db_component.name,
            sku: db_component.sku,
            brand: db_component.brand,
            category: db_component.category,
            description: db_component.description,
            image_url: db_component.image_url,
            price: db_component.price,
            stock: db_component.stock,
            specs: db_component.specs,
            updated_at: db_component.updated_at,
        };

        let affected = diesel::update(components::table.filter(components::id.eq(id.get())))
            .set(changeset)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_component(&self, id: ComponentId) -> RepositoryResult<usize> {
        use crate::schema::{components, price_entries, price_history};

        let mut conn = self.conn()?;

        let affected = conn.transaction(|conn| {
            diesel::delete(price_entries::table.filter(price_entries::component_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(price_history::table.filter(price_history::component_id.eq(id.get())))
                .execute(conn)?;
            diesel::delete(components::table.filter(components::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }

    fn add_price_entries(
        &self,
        id: ComponentId,
        entries: &[PriceEntry],
    ) -> RepositoryResult<usize> {
        use crate::schema::price_entries;

        if entries.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        let rows: Vec<DbNewPriceEntry> = entries
            .iter()
            .map(|entry| DbNewPriceEntry {
                component_id: id.get(),
                store_id: entry.store_id.as_str().to_string(),
                price: entry.price.get(),
                url: entry.url.as_str().to_string(),
            })
            .collect();

        let affected = diesel::insert_into(price_entries::table)
            .values(rows)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn append_price_history(
        &self,
        id: ComponentId,
        point: &PriceHistoryPoint,
    ) -> RepositoryResult<usize> {
        use crate::schema::price_history;

        let mut conn = self.conn()?;

        let row = DbNewPriceHistoryPoint {
            component_id: id.get(),
            recorded_on: point.date,
            normal_price: point.normal_price.get(),
            offer_price: point.offer_price.get(),
        };

        let affected = diesel::insert_into(price_history::table)
            .values(row)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
