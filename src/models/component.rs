use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::component::{
    Component as DomainComponent, NewComponent as DomainNewComponent,
    PriceEntry as DomainPriceEntry, PriceHistoryPoint as DomainPriceHistoryPoint,
};
use crate::domain::types::{
    BrandName, Category, ComponentDescription, ComponentName, ComponentPrice, ComponentSku,
    ComponentSlug, ImageUrl, OfferUrl, StockCount, StoreId, TypeConstraintError,
};

/// Diesel model representing a row in the `components` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::components)]
pub struct Component {
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub sku: String,
    pub brand: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: f64,
    pub stock: i32,
    /// Free-form spec map serialized as JSON text.
    pub specs: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Component`] used for creating new rows.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::components)]
pub struct NewComponent {
    pub slug: String,
    pub name: String,
    pub sku: String,
    pub brand: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: f64,
    pub stock: i32,
    pub specs: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Editable column set for admin updates; the slug stays immutable so saved
/// builds keep resolving. A `None` description clears the stored value.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::components)]
#[diesel(treat_none_as_null = true)]
pub struct ComponentChangeset {
    pub name: String,
    pub sku: String,
    pub brand: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: f64,
    pub stock: i32,
    pub specs: String,
    pub updated_at: NaiveDateTime,
}

/// Diesel model representing a row in the `price_entries` table.
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Component))]
#[diesel(table_name = crate::schema::price_entries)]
pub struct PriceEntry {
    pub id: i32,
    pub component_id: i32,
    pub store_id: String,
    pub price: f64,
    pub url: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::price_entries)]
pub struct NewPriceEntry {
    pub component_id: i32,
    pub store_id: String,
    pub price: f64,
    pub url: String,
}

/// Diesel model representing a row in the `price_history` table.
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Component))]
#[diesel(table_name = crate::schema::price_history)]
pub struct PriceHistoryPoint {
    pub id: i32,
    pub component_id: i32,
    pub recorded_on: NaiveDate,
    pub normal_price: f64,
    pub offer_price: f64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::price_history)]
pub struct NewPriceHistoryPoint {
    pub component_id: i32,
    pub recorded_on: NaiveDate,
    pub normal_price: f64,
    pub offer_price: f64,
}

fn parse_specs(raw: &str) -> Result<BTreeMap<String, String>, TypeConstraintError> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("specs json: {e}")))
}

impl TryFrom<PriceEntry> for DomainPriceEntry {
    type Error = TypeConstraintError;

    fn try_from(entry: PriceEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            store_id: StoreId::new(entry.store_id)?,
            price: ComponentPrice::new(entry.price)?,
            url: OfferUrl::new(entry.url)?,
        })
    }
}

impl TryFrom<PriceHistoryPoint> for DomainPriceHistoryPoint {
    type Error = TypeConstraintError;

    fn try_from(point: PriceHistoryPoint) -> Result<Self, Self::Error> {
        Ok(Self {
            date: point.recorded_on,
            normal_price: ComponentPrice::new(point.normal_price)?,
            offer_price: ComponentPrice::new(point.offer_price)?,
        })
    }
}

impl TryFrom<(Component, Vec<PriceEntry>, Vec<PriceHistoryPoint>)> for DomainComponent {
    type Error = TypeConstraintError;

    fn try_from(
        (component, prices, history): (Component, Vec<PriceEntry>, Vec<PriceHistoryPoint>),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: component.id.try_into()?,
            slug: ComponentSlug::new(component.slug)?,
            name: ComponentName::new(component.name)?,
            sku: ComponentSku::new(component.sku)?,
            brand: BrandName::new(component.brand)?,
            category: Category::try_from(component.category)?,
            description: component
                .description
                .map(ComponentDescription::new)
                .transpose()?,
            image_url: ImageUrl::new(component.image_url)?,
            price: ComponentPrice::new(component.price)?,
            stock: StockCount::new(component.stock)?,
            specs: parse_specs(&component.specs)?,
            prices: prices
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
            price_history: history
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
            created_at: component.created_at,
            updated_at: component.updated_at,
        })
    }
}

impl From<DomainNewComponent> for NewComponent {
    fn from(component: DomainNewComponent) -> Self {
        let specs = serde_json::to_string(&component.specs).unwrap_or_else(|_| "{}".to_string());
        Self {
            slug: component.slug.into_inner(),
            name: component.name.into_inner(),
            sku: component.sku.into_inner(),
            brand: component.brand.into_inner(),
            category: component.category.as_str().to_string(),
            description: component.description.map(ComponentDescription::into_inner),
            image_url: component.image_url.into_inner(),
            price: component.price.get(),
            stock: component.stock.get(),
            specs,
            created_at: component.created_at,
            updated_at: component.updated_at,
        }
    }
}
