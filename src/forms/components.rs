use std::collections::BTreeMap;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::component::NewComponent;
use crate::domain::types::{
    BrandName, Category, ComponentDescription, ComponentName, ComponentPrice, ComponentSku,
    ComponentSlug, ImageUrl, StockCount, TypeConstraintError,
};

/// Image used until a real product shot is attached.
const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/seed/default/600/600";

#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 3))]
    pub name: String,
    #[validate(length(min = 1))]
    pub sku: String,
    #[validate(length(min = 2))]
    pub brand: String,
    #[validate(length(min = 2))]
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    pub stock: i32,
    /// Optional JSON object of spec key/value pairs.
    pub specs: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFormPayload {
    pub name: ComponentName,
    pub sku: ComponentSku,
    pub brand: BrandName,
    pub category: Category,
    pub description: Option<ComponentDescription>,
    pub image_url: ImageUrl,
    pub price: ComponentPrice,
    pub stock: StockCount,
    pub specs: BTreeMap<String, String>,
}

impl ProductFormPayload {
    /// Builds the catalog row; the slug derives from the display name.
    pub fn into_new_component(self) -> Result<NewComponent, TypeConstraintError> {
        let now = Utc::now().naive_utc();
        Ok(NewComponent {
            slug: ComponentSlug::from_name(self.name.as_str())?,
            name: self.name,
            sku: self.sku,
            brand: self.brand,
            category: self.category,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            stock: self.stock,
            specs: self.specs,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("Product form validation failed: {0}")]
    Validation(String),
    #[error("Product form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Product specs must be a JSON object of strings: {0}")]
    SpecsJson(String),
}

impl From<ValidationErrors> for ProductFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ProductFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn parse_specs(raw: Option<&str>) -> Result<BTreeMap<String, String>, ProductFormError> {
    let Some(raw) = raw else {
        return Ok(BTreeMap::new());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(trimmed).map_err(|e| ProductFormError::SpecsJson(e.to_string()))
}

impl TryFrom<ProductForm> for ProductFormPayload {
    type Error = ProductFormError;

    fn try_from(value: ProductForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let description = match value.description {
            Some(d) if !d.trim().is_empty() => Some(ComponentDescription::new(d)?),
            _ => None,
        };
        let image_url = match value.image_url {
            Some(url) if !url.trim().is_empty() => ImageUrl::new(url)?,
            _ => ImageUrl::new(PLACEHOLDER_IMAGE)?,
        };

        Ok(Self {
            name: ComponentName::new(value.name)?,
            sku: ComponentSku::new(value.sku)?,
            brand: BrandName::new(value.brand)?,
            category: Category::try_from(value.category)?,
            description,
            image_url,
            price: ComponentPrice::new(value.price)?,
            stock: StockCount::new(value.stock)?,
            specs: parse_specs(value.specs.as_deref())?,
        })
    }
}
