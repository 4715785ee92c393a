use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BrandName, Category, ComponentDescription, ComponentId, ComponentName, ComponentPrice,
    ComponentSku, ComponentSlug, ImageUrl, OfferUrl, StockCount, StoreId,
};

/// A purchasable PC part in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    pub slug: ComponentSlug,
    pub name: ComponentName,
    pub sku: ComponentSku,
    pub brand: BrandName,
    pub category: Category,
    pub description: Option<ComponentDescription>,
    pub image_url: ImageUrl,
    /// Reference price used when no store offer has been recorded yet.
    pub price: ComponentPrice,
    pub stock: StockCount,
    pub specs: BTreeMap<String, String>,
    pub prices: Vec<PriceEntry>,
    pub price_history: Vec<PriceHistoryPoint>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Component`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct NewComponent {
    pub slug: ComponentSlug,
    pub name: ComponentName,
    pub sku: ComponentSku,
    pub brand: BrandName,
    pub category: Category,
    pub description: Option<ComponentDescription>,
    pub image_url: ImageUrl,
    pub price: ComponentPrice,
    pub stock: StockCount,
    pub specs: BTreeMap<String, String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One store's advertised price for a component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceEntry {
    pub store_id: StoreId,
    pub price: ComponentPrice,
    pub url: OfferUrl,
}

/// One day's recorded price pair; used only for trend display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceHistoryPoint {
    pub date: NaiveDate,
    pub normal_price: ComponentPrice,
    pub offer_price: ComponentPrice,
}

impl Component {
    /// Minimum advertised price across all store offers, 0 when none exist.
    ///
    /// Strict `<` keeps the first minimum encountered on ties.
    pub fn best_price(&self) -> f64 {
        self.prices
            .iter()
            .fold(None::<f64>, |min, entry| match min {
                Some(current) if entry.price.get() < current => Some(entry.price.get()),
                Some(current) => Some(current),
                None => Some(entry.price.get()),
            })
            .unwrap_or(0.0)
    }

    /// The offer carrying [`Component::best_price`], if any offer exists.
    pub fn best_price_entry(&self) -> Option<&PriceEntry> {
        self.prices
            .iter()
            .fold(None::<&PriceEntry>, |best, entry| match best {
                Some(current) if entry.price.get() < current.price.get() => Some(entry),
                Some(current) => Some(current),
                None => Some(entry),
            })
    }
}
