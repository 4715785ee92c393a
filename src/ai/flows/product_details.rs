//! Product-detail enrichment flow used by the admin catalog form.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::ai::client::{AiError, CompletionClient};
use crate::ai::{parse, prompt};
use crate::domain::types::Category;

/// Enrichment category set: the seven slots plus the two overflow buckets
/// the model may answer with.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum DetailedCategory {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "Motherboard")]
    Motherboard,
    #[serde(rename = "RAM")]
    Ram,
    #[serde(rename = "Storage")]
    Storage,
    #[serde(rename = "Power Supply")]
    PowerSupply,
    #[serde(rename = "Case")]
    Case,
    Cooling,
    Other,
}

impl DetailedCategory {
    /// Maps into the seven-slot catalog set; `Cooling`/`Other` have no slot
    /// and the admin form reports them back to the operator.
    pub fn as_slot(self) -> Option<Category> {
        match self {
            Self::Cpu => Some(Category::Cpu),
            Self::Gpu => Some(Category::Gpu),
            Self::Motherboard => Some(Category::Motherboard),
            Self::Ram => Some(Category::Ram),
            Self::Storage => Some(Category::Storage),
            Self::PowerSupply => Some(Category::PowerSupply),
            Self::Case => Some(Category::Case),
            Self::Cooling | Self::Other => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub sku: String,
    pub brand: String,
    pub category: DetailedCategory,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub stock: i32,
    pub specs: BTreeMap<String, serde_json::Value>,
}

impl ProductDetails {
    /// Spec values flattened to strings for the catalog's spec map.
    pub fn specs_as_strings(&self) -> BTreeMap<String, String> {
        self.specs
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect()
    }
}

/// Asks the model for a structured catalog entry for `product_name`.
pub async fn get_product_details<C: CompletionClient>(
    client: &C,
    product_name: &str,
) -> Result<ProductDetails, AiError> {
    let system = prompt::product_details_system();
    let user = prompt::product_details_user(product_name);
    let raw = client.complete(&system, &user).await?;
    parse::parse_json_output(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::StubClient;

    #[actix_web::test]
    async fn parses_details_and_flattens_numeric_specs() {
        let client = StubClient {
            response: r#"{"sku":"BX8071513900K","brand":"Intel","category":"CPU",
"description":"CPU tope de línea","imageUrl":"https://example.com/i9.jpg",
"price":589990,"stock":50,"specs":{"Socket":"LGA1700","Cores":24}}"#
                .to_string(),
        };

        let details = get_product_details(&client, "Intel Core i9-13900K")
            .await
            .unwrap();
        assert_eq!(details.category.as_slot(), Some(Category::Cpu));
        let specs = details.specs_as_strings();
        assert_eq!(specs.get("Cores").map(String::as_str), Some("24"));
        assert_eq!(specs.get("Socket").map(String::as_str), Some("LGA1700"));
    }

    #[actix_web::test]
    async fn cooling_maps_to_no_slot() {
        let client = StubClient {
            response: r#"{"sku":"X","brand":"Noctua","category":"Cooling",
"description":"Disipador","imageUrl":"https://example.com/nh.jpg",
"price":99990,"stock":10,"specs":{}}"#
                .to_string(),
        };

        let details = get_product_details(&client, "Noctua NH-D15").await.unwrap();
        assert_eq!(details.category.as_slot(), None);
    }
}
