//! Store-price discovery flow.

use serde::Deserialize;

use crate::ai::client::{AiError, CompletionClient};
use crate::ai::{parse, prompt};
use crate::domain::store::is_known_store;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPrice {
    pub store_id: String,
    pub price: f64,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FindPricesOutput {
    pub prices: Vec<DiscoveredPrice>,
}

/// Asks the model for current store offers on `product_name`.
///
/// Offers pointing at stores outside the registry are dropped; the schema
/// constrains `storeId` to known identifiers.
pub async fn find_prices<C: CompletionClient>(
    client: &C,
    product_name: &str,
) -> Result<FindPricesOutput, AiError> {
    let system = prompt::find_prices_system();
    let user = prompt::find_prices_user(product_name);
    let raw = client.complete(&system, &user).await?;
    let mut output: FindPricesOutput = parse::parse_json_output(&raw)?;

    output.prices.retain(|price| {
        let known = is_known_store(&price.store_id);
        if !known {
            log::warn!(
                "Dropping discovered price for unknown store '{}'",
                price.store_id
            );
        }
        known
    });

    Ok(output)
}
