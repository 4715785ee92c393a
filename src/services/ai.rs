use chrono::Utc;
use serde::Serialize;

use crate::ADMIN_ROLE;
use crate::ai::client::CompletionClient;
use crate::ai::flows::build_pc::build_pc;
use crate::ai::flows::compatibility::{
    CompatiblePartsInput, CompatiblePartsOutput, get_compatible_parts,
};
use crate::ai::flows::find_prices::{DiscoveredPrice, find_prices};
use crate::ai::flows::product_details::{ProductDetails, get_product_details};
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::component::{Component, PriceEntry, PriceHistoryPoint};
use crate::domain::types::{Category, ComponentId, ComponentPrice, OfferUrl, StoreId};
use crate::repository::{ComponentListQuery, ComponentReader, ComponentWriter};

use super::{ServiceError, ServiceResult};

/// One slot of an AI-generated build, resolved against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct AiBuildLine {
    pub category: Category,
    pub label: &'static str,
    pub component: Component,
}

/// The AI builder's answer prepared for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct AiBuildSuggestion {
    pub lines: Vec<AiBuildLine>,
    pub total_price: f64,
}

/// Generates a complete build from a free-text description.
///
/// Suggested slugs that do not resolve against the catalog are skipped, the
/// same way the storefront skips stale slugs elsewhere.
pub async fn generate_build<R, C>(
    description: &str,
    repo: &R,
    client: &C,
) -> ServiceResult<AiBuildSuggestion>
where
    R: ComponentReader,
    C: CompletionClient,
{
    let description = description.trim();
    if description.is_empty() {
        return Err(ServiceError::Form(
            "Por favor, describe la PC que quieres construir".to_string(),
        ));
    }

    let (_total, catalog) = match repo.list_components(ComponentListQuery::default()) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to load catalog for AI builder: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let output = match build_pc(client, &catalog, description).await {
        Ok(output) => output,
        Err(e) => {
            log::error!("Build generation flow failed: {e}");
            return Err(ServiceError::Ai(e.to_string()));
        }
    };

    let lines: Vec<AiBuildLine> = output
        .build
        .slugs()
        .into_iter()
        .filter_map(|(category, slug)| {
            catalog
                .iter()
                .find(|c| c.slug.as_str() == slug && c.category == category)
                .map(|component| AiBuildLine {
                    category,
                    label: category.label(),
                    component: component.clone(),
                })
        })
        .collect();

    let total_price = lines.iter().map(|line| line.component.best_price()).sum();

    Ok(AiBuildSuggestion { lines, total_price })
}

/// Runs the compatibility-suggestion flow for a named component.
pub async fn check_compatibility<C>(
    input: CompatiblePartsInput,
    client: &C,
) -> ServiceResult<CompatiblePartsOutput>
where
    C: CompletionClient,
{
    if input.component_type.trim().is_empty() || input.component_name.trim().is_empty() {
        return Err(ServiceError::Form(
            "Indica el tipo y el nombre del componente".to_string(),
        ));
    }

    match get_compatible_parts(client, &input).await {
        Ok(output) => Ok(output),
        Err(e) => {
            log::error!("Compatibility flow failed: {e}");
            Err(ServiceError::Ai(e.to_string()))
        }
    }
}

/// Converts discovered offers into price entries, dropping any whose URL is
/// already attached to the component (or repeated within the batch).
pub fn merge_discovered_prices(
    existing: &[PriceEntry],
    discovered: Vec<DiscoveredPrice>,
) -> Vec<PriceEntry> {
    let mut seen: Vec<String> = existing
        .iter()
        .map(|entry| entry.url.as_str().to_string())
        .collect();

    discovered
        .into_iter()
        .filter_map(|price| {
            if seen.contains(&price.url) {
                return None;
            }

            let store_id = StoreId::new(price.store_id).ok()?;
            let amount = ComponentPrice::new(price.price).ok()?;
            let url = match OfferUrl::new(price.url) {
                Ok(url) => url,
                Err(e) => {
                    log::warn!("Dropping discovered price with invalid url: {e}");
                    return None;
                }
            };

            seen.push(url.as_str().to_string());
            Some(PriceEntry {
                store_id,
                price: amount,
                url,
            })
        })
        .collect()
}

/// Discovers store offers for a catalog component and merges the new ones.
///
/// Appends a trend point whenever at least one offer was added. Returns the
/// number of offers merged.
pub async fn discover_prices<R, C>(
    component_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
    client: &C,
) -> ServiceResult<usize>
where
    R: ComponentReader + ComponentWriter,
    C: CompletionClient,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let component_id = match ComponentId::new(component_id) {
        Ok(component_id) => component_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    let component = match repo.get_component_by_id(component_id) {
        Ok(Some(component)) => component,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get component: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let output = match find_prices(client, component.name.as_str()).await {
        Ok(output) => output,
        Err(e) => {
            log::error!("Price discovery flow failed: {e}");
            return Err(ServiceError::Ai(e.to_string()));
        }
    };

    let merged = merge_discovered_prices(&component.prices, output.prices);
    if merged.is_empty() {
        return Ok(0);
    }

    let added = match repo.add_price_entries(component_id, &merged) {
        Ok(added) => added,
        Err(e) => {
            log::error!("Failed to store discovered prices: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let offer = merged
        .iter()
        .map(|entry| entry.price.get())
        .fold(f64::INFINITY, f64::min);
    let point = PriceHistoryPoint {
        date: Utc::now().date_naive(),
        normal_price: component.price,
        offer_price: ComponentPrice::new(offer)?,
    };
    if let Err(e) = repo.append_price_history(component_id, &point) {
        log::error!("Failed to append price history point: {e}");
    }

    Ok(added)
}

/// Runs the product-detail enrichment flow for the admin catalog form.
pub async fn enrich_product<C>(
    product_name: &str,
    user: &AuthenticatedUser,
    client: &C,
) -> ServiceResult<ProductDetails>
where
    C: CompletionClient,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(ServiceError::Form(
            "Indica el nombre del producto".to_string(),
        ));
    }

    match get_product_details(client, product_name).await {
        Ok(details) => Ok(details),
        Err(e) => {
            log::error!("Product enrichment flow failed: {e}");
            Err(ServiceError::Ai(e.to_string()))
        }
    }
}
