use serde::Deserialize;

use crate::domain::component::Component;
use crate::domain::types::Category;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{ComponentListQuery, ComponentReader};

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the `api_v1_components` endpoint.
#[derive(Deserialize, Debug)]
pub struct ApiV1ComponentsQueryParams {
    pub query: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

/// Core business logic for the `/api/v1/components` endpoint.
///
/// Returns a page of the catalog with optional search and category filter.
pub fn api_v1_components<R>(
    params: ApiV1ComponentsQueryParams,
    repo: &R,
) -> ServiceResult<Vec<Component>>
where
    R: ComponentReader,
{
    let mut list_query = ComponentListQuery::default();

    if let Some(category) = params.category.as_deref().filter(|c| !c.is_empty()) {
        match Category::try_from(category) {
            Ok(category) => list_query = list_query.category(category),
            Err(_) => return Err(ServiceError::NotFound),
        }
    }

    if let Some(query) = params.query.as_deref().filter(|q| !q.is_empty()) {
        list_query = list_query.search(query);
    }

    let page = params.page.unwrap_or(1);
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    match repo.list_components(list_query) {
        Ok((_total, components)) => Ok(components),
        Err(e) => {
            log::error!("Failed to list components: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        BrandName, ComponentId, ComponentName, ComponentPrice, ComponentSku, ComponentSlug,
        ImageUrl, StockCount,
    };
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn sample_component(id: i32, name: &str, category: Category) -> Component {
        let now = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Component {
            id: ComponentId::new(id).unwrap(),
            slug: ComponentSlug::from_name(name).unwrap(),
            name: ComponentName::new(name).unwrap(),
            sku: ComponentSku::new(format!("SKU{id}")).unwrap(),
            brand: BrandName::new("Marca").unwrap(),
            category,
            description: None,
            image_url: ImageUrl::new("https://example.com/img.jpg").unwrap(),
            price: ComponentPrice::new(100.0).unwrap(),
            stock: StockCount::new(1).unwrap(),
            specs: Default::default(),
            prices: vec![],
            price_history: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn searches_by_name() {
        let repo = TestRepository::new(
            vec![
                sample_component(1, "Core i9-13900K", Category::Cpu),
                sample_component(2, "GeForce RTX 4090", Category::Gpu),
            ],
            vec![],
            vec![],
        );
        let params = ApiV1ComponentsQueryParams {
            query: Some("rtx".into()),
            category: None,
            page: None,
        };

        let result = api_v1_components(params, &repo).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "GeForce RTX 4090");
    }

    #[test]
    fn invalid_category_is_not_found() {
        let repo = TestRepository::default();
        let params = ApiV1ComponentsQueryParams {
            query: None,
            category: Some("Cooling".into()),
            page: None,
        };
        assert_eq!(
            api_v1_components(params, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }
}
