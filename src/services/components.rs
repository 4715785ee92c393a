use crate::ADMIN_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::component::Component;
use crate::domain::types::{Category, ComponentId, ComponentSlug};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ComponentListQuery, ComponentReader, ComponentSort};

use super::{ServiceError, ServiceResult};

/// Catalog listing parameters as they arrive from the storefront.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub sort: Option<String>,
    pub page: usize,
}

/// Core business logic for the catalog page: paginated listing plus the
/// brand list for the filter dropdown.
pub fn show_components<R>(
    query: CatalogQuery,
    repo: &R,
) -> ServiceResult<(Paginated<Component>, Vec<String>)>
where
    R: ComponentReader,
{
    let mut list_query =
        ComponentListQuery::default().sort(ComponentSort::from_query(query.sort.as_deref().unwrap_or("")));

    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty() && *c != "All") {
        match Category::try_from(category) {
            Ok(category) => list_query = list_query.category(category),
            Err(_) => return Err(ServiceError::NotFound),
        }
    }

    if let Some(brand) = query.brand.as_deref().filter(|b| !b.is_empty() && *b != "All") {
        list_query = list_query.brand(brand);
    }

    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        list_query = list_query.search(search.trim());
    }

    let page = query.page.max(1);
    list_query = list_query.paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let paginated = match repo.list_components(list_query) {
        Ok((total, components)) => {
            Paginated::new(components, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE))
        }
        Err(e) => {
            log::error!("Failed to list components: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let brands = match repo.list_brands() {
        Ok(brands) => brands,
        Err(e) => {
            log::error!("Failed to list brands: {e}");
            vec![]
        }
    };

    Ok((paginated, brands))
}

/// Loads a component for the admin edit form.
pub fn show_component_by_id<R>(
    id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Component>
where
    R: ComponentReader,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let id = match ComponentId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_component_by_id(id) {
        Ok(Some(component)) => Ok(component),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get component by id: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Core business logic for the component detail page.
///
/// Unknown or malformed slugs map to `NotFound`, which the route renders as
/// the standard 404 page.
pub fn show_component<R>(slug: &str, repo: &R) -> ServiceResult<Component>
where
    R: ComponentReader,
{
    let slug = match ComponentSlug::new(slug) {
        Ok(slug) => slug,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_component_by_slug(&slug) {
        Ok(Some(component)) => Ok(component),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get component by slug: {e}");
            Err(ServiceError::Internal)
        }
    }
}
