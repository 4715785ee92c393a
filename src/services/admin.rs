use crate::ADMIN_ROLE;
use crate::auth::{AuthenticatedUser, check_role};
use crate::domain::component::Component;
use crate::domain::types::{ComponentId, UserId};
use crate::domain::user::UserProfile;
use crate::forms::components::ProductFormPayload;
use crate::forms::users::SetUserRoleFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    ComponentListQuery, ComponentReader, ComponentWriter, UserListQuery, UserReader, UserWriter,
};

use super::{ServiceError, ServiceResult};

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DashboardCounts {
    pub products: usize,
    pub users: usize,
}

pub fn show_dashboard<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<DashboardCounts>
where
    R: ComponentReader + UserReader,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let products = match repo.list_components(ComponentListQuery::default().paginate(1, 1)) {
        Ok((total, _)) => total,
        Err(e) => {
            log::error!("Failed to count products: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let users = match repo.list_users(UserListQuery::default().paginate(1, 1)) {
        Ok((total, _)) => total,
        Err(e) => {
            log::error!("Failed to count users: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(DashboardCounts { products, users })
}

pub fn show_products<R>(
    page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Component>>
where
    R: ComponentReader,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.list_components(ComponentListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE))
    {
        Ok((total, components)) => Ok(Paginated::new(
            components,
            page,
            total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Creates a catalog entry, rejecting duplicate slugs before writing.
pub fn add_product<R>(
    payload: ProductFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ComponentReader + ComponentWriter,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let component = payload.into_new_component()?;

    match repo.get_component_by_slug(&component.slug) {
        Ok(Some(_)) => {
            return Err(ServiceError::Form(format!(
                "Ya existe un producto con el slug {}",
                component.slug
            )));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check slug uniqueness: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.create_component(&component) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to create product: {e}");
            Ok(false)
        }
    }
}

pub fn update_product<R>(
    product_id: i32,
    payload: ProductFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ComponentReader + ComponentWriter,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let product_id = match ComponentId::new(product_id) {
        Ok(product_id) => product_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_component_by_id(product_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let component = payload.into_new_component()?;
    match repo.update_component(product_id, &component) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to update product: {e}");
            Ok(false)
        }
    }
}

pub fn delete_product<R>(
    product_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ComponentReader + ComponentWriter,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let product_id = match ComponentId::new(product_id) {
        Ok(product_id) => product_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_component_by_id(product_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.delete_component(product_id) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            Ok(false)
        }
    }
}

pub fn show_users<R>(
    page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<UserProfile>>
where
    R: UserReader,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    match repo.list_users(UserListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE)) {
        Ok((total, users)) => Ok(Paginated::new(
            users,
            page,
            total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => {
            log::error!("Failed to list users: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn set_user_role<R>(
    target_id: i32,
    payload: SetUserRoleFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: UserReader + UserWriter,
{
    if !check_role(ADMIN_ROLE, &user.role) {
        return Err(ServiceError::Unauthorized);
    }

    let target_id = match UserId::new(target_id) {
        Ok(target_id) => target_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_user_by_id(target_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get user: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.set_user_role(target_id, payload.role) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to set user role: {e}");
            Ok(false)
        }
    }
}
