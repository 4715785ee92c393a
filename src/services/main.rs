use crate::domain::component::Component;
use crate::repository::{ComponentListQuery, ComponentReader, ComponentSort};

use super::{ServiceError, ServiceResult};

/// Number of components highlighted on the landing page.
const FEATURED_COUNT: usize = 8;

/// Core business logic for rendering the landing page: a slice of the
/// catalog ordered by name plus the total catalog size.
pub fn show_index<R>(repo: &R) -> ServiceResult<(usize, Vec<Component>)>
where
    R: ComponentReader,
{
    match repo.list_components(
        ComponentListQuery::default()
            .sort(ComponentSort::NameAsc)
            .paginate(1, FEATURED_COUNT),
    ) {
        Ok((total, components)) => Ok((total, components)),
        Err(e) => {
            log::error!("Failed to list featured components: {e}");
            Err(ServiceError::Internal)
        }
    }
}
