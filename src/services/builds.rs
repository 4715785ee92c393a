use std::collections::HashMap;

use chrono::Utc;

use crate::auth::AuthenticatedUser;
use crate::domain::build::{BuildSelection, NewBuild, ResolvedBuild};
use crate::domain::component::Component;
use crate::domain::types::{BuildId, ComponentPrice, ComponentSlug};
use crate::dto::builds::BuildCard;
use crate::forms::builds::{
    RemoveComponentFormPayload, SaveBuildFormPayload, SelectComponentFormPayload,
};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{BuildListQuery, BuildReader, BuildWriter, ComponentReader};

use super::{ServiceError, ServiceResult};

/// Resolves the session selection against the catalog.
pub fn resolve_selection<R>(selection: &BuildSelection, repo: &R) -> ServiceResult<ResolvedBuild>
where
    R: ComponentReader,
{
    let catalog = match repo.get_components_by_slugs(&selection.slugs()) {
        Ok(components) => components
            .into_iter()
            .map(|c| (c.slug.clone(), c))
            .collect::<HashMap<ComponentSlug, Component>>(),
        Err(e) => {
            log::error!("Failed to resolve build selection: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(ResolvedBuild::resolve(selection, &catalog))
}

/// Adds a pick to the session selection after confirming the component
/// exists and sits in the requested slot.
pub fn select_component<R>(
    payload: SelectComponentFormPayload,
    selection: &mut BuildSelection,
    repo: &R,
) -> ServiceResult<()>
where
    R: ComponentReader,
{
    let component = match repo.get_component_by_slug(&payload.slug) {
        Ok(Some(component)) => component,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get component for selection: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if component.category != payload.category {
        return Err(ServiceError::Form(format!(
            "{} no pertenece a la categoría {}",
            component.name,
            payload.category.label()
        )));
    }

    selection.select(payload.category, payload.slug);
    Ok(())
}

/// Removes a pick from the session selection; out-of-range indexes are a
/// no-op by construction.
pub fn remove_component(payload: RemoveComponentFormPayload, selection: &mut BuildSelection) {
    selection.remove(payload.category, payload.index);
}

/// Persists the current selection as a named build.
///
/// Both validations run before any write: the name is non-empty (enforced by
/// the payload) and at least one component must resolve. The stored total is
/// the aggregator's value at this moment.
pub fn save_build<R>(
    payload: SaveBuildFormPayload,
    selection: &BuildSelection,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<f64>
where
    R: ComponentReader + BuildWriter,
{
    if selection.is_empty() {
        return Err(ServiceError::Form(
            "Selecciona al menos un componente antes de guardar".to_string(),
        ));
    }

    let resolved = resolve_selection(selection, repo)?;
    if resolved.is_empty() {
        return Err(ServiceError::Form(
            "Los componentes seleccionados ya no están en el catálogo".to_string(),
        ));
    }

    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in session claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let total = resolved.total_price();
    let build = NewBuild {
        user_id,
        name: payload.name,
        components: selection.clone().into_components(),
        total_price: ComponentPrice::new(total)?,
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_build(&build) {
        Ok(_) => Ok(total),
        Err(e) => {
            log::error!("Failed to save build: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Core business logic for the saved-builds page.
pub fn show_builds<R>(
    page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<BuildCard>>
where
    R: BuildReader + ComponentReader,
{
    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in session claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let (total, builds) = match repo.list_builds(
        BuildListQuery::new(user_id).paginate(page, DEFAULT_ITEMS_PER_PAGE),
    ) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Failed to list builds: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let slugs: Vec<ComponentSlug> = builds
        .iter()
        .flat_map(|build| build.components.values().flatten().cloned())
        .collect();

    let catalog: HashMap<ComponentSlug, Component> = match repo.get_components_by_slugs(&slugs) {
        Ok(components) => components
            .into_iter()
            .map(|c| (c.slug.clone(), c))
            .collect(),
        Err(e) => {
            log::error!("Failed to resolve build components: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let cards = builds
        .iter()
        .map(|build| {
            BuildCard::new(build, |slug| {
                ComponentSlug::new(slug).ok().and_then(|s| catalog.get(&s).cloned())
            })
        })
        .collect();

    Ok(Paginated::new(
        cards,
        page,
        total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
    ))
}

/// Deletes one of the user's saved builds.
pub fn delete_build<R>(build_id: i32, user: &AuthenticatedUser, repo: &R) -> ServiceResult<()>
where
    R: BuildReader + BuildWriter,
{
    let user_id = match user.user_id() {
        Ok(user_id) => user_id,
        Err(e) => {
            log::error!("Invalid user id in session claims: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let build_id = match BuildId::new(build_id) {
        Ok(build_id) => build_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_build_by_id(build_id, user_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get build: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.delete_build(build_id, user_id) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete build: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::component::PriceEntry;
    use crate::domain::types::{
        BrandName, Category, ComponentId, ComponentName, ComponentSku, ImageUrl, OfferUrl,
        StockCount, StoreId,
    };
    use crate::forms::builds::{SaveBuildForm, SelectComponentForm};
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 1,
            email: "ana@example.com".into(),
            name: "Ana Rojas".into(),
            role: "customer".into(),
        }
    }

    fn sample_component(id: i32, name: &str, category: Category, best: f64) -> Component {
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
            price: ComponentPrice::new(best).unwrap(),
            stock: StockCount::new(5).unwrap(),
            specs: Default::default(),
            prices: vec![
                PriceEntry {
                    store_id: StoreId::new("store-1").unwrap(),
                    price: ComponentPrice::new(best).unwrap(),
                    url: OfferUrl::new("https://store-1.example.com/p").unwrap(),
                },
                PriceEntry {
                    store_id: StoreId::new("store-2").unwrap(),
                    price: ComponentPrice::new(best + 10_000.0).unwrap(),
                    url: OfferUrl::new("https://store-2.example.com/p").unwrap(),
                },
            ],
            price_history: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn repo() -> TestRepository {
        TestRepository::new(
            vec![
                sample_component(1, "Intel Core i9-13900K", Category::Cpu, 589_990.0),
                sample_component(2, "NVIDIA GeForce RTX 4090", Category::Gpu, 1_599_990.0),
            ],
            vec![],
            vec![],
        )
    }

    fn select(repo: &TestRepository, selection: &mut BuildSelection, category: &str, slug: &str) {
        let payload = SelectComponentFormPayload::try_from(SelectComponentForm {
            category: category.into(),
            slug: slug.into(),
        })
        .unwrap();
        select_component(payload, selection, repo).unwrap();
    }

    #[test]
    fn select_rejects_category_mismatch() {
        let repo = repo();
        let mut selection = BuildSelection::default();
        let payload = SelectComponentFormPayload::try_from(SelectComponentForm {
            category: "GPU".into(),
            slug: "intel-core-i9-13900k".into(),
        })
        .unwrap();

        let result = select_component(payload, &mut selection, &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(selection.is_empty());
    }

    #[test]
    fn save_build_persists_aggregated_total() {
        let repo = repo();
        let mut selection = BuildSelection::default();
        select(&repo, &mut selection, "CPU", "intel-core-i9-13900k");
        select(&repo, &mut selection, "GPU", "nvidia-geforce-rtx-4090");

        let payload = SaveBuildFormPayload::try_from(SaveBuildForm {
            name: "Mi PC Gamer".into(),
        })
        .unwrap();

        let total = save_build(payload, &selection, &sample_user(), &repo).unwrap();
        assert_eq!(total, 2_189_980.0);

        let builds = repo.builds.lock().unwrap();
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].total_price.get(), 2_189_980.0);
        assert_eq!(builds[0].name.as_str(), "Mi PC Gamer");
    }

    #[test]
    fn save_build_rejects_empty_selection_before_any_write() {
        let repo = repo();
        let payload = SaveBuildFormPayload::try_from(SaveBuildForm {
            name: "Sin partes".into(),
        })
        .unwrap();

        let result = save_build(payload, &BuildSelection::default(), &sample_user(), &repo);
        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(repo.builds.lock().unwrap().is_empty());
    }

    #[test]
    fn saved_builds_render_as_cards_with_resolved_lines() {
        let repo = repo();
        let mut selection = BuildSelection::default();
        select(&repo, &mut selection, "CPU", "intel-core-i9-13900k");

        let payload = SaveBuildFormPayload::try_from(SaveBuildForm {
            name: "Solo CPU".into(),
        })
        .unwrap();
        save_build(payload, &selection, &sample_user(), &repo).unwrap();

        let cards = show_builds(1, &sample_user(), &repo).unwrap();
        assert_eq!(cards.items.len(), 1);
        assert_eq!(cards.items[0].lines.len(), 1);
        assert_eq!(cards.items[0].lines[0].price, 589_990.0);
    }

    #[test]
    fn delete_build_scopes_to_owner() {
        let repo = repo();
        let mut selection = BuildSelection::default();
        select(&repo, &mut selection, "CPU", "intel-core-i9-13900k");
        let payload = SaveBuildFormPayload::try_from(SaveBuildForm { name: "PC".into() }).unwrap();
        save_build(payload, &selection, &sample_user(), &repo).unwrap();

        let stranger = AuthenticatedUser {
            id: 99,
            ..sample_user()
        };
        assert_eq!(
            delete_build(1, &stranger, &repo).unwrap_err(),
            ServiceError::NotFound
        );

        delete_build(1, &sample_user(), &repo).unwrap();
        assert!(repo.builds.lock().unwrap().is_empty());
    }
}
