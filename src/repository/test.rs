use std::sync::Mutex;

use crate::domain::build::{Build, NewBuild};
use crate::domain::component::{Component, NewComponent, PriceEntry, PriceHistoryPoint};
use crate::domain::types::{
    BuildId, ComponentId, ComponentSlug, Email, UserId, UserRole,
};
use crate::domain::user::{NewUser, UserProfile};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    BuildListQuery, BuildReader, BuildWriter, ComponentListQuery, ComponentReader, ComponentSort,
    ComponentWriter, UserListQuery, UserReader, UserWriter,
};

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    components: Vec<Component>,
    users: Vec<UserProfile>,
    pub builds: Mutex<Vec<Build>>,
    pub added_prices: Mutex<Vec<(ComponentId, Vec<PriceEntry>)>>,
    pub history_points: Mutex<Vec<(ComponentId, PriceHistoryPoint)>>,
}

impl TestRepository {
    pub fn new(components: Vec<Component>, users: Vec<UserProfile>, builds: Vec<Build>) -> Self {
        Self {
            components,
            users,
            builds: Mutex::new(builds),
            added_prices: Mutex::new(vec![]),
            history_points: Mutex::new(vec![]),
        }
    }
}

impl ComponentReader for TestRepository {
    fn list_components(
        &self,
        query: ComponentListQuery,
    ) -> RepositoryResult<(usize, Vec<Component>)> {
        let mut items: Vec<Component> = self.components.to_vec();
        if let Some(category) = query.category {
            items.retain(|c| c.category == category);
        }
        if let Some(brand) = &query.brand {
            items.retain(|c| c.brand.as_str() == brand);
        }
        if let Some(search) = &query.search {
            let search = search.to_lowercase();
            items.retain(|c| c.name.to_lowercase().contains(&search));
        }
        match query.sort {
            ComponentSort::NameAsc => items.sort_by(|a, b| a.name.cmp(&b.name)),
            ComponentSort::NameDesc => items.sort_by(|a, b| b.name.cmp(&a.name)),
            ComponentSort::PriceAsc => {
                items.sort_by(|a, b| a.price.get().total_cmp(&b.price.get()))
            }
            ComponentSort::PriceDesc => {
                items.sort_by(|a, b| b.price.get().total_cmp(&a.price.get()))
            }
        }
        let total = items.len();
        Ok((total, items))
    }

    fn get_component_by_id(&self, id: ComponentId) -> RepositoryResult<Option<Component>> {
        Ok(self.components.iter().find(|c| c.id == id).cloned())
    }

    fn get_component_by_slug(&self, slug: &ComponentSlug) -> RepositoryResult<Option<Component>> {
        Ok(self.components.iter().find(|c| &c.slug == slug).cloned())
    }

    fn get_components_by_slugs(
        &self,
        slugs: &[ComponentSlug],
    ) -> RepositoryResult<Vec<Component>> {
        Ok(self
            .components
            .iter()
            .filter(|c| slugs.contains(&c.slug))
            .cloned()
            .collect())
    }

    fn list_brands(&self) -> RepositoryResult<Vec<String>> {
        let mut brands: Vec<String> = self
            .components
            .iter()
            .map(|c| c.brand.as_str().to_string())
            .collect();
        brands.sort();
        brands.dedup();
        Ok(brands)
    }
}

impl ComponentWriter for TestRepository {
    fn create_component(&self, _component: &NewComponent) -> RepositoryResult<usize> {
        Ok(1)
    }

    fn update_component(
        &self,
        id: ComponentId,
        _component: &NewComponent,
    ) -> RepositoryResult<usize> {
        Ok(usize::from(self.components.iter().any(|c| c.id == id)))
    }

    fn delete_component(&self, id: ComponentId) -> RepositoryResult<usize> {
        Ok(usize::from(self.components.iter().any(|c| c.id == id)))
    }

    fn add_price_entries(
        &self,
        id: ComponentId,
        entries: &[PriceEntry],
    ) -> RepositoryResult<usize> {
        self.added_prices
            .lock()
            .unwrap()
            .push((id, entries.to_vec()));
        Ok(entries.len())
    }

    fn append_price_history(
        &self,
        id: ComponentId,
        point: &PriceHistoryPoint,
    ) -> RepositoryResult<usize> {
        self.history_points.lock().unwrap().push((id, point.clone()));
        Ok(1)
    }
}

impl BuildReader for TestRepository {
    fn list_builds(&self, query: BuildListQuery) -> RepositoryResult<(usize, Vec<Build>)> {
        let mut items: Vec<Build> = self
            .builds
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == query.user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len();
        Ok((total, items))
    }

    fn get_build_by_id(&self, id: BuildId, user_id: UserId) -> RepositoryResult<Option<Build>> {
        Ok(self
            .builds
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id && b.user_id == user_id)
            .cloned())
    }
}

impl BuildWriter for TestRepository {
    fn create_build(&self, build: &NewBuild) -> RepositoryResult<usize> {
        let mut builds = self.builds.lock().unwrap();
        let id = BuildId::new(builds.len() as i32 + 1).expect("positive id");
        builds.push(Build {
            id,
            user_id: build.user_id,
            name: build.name.clone(),
            components: build.components.clone(),
            total_price: build.total_price,
            created_at: build.created_at,
        });
        Ok(1)
    }

    fn delete_build(&self, id: BuildId, user_id: UserId) -> RepositoryResult<usize> {
        let mut builds = self.builds.lock().unwrap();
        let before = builds.len();
        builds.retain(|b| !(b.id == id && b.user_id == user_id));
        Ok(before - builds.len())
    }
}

impl UserReader for TestRepository {
    fn list_users(&self, _query: UserListQuery) -> RepositoryResult<(usize, Vec<UserProfile>)> {
        Ok((self.users.len(), self.users.to_vec()))
    }

    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<UserProfile>> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<UserProfile>> {
        Ok(self.users.iter().find(|u| &u.email == email).cloned())
    }

    fn get_password_hash(&self, _email: &Email) -> RepositoryResult<Option<String>> {
        Ok(None)
    }
}

impl UserWriter for TestRepository {
    fn create_user(&self, _user: &NewUser) -> RepositoryResult<usize> {
        Ok(1)
    }

    fn set_user_role(&self, id: UserId, _role: UserRole) -> RepositoryResult<usize> {
        Ok(usize::from(self.users.iter().any(|u| u.id == id)))
    }
}
