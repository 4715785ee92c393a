use crate::db::{DbConnection, DbPool};
use crate::domain::build::{Build, NewBuild};
use crate::domain::component::{Component, NewComponent, PriceEntry, PriceHistoryPoint};
use crate::domain::types::{
    BuildId, Category, ComponentId, ComponentSlug, Email, UserId, UserRole,
};
use crate::domain::user::{NewUser, UserProfile};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod build;
pub mod component;
pub mod errors;
#[cfg(test)]
pub mod test;
pub mod user;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Sort orders accepted by the catalog listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComponentSort {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ComponentSort {
    /// Parses the storefront's sort query parameter, falling back to the
    /// default order for unknown values.
    pub fn from_query(value: &str) -> Self {
        match value {
            "name-desc" => Self::NameDesc,
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            _ => Self::NameAsc,
        }
    }
}

/// Query parameters used when listing or searching catalog components.
#[derive(Debug, Clone, Default)]
pub struct ComponentListQuery {
    /// Restrict to a single slot category.
    pub category: Option<Category>,
    /// Restrict to a brand (exact match).
    pub brand: Option<String>,
    /// Case-insensitive name/SKU search string.
    pub search: Option<String>,
    /// Sort order.
    pub sort: ComponentSort,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ComponentListQuery {
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn sort(mut self, sort: ComponentSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters for listing a user's saved builds.
#[derive(Debug, Clone)]
pub struct BuildListQuery {
    pub user_id: UserId,
    pub pagination: Option<Pagination>,
}

impl BuildListQuery {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters for listing registered users.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for catalog components.
pub trait ComponentReader {
    /// List components matching the supplied query parameters.
    fn list_components(&self, query: ComponentListQuery)
    -> RepositoryResult<(usize, Vec<Component>)>;
    /// Retrieve a component by its identifier.
    fn get_component_by_id(&self, id: ComponentId) -> RepositoryResult<Option<Component>>;
    /// Retrieve a component by its catalog slug.
    fn get_component_by_slug(&self, slug: &ComponentSlug) -> RepositoryResult<Option<Component>>;
    /// Retrieve every component whose slug appears in `slugs`.
    fn get_components_by_slugs(
        &self,
        slugs: &[ComponentSlug],
    ) -> RepositoryResult<Vec<Component>>;
    /// Distinct brands present in the catalog, for the filter dropdown.
    fn list_brands(&self) -> RepositoryResult<Vec<String>>;
}

/// Write operations for catalog components.
pub trait ComponentWriter {
    /// Persist a new component.
    fn create_component(&self, component: &NewComponent) -> RepositoryResult<usize>;
    /// Update an existing component's editable fields.
    fn update_component(&self, id: ComponentId, component: &NewComponent)
    -> RepositoryResult<usize>;
    /// Delete a component and its price data.
    fn delete_component(&self, id: ComponentId) -> RepositoryResult<usize>;
    /// Attach store offers to a component.
    fn add_price_entries(
        &self,
        id: ComponentId,
        entries: &[PriceEntry],
    ) -> RepositoryResult<usize>;
    /// Append one day's price point to the trend series.
    fn append_price_history(
        &self,
        id: ComponentId,
        point: &PriceHistoryPoint,
    ) -> RepositoryResult<usize>;
}

/// Read-only operations for saved builds.
pub trait BuildReader {
    /// List a user's builds, newest first.
    fn list_builds(&self, query: BuildListQuery) -> RepositoryResult<(usize, Vec<Build>)>;
    /// Retrieve a build scoped to its owner.
    fn get_build_by_id(&self, id: BuildId, user_id: UserId) -> RepositoryResult<Option<Build>>;
}

/// Write operations for saved builds.
pub trait BuildWriter {
    /// Persist a new build snapshot.
    fn create_build(&self, build: &NewBuild) -> RepositoryResult<usize>;
    /// Delete a build scoped to its owner.
    fn delete_build(&self, id: BuildId, user_id: UserId) -> RepositoryResult<usize>;
}

/// Read-only operations for user accounts.
pub trait UserReader {
    /// List registered users.
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<UserProfile>)>;
    /// Retrieve a profile by identifier.
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<UserProfile>>;
    /// Retrieve a profile by email.
    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<UserProfile>>;
    /// Retrieve the stored password hash for a login attempt.
    fn get_password_hash(&self, email: &Email) -> RepositoryResult<Option<String>>;
}

/// Write operations for user accounts.
pub trait UserWriter {
    /// Persist a new account.
    fn create_user(&self, user: &NewUser) -> RepositoryResult<usize>;
    /// Change an account's role.
    fn set_user_role(&self, id: UserId, role: UserRole) -> RepositoryResult<usize>;
}
