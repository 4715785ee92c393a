use std::collections::BTreeMap;

use chrono::Utc;
use component_compares::domain::build::{BuildSelection, NewBuild};
use component_compares::domain::component::{NewComponent, PriceEntry, PriceHistoryPoint};
use component_compares::domain::types::{
    BrandName, Category, ComponentName, ComponentPrice, ComponentSku, ComponentSlug, Email,
    OfferUrl, StockCount, StoreId, UserFirstName, UserLastName, UserRole, UserStatus,
};
use component_compares::domain::user::NewUser;
use component_compares::repository::{
    BuildListQuery, BuildReader, BuildWriter, ComponentListQuery, ComponentReader,
    ComponentWriter, DieselRepository, UserListQuery, UserReader, UserWriter,
};

mod common;

fn new_component(name: &str, category: Category, price: f64) -> NewComponent {
    let now = Utc::now().naive_utc();
    let mut specs = BTreeMap::new();
    specs.insert("Socket".to_string(), "LGA1700".to_string());
    NewComponent {
        slug: ComponentSlug::from_name(name).expect("valid slug"),
        name: ComponentName::new(name).expect("valid name"),
        sku: ComponentSku::new(format!("SKU-{name}")).expect("valid sku"),
        brand: BrandName::new("Intel").expect("valid brand"),
        category,
        description: None,
        image_url: component_compares::domain::types::ImageUrl::new("https://example.com/img.jpg")
            .expect("valid image url"),
        price: ComponentPrice::new(price).expect("valid price"),
        stock: StockCount::new(10).expect("valid stock"),
        specs,
        created_at: now,
        updated_at: now,
    }
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: Email::new(email).expect("valid email"),
        password_hash: "$2b$12$fakedhashfortestingonly".to_string(),
        first_name: UserFirstName::new("Ana").expect("valid first name"),
        last_name: UserLastName::new("Rojas").expect("valid last name"),
        role: UserRole::Customer,
        status: UserStatus::Active,
        created_at: Utc::now().naive_utc(),
    }
}

#[test]
fn component_round_trips_with_prices_and_history() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_component(&new_component("Intel Core i9-13900K", Category::Cpu, 589_990.0))
        .expect("should create component");

    let slug = ComponentSlug::new("intel-core-i9-13900k").expect("valid slug");
    let component = repo
        .get_component_by_slug(&slug)
        .expect("should query component")
        .expect("component should exist");

    assert_eq!(component.name, "Intel Core i9-13900K");
    assert_eq!(component.category, Category::Cpu);
    assert_eq!(
        component.specs.get("Socket").map(String::as_str),
        Some("LGA1700")
    );
    assert!(component.prices.is_empty());
    assert_eq!(component.best_price(), 0.0);

    let entries = vec![
        PriceEntry {
            store_id: StoreId::new("store-1").expect("valid store"),
            price: ComponentPrice::new(589_990.0).expect("valid price"),
            url: OfferUrl::new("https://store-1.example.com/i9").expect("valid url"),
        },
        PriceEntry {
            store_id: StoreId::new("store-2").expect("valid store"),
            price: ComponentPrice::new(599_990.0).expect("valid price"),
            url: OfferUrl::new("https://store-2.example.com/i9").expect("valid url"),
        },
    ];
    repo.add_price_entries(component.id, &entries)
        .expect("should add price entries");

    let point = PriceHistoryPoint {
        date: Utc::now().date_naive(),
        normal_price: ComponentPrice::new(589_990.0).expect("valid price"),
        offer_price: ComponentPrice::new(579_990.0).expect("valid price"),
    };
    repo.append_price_history(component.id, &point)
        .expect("should append history point");

    let component = repo
        .get_component_by_slug(&slug)
        .expect("should query component")
        .expect("component should exist");
    assert_eq!(component.prices.len(), 2);
    assert_eq!(component.best_price(), 589_990.0);
    assert_eq!(component.price_history.len(), 1);
    assert_eq!(component.price_history[0].offer_price.get(), 579_990.0);
}

#[test]
fn list_components_filters_and_paginates() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_component(&new_component("Core i5-13600K", Category::Cpu, 329_990.0))
        .expect("should create cpu");
    repo.create_component(&new_component("Core i9-13900K", Category::Cpu, 589_990.0))
        .expect("should create cpu");
    repo.create_component(&new_component("Samsung 990 Pro", Category::Storage, 129_990.0))
        .expect("should create storage");

    let (total, cpus) = repo
        .list_components(ComponentListQuery::default().category(Category::Cpu))
        .expect("should list cpus");
    assert_eq!(total, 2);
    assert_eq!(cpus.len(), 2);

    let (total, found) = repo
        .list_components(ComponentListQuery::default().search("990 Pro"))
        .expect("should search");
    assert_eq!(total, 1);
    assert!(found.iter().any(|c| c.name == "Samsung 990 Pro"));

    let (total, page) = repo
        .list_components(ComponentListQuery::default().paginate(1, 2))
        .expect("should paginate");
    assert_eq!(total, 3);
    assert_eq!(page.len(), 2);

    let brands = repo.list_brands().expect("should list brands");
    assert_eq!(brands, vec!["Intel".to_string()]);
}

#[test]
fn duplicate_component_slug_is_rejected() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_component(&new_component("Core i9-13900K", Category::Cpu, 589_990.0))
        .expect("should create component");
    let result = repo.create_component(&new_component("Core i9-13900K", Category::Cpu, 1.0));
    assert!(result.is_err());
}

#[test]
fn user_repository_crud() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_user(&new_user("ana@example.com"))
        .expect("should create user");

    let email = Email::new("ana@example.com").expect("valid email");
    let profile = repo
        .get_user_by_email(&email)
        .expect("should query user")
        .expect("user should exist");
    assert_eq!(profile.role, UserRole::Customer);

    let hash = repo
        .get_password_hash(&email)
        .expect("should query hash")
        .expect("hash should exist");
    assert!(hash.starts_with("$2b$"));

    repo.set_user_role(profile.id, UserRole::Superuser)
        .expect("should promote user");
    let profile = repo
        .get_user_by_id(profile.id)
        .expect("should query user")
        .expect("user should exist");
    assert_eq!(profile.role, UserRole::Superuser);

    let (total, users) = repo
        .list_users(UserListQuery::default())
        .expect("should list users");
    assert_eq!(total, 1);
    assert_eq!(users.len(), 1);
}

#[test]
fn builds_persist_and_delete_scoped_to_owner() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_user(&new_user("ana@example.com"))
        .expect("should create user");
    let user = repo
        .get_user_by_email(&Email::new("ana@example.com").expect("valid email"))
        .expect("should query user")
        .expect("user should exist");

    let mut selection = BuildSelection::default();
    selection.select(
        Category::Cpu,
        ComponentSlug::new("intel-core-i9-13900k").expect("valid slug"),
    );
    selection.select(
        Category::Ram,
        ComponentSlug::new("fury-beast-32gb").expect("valid slug"),
    );
    selection.select(
        Category::Ram,
        ComponentSlug::new("fury-beast-32gb").expect("valid slug"),
    );

    let build = NewBuild {
        user_id: user.id,
        name: component_compares::domain::types::BuildName::new("Mi PC Gamer")
            .expect("valid name"),
        components: selection.into_components(),
        total_price: ComponentPrice::new(2_189_980.0).expect("valid total"),
        created_at: Utc::now().naive_utc(),
    };
    repo.create_build(&build).expect("should create build");

    let (total, builds) = repo
        .list_builds(BuildListQuery::new(user.id))
        .expect("should list builds");
    assert_eq!(total, 1);
    assert_eq!(builds[0].name, "Mi PC Gamer");
    assert_eq!(builds[0].total_price.get(), 2_189_980.0);
    assert_eq!(
        builds[0]
            .components
            .get(&Category::Ram)
            .map(|slugs| slugs.len()),
        Some(2)
    );

    let other_user =
        component_compares::domain::types::UserId::new(user.id.get() + 1).expect("valid id");
    assert_eq!(
        repo.delete_build(builds[0].id, other_user)
            .expect("delete should run"),
        0
    );
    assert_eq!(
        repo.delete_build(builds[0].id, user.id)
            .expect("delete should run"),
        1
    );

    let (total, _) = repo
        .list_builds(BuildListQuery::new(user.id))
        .expect("should list builds");
    assert_eq!(total, 0);
}
