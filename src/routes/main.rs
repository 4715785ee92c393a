use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::store::store_name;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::ServiceError;
use crate::services::components::{
    CatalogQuery, show_component as show_component_service,
    show_components as show_components_service,
};
use crate::services::main::show_index as show_index_service;

#[derive(Deserialize)]
struct CatalogQueryParams {
    search: Option<String>,
    category: Option<String>,
    brand: Option<String>,
    sort: Option<String>,
    page: Option<usize>,
}

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_index_service(repo.get_ref()) {
        Ok((total, components)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("catalog_size", &total);
            context.insert("components", &components);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render index: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/components")]
pub async fn show_components(
    params: web::Query<CatalogQueryParams>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = CatalogQuery {
        search: params.search.clone(),
        category: params.category.clone(),
        brand: params.brand.clone(),
        sort: params.sort.clone(),
        page: params.page.unwrap_or(1),
    };

    match show_components_service(query, repo.get_ref()) {
        Ok((components, brands)) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "components");
            context.insert("components", &components);
            context.insert("categories", &crate::domain::types::Category::ALL);
            context.insert("brands", &brands);
            context.insert("selected_category", &params.category.unwrap_or_default());
            context.insert("selected_brand", &params.brand.unwrap_or_default());
            context.insert("search", &params.search.unwrap_or_default());
            context.insert("sort", &params.sort.unwrap_or_default());
            render_template(&tera, "components/index.html", &context)
        }
        Err(ServiceError::NotFound) => not_found_page(&flash_messages, user.as_ref(), &tera),
        Err(err) => {
            log::error!("Failed to render catalog: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/components/{slug}")]
pub async fn show_component(
    slug: web::Path<String>,
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_component_service(&slug.into_inner(), repo.get_ref()) {
        Ok(component) => {
            let price_rows: Vec<(&str, f64, &str)> = component
                .prices
                .iter()
                .map(|entry| {
                    (
                        store_name(entry.store_id.as_str()).unwrap_or("Tienda Desconocida"),
                        entry.price.get(),
                        entry.url.as_str(),
                    )
                })
                .collect();

            let mut context = base_context(&flash_messages, user.as_ref(), "components");
            context.insert("component", &component);
            context.insert("best_price", &component.best_price());
            context.insert("price_rows", &price_rows);
            render_template(&tera, "components/detail.html", &context)
        }
        Err(ServiceError::NotFound) => not_found_page(&flash_messages, user.as_ref(), &tera),
        Err(err) => {
            log::error!("Failed to render component detail: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Standard 404 page, also mounted as the default service.
pub fn not_found_page(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    tera: &Tera,
) -> HttpResponse {
    let context = base_context(flash_messages, user, "");
    let body = tera
        .render("main/not_found.html", &context)
        .unwrap_or_else(|e| {
            log::error!("Failed to render not-found page: {e}");
            String::new()
        });
    HttpResponse::NotFound().body(body)
}

pub async fn default_not_found(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    not_found_page(&flash_messages, user.as_ref(), &tera)
}
