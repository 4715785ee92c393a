use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::{Deserialize, Serialize};
use tera::Tera;

use crate::ai::client::OpenAiClient;
use crate::auth::AuthenticatedUser;
use crate::domain::types::Category;
use crate::forms::components::{ProductForm, ProductFormPayload};
use crate::forms::users::{SetUserRoleForm, SetUserRoleFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::admin::{
    add_product as add_product_service, delete_product as delete_product_service,
    set_user_role as set_user_role_service, show_dashboard as show_dashboard_service,
    show_products as show_products_service, show_users as show_users_service,
    update_product as update_product_service,
};
use crate::services::ai::{
    discover_prices as discover_prices_service, enrich_product as enrich_product_service,
};
use crate::services::components::show_component_by_id as show_component_by_id_service;

const AI_ERROR_MESSAGE: &str = "No se pudo generar una respuesta. Por favor, intenta de nuevo.";

#[derive(Deserialize)]
struct PageQueryParams {
    page: Option<usize>,
}

#[derive(Deserialize)]
pub struct EnrichProductForm {
    pub name: String,
}

/// Values prefilled into the product form by the enrichment flow.
#[derive(Serialize)]
struct ProductPrefill {
    name: String,
    sku: String,
    brand: String,
    category: Option<&'static str>,
    description: String,
    image_url: String,
    price: f64,
    stock: i32,
    specs: String,
}

fn category_options() -> Vec<(&'static str, &'static str)> {
    Category::ALL
        .into_iter()
        .map(|c| (c.as_str(), c.label()))
        .collect()
}

#[get("/admin")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_dashboard_service(&user, repo.get_ref()) {
        Ok(counts) => {
            let mut context = base_context(&flash_messages, Some(&user), "admin");
            context.insert("counts", &counts);
            render_template(&tera, "admin/dashboard.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to render admin dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

fn render_products_page(
    page: usize,
    user: &AuthenticatedUser,
    flash_messages: &IncomingFlashMessages,
    repo: &DieselRepository,
    tera: &Tera,
    prefill: Option<ProductPrefill>,
) -> HttpResponse {
    match show_products_service(page, user, repo) {
        Ok(products) => {
            let mut context = base_context(flash_messages, Some(user), "admin-products");
            context.insert("products", &products);
            context.insert("categories", &category_options());
            context.insert("prefill", &prefill);
            render_template(tera, "admin/products.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to render admin products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products")]
pub async fn show_products(
    params: web::Query<PageQueryParams>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_products_page(
        params.page.unwrap_or(1),
        &user,
        &flash_messages,
        repo.get_ref(),
        &tera,
        None,
    )
}

#[post("/admin/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    form: web::Form<ProductForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match ProductFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin/products");
        }
    };

    let name = payload.name.to_string();
    match add_product_service(payload, &user, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success(format!("{name} ha sido añadido al catálogo")).send();
            redirect("/admin/products")
        }
        Ok(false) => {
            FlashMessage::error("No se pudo crear el producto").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to add product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products/{product_id}/edit")]
pub async fn show_product_edit(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_component_by_id_service(product_id.into_inner(), &user, repo.get_ref()) {
        Ok(component) => {
            let specs = serde_json::to_string(&component.specs).unwrap_or_default();
            let mut context = base_context(&flash_messages, Some(&user), "admin-products");
            context.insert("product", &component);
            context.insert("specs_json", &specs);
            context.insert("categories", &category_options());
            render_template(&tera, "admin/product_edit.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El producto no existe").send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to render product edit page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/update")]
pub async fn update_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Form<ProductForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match ProductFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin/products");
        }
    };

    match update_product_service(product_id.into_inner(), payload, &user, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Producto actualizado").send();
            redirect("/admin/products")
        }
        Ok(false) => {
            FlashMessage::error("No se pudo actualizar el producto").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El producto no existe").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to update product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_product_service(product_id.into_inner(), &user, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("El producto ha sido eliminado del catálogo").send();
            redirect("/admin/products")
        }
        Ok(false) => {
            FlashMessage::error("No se pudo eliminar el producto").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El producto no existe").send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to delete product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/find_prices")]
pub async fn find_product_prices(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    ai_client: web::Data<OpenAiClient>,
) -> impl Responder {
    match discover_prices_service(
        product_id.into_inner(),
        &user,
        repo.get_ref(),
        ai_client.get_ref(),
    )
    .await
    {
        Ok(0) => {
            FlashMessage::info("No se encontraron precios nuevos").send();
            redirect("/admin/products")
        }
        Ok(added) => {
            FlashMessage::success(format!("{added} precios nuevos añadidos")).send();
            redirect("/admin/products")
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El producto no existe").send();
            redirect("/admin/products")
        }
        Err(ServiceError::Ai(err)) => {
            log::error!("Price discovery failed: {err}");
            FlashMessage::error(AI_ERROR_MESSAGE).send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to discover prices: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/enrich")]
pub async fn enrich_product(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    form: web::Form<EnrichProductForm>,
    repo: web::Data<DieselRepository>,
    ai_client: web::Data<OpenAiClient>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let name = form.into_inner().name;

    match enrich_product_service(&name, &user, ai_client.get_ref()).await {
        Ok(details) => {
            let category = details.category.as_slot().map(Category::as_str);
            if category.is_none() {
                FlashMessage::warning(
                    "La categoría sugerida no corresponde a un slot del configurador; \
selecciónala manualmente",
                )
                .send();
            }
            let specs = serde_json::to_string(&details.specs_as_strings()).unwrap_or_default();
            let prefill = ProductPrefill {
                name,
                sku: details.sku.clone(),
                brand: details.brand.clone(),
                category,
                description: details.description.clone(),
                image_url: details.image_url.clone(),
                price: details.price,
                stock: details.stock,
                specs,
            };
            render_products_page(1, &user, &flash_messages, repo.get_ref(), &tera, Some(prefill))
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/products")
        }
        Err(ServiceError::Ai(err)) => {
            log::error!("Product enrichment failed: {err}");
            FlashMessage::error(AI_ERROR_MESSAGE).send();
            redirect("/admin/products")
        }
        Err(err) => {
            log::error!("Failed to enrich product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/users")]
pub async fn show_users(
    params: web::Query<PageQueryParams>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_users_service(params.page.unwrap_or(1), &user, repo.get_ref()) {
        Ok(users) => {
            let mut context = base_context(&flash_messages, Some(&user), "admin-users");
            context.insert("users", &users);
            render_template(&tera, "admin/users.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(err) => {
            log::error!("Failed to render admin users: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/users/{user_id}/role")]
pub async fn set_user_role(
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
    form: web::Form<SetUserRoleForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match SetUserRoleFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/admin/users");
        }
    };

    match set_user_role_service(user_id.into_inner(), payload, &user, repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Rol actualizado").send();
            redirect("/admin/users")
        }
        Ok(false) => {
            FlashMessage::error("No se pudo actualizar el rol").send();
            redirect("/admin/users")
        }
        Err(ServiceError::Unauthorized) => redirect("/"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El usuario no existe").send();
            redirect("/admin/users")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin/users")
        }
        Err(err) => {
            log::error!("Failed to set user role: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
