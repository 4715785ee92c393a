use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::{Deserialize, Serialize};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::build::{BuildSelection, ResolvedLine};
use crate::domain::component::Component;
use crate::domain::types::Category;
use crate::forms::builds::{
    RemoveComponentForm, RemoveComponentFormPayload, SaveBuildForm, SaveBuildFormPayload,
    SelectComponentForm, SelectComponentFormPayload,
};
use crate::repository::{ComponentListQuery, ComponentReader, DieselRepository};
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::builds::{
    delete_build as delete_build_service, remove_component as remove_component_service,
    resolve_selection, save_build as save_build_service, select_component as select_component_service,
    show_builds as show_builds_service,
};
use crate::services::export::export_build as export_build_service;

/// Session key holding the in-progress slot selection.
const BUILD_SELECTION_KEY: &str = "build_selection";

fn load_selection(session: &Session) -> BuildSelection {
    session
        .get::<BuildSelection>(BUILD_SELECTION_KEY)
        .unwrap_or_default()
        .unwrap_or_default()
}

fn store_selection(session: &Session, selection: &BuildSelection) {
    if let Err(e) = session.insert(BUILD_SELECTION_KEY, selection) {
        log::error!("Failed to store build selection in session: {e}");
    }
}

#[derive(Serialize)]
struct BuilderSlot {
    category: &'static str,
    label: &'static str,
    allow_multiple: bool,
    button: &'static str,
    options: Vec<Component>,
    picks: Vec<PickView>,
}

/// One current pick rendered inside a slot card.
#[derive(Serialize)]
struct PickView {
    index: usize,
    name: String,
    brand: String,
    image_url: String,
    price: f64,
}

impl From<&ResolvedLine> for PickView {
    fn from(line: &ResolvedLine) -> Self {
        Self {
            index: line.index,
            name: line.component.name.as_str().to_string(),
            brand: line.component.brand.as_str().to_string(),
            image_url: line.component.image_url.as_str().to_string(),
            price: line.component.best_price(),
        }
    }
}

#[derive(Deserialize)]
struct DownloadQueryParams {
    format: String,
}

#[derive(Deserialize)]
struct BuildsQueryParams {
    page: Option<usize>,
}

#[get("/build")]
pub async fn show_builder(
    user: AuthenticatedUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let selection = load_selection(&session);

    let resolved = match resolve_selection(&selection, repo.get_ref()) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::error!("Failed to resolve selection: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let catalog = match repo.list_components(ComponentListQuery::default()) {
        Ok((_total, components)) => components,
        Err(e) => {
            log::error!("Failed to load catalog for builder: {e}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let slots: Vec<BuilderSlot> = Category::ALL
        .into_iter()
        .map(|category| {
            let picks: Vec<PickView> = resolved
                .lines()
                .iter()
                .filter(|line| line.category == category)
                .map(PickView::from)
                .collect();
            let button = if category.allow_multiple() && !picks.is_empty() {
                "Añadir otro"
            } else if !picks.is_empty() {
                "Cambiar"
            } else {
                "Elegir"
            };
            BuilderSlot {
                category: category.as_str(),
                label: category.label(),
                allow_multiple: category.allow_multiple(),
                button,
                options: catalog
                    .iter()
                    .filter(|c| c.category == category)
                    .cloned()
                    .collect(),
                picks,
            }
        })
        .collect();

    let mut context = base_context(&flash_messages, Some(&user), "build");
    context.insert("slots", &slots);
    context.insert("summary", &resolved.summary());
    context.insert("total_price", &resolved.total_price());
    render_template(&tera, "builds/builder.html", &context)
}

#[post("/build/select")]
pub async fn select_component(
    _user: AuthenticatedUser,
    session: Session,
    form: web::Form<SelectComponentForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match SelectComponentFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/build");
        }
    };

    let mut selection = load_selection(&session);
    match select_component_service(payload, &mut selection, repo.get_ref()) {
        Ok(()) => {
            store_selection(&session, &selection);
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("El componente no existe").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to select component: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }
    redirect("/build")
}

#[post("/build/remove")]
pub async fn remove_component(
    _user: AuthenticatedUser,
    session: Session,
    form: web::Form<RemoveComponentForm>,
) -> impl Responder {
    let payload = match RemoveComponentFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/build");
        }
    };

    let mut selection = load_selection(&session);
    remove_component_service(payload, &mut selection);
    store_selection(&session, &selection);
    redirect("/build")
}

#[post("/build/clear")]
pub async fn clear_selection(_user: AuthenticatedUser, session: Session) -> impl Responder {
    let mut selection = load_selection(&session);
    selection.clear();
    store_selection(&session, &selection);
    redirect("/build")
}

#[post("/build/save")]
pub async fn save_build(
    user: AuthenticatedUser,
    session: Session,
    form: web::Form<SaveBuildForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match SaveBuildFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/build");
        }
    };

    let selection = load_selection(&session);
    match save_build_service(payload, &selection, &user, repo.get_ref()) {
        Ok(_total) => {
            FlashMessage::success("Configuración guardada").send();
            redirect("/builds")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/build")
        }
        Err(err) => {
            log::error!("Failed to save build: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/build/download")]
pub async fn download_build(
    _user: AuthenticatedUser,
    session: Session,
    params: web::Query<DownloadQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let selection = load_selection(&session);
    match export_build_service(&params.format, &selection, repo.get_ref()) {
        Ok(file) => HttpResponse::Ok()
            .append_header(("Content-Type", file.content_type))
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.bytes),
        Err(ServiceError::Form(message)) => HttpResponse::BadRequest().body(message),
        Err(err) => {
            log::error!("Failed to export build: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/builds")]
pub async fn show_builds(
    params: web::Query<BuildsQueryParams>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = params.page.unwrap_or(1);
    match show_builds_service(page, &user, repo.get_ref()) {
        Ok(builds) => {
            let mut context = base_context(&flash_messages, Some(&user), "builds");
            context.insert("builds", &builds);
            render_template(&tera, "builds/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render saved builds: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/builds/{build_id}/delete")]
pub async fn delete_build(
    build_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_build_service(build_id.into_inner(), &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Configuración eliminada").send();
            redirect("/builds")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("La configuración no existe").send();
            redirect("/builds")
        }
        Err(err) => {
            log::error!("Failed to delete build: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
