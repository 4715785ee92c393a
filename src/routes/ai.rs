use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::ai::client::OpenAiClient;
use crate::ai::flows::compatibility::CompatiblePartsInput;
use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::ai::{
    check_compatibility as check_compatibility_service, generate_build as generate_build_service,
};

/// Generic message shown whenever an AI flow fails.
const AI_ERROR_MESSAGE: &str = "No se pudo generar una respuesta. Por favor, intenta de nuevo.";

#[derive(Deserialize)]
pub struct GenerateBuildForm {
    pub description: String,
}

#[derive(Deserialize)]
pub struct CompatibilityForm {
    pub component_type: String,
    pub component_name: String,
    pub component_details: Option<String>,
}

#[get("/ai-builder")]
pub async fn show_ai_builder(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, Some(&user), "ai-builder");
    context.insert("description", "");
    render_template(&tera, "ai/builder.html", &context)
}

#[post("/ai-builder/generate")]
pub async fn generate_build(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    form: web::Form<GenerateBuildForm>,
    repo: web::Data<DieselRepository>,
    ai_client: web::Data<OpenAiClient>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let description = form.into_inner().description;

    match generate_build_service(&description, repo.get_ref(), ai_client.get_ref()).await {
        Ok(suggestion) => {
            let mut context = base_context(&flash_messages, Some(&user), "ai-builder");
            context.insert("description", &description);
            context.insert("suggestion", &suggestion);
            render_template(&tera, "ai/builder.html", &context)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/ai-builder")
        }
        Err(ServiceError::Ai(err)) => {
            log::error!("AI build generation failed: {err}");
            FlashMessage::error(AI_ERROR_MESSAGE).send();
            redirect("/ai-builder")
        }
        Err(err) => {
            log::error!("Failed to generate build: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/compatibility")]
pub async fn show_compatibility(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, Some(&user), "compatibility");
    render_template(&tera, "ai/compatibility.html", &context)
}

#[post("/compatibility/check")]
pub async fn check_compatibility(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    form: web::Form<CompatibilityForm>,
    ai_client: web::Data<OpenAiClient>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let form = form.into_inner();
    let input = CompatiblePartsInput {
        component_type: form.component_type.clone(),
        component_name: form.component_name.clone(),
        component_details: form
            .component_details
            .clone()
            .filter(|details| !details.trim().is_empty()),
    };

    match check_compatibility_service(input, ai_client.get_ref()).await {
        Ok(output) => {
            let mut context = base_context(&flash_messages, Some(&user), "compatibility");
            context.insert("component_type", &form.component_type);
            context.insert("component_name", &form.component_name);
            context.insert("result", &output);
            render_template(&tera, "ai/compatibility.html", &context)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/compatibility")
        }
        Err(ServiceError::Ai(err)) => {
            log::error!("Compatibility check failed: {err}");
            FlashMessage::error(AI_ERROR_MESSAGE).send();
            redirect("/compatibility")
        }
        Err(err) => {
            log::error!("Failed to check compatibility: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
