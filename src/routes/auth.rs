use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, LoginFormPayload, RegisterForm, RegisterFormPayload};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{login as login_service, register as register_service};

#[get("/login")]
pub async fn show_login(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect("/");
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

fn establish_session(request: &HttpRequest, claims: &AuthenticatedUser) -> Result<(), ()> {
    let serialized = claims.to_claims().map_err(|e| {
        log::error!("Failed to serialize session claims: {e}");
    })?;
    Identity::login(&request.extensions(), serialized).map(|_| ()).map_err(|e| {
        log::error!("Failed to establish session: {e}");
    })
}

#[post("/auth/login")]
pub async fn login(
    request: HttpRequest,
    form: web::Form<LoginForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match LoginFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/login");
        }
    };

    match login_service(payload, repo.get_ref()) {
        Ok(claims) => {
            if establish_session(&request, &claims).is_err() {
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("¡Bienvenido de vuelta!").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/login")
        }
        Err(err) => {
            log::error!("Login failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/auth/register")]
pub async fn register(
    request: HttpRequest,
    form: web::Form<RegisterForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let payload = match RegisterFormPayload::try_from(form.into_inner()) {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/login");
        }
    };

    match register_service(payload, repo.get_ref()) {
        Ok(claims) => {
            if establish_session(&request, &claims).is_err() {
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Tu cuenta ha sido creada").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/login")
        }
        Err(err) => {
            log::error!("Registration failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/auth/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/")
}
