use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::api::{ApiV1ComponentsQueryParams, api_v1_components as api_v1_components_service};

#[get("/api/v1/components")]
pub async fn api_v1_components(
    params: web::Query<ApiV1ComponentsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_v1_components_service(params.into_inner(), repo.get_ref()) {
        Ok(components) => HttpResponse::Ok().json(components),
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to list components: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
