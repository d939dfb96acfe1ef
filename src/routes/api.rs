use actix_web::{HttpRequest, HttpResponse, Responder, get, http::header, web};

use crate::dto::auth::ErrorResponse;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, api as api_service};

#[get("/users")]
pub async fn api_users(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match api_service::list_members(repo.get_ref(), &server_config.secret, authorization) {
        Ok(members) => HttpResponse::Ok().json(members),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Unauthorized().json(ErrorResponse::new("Unauthorized"))
        }
        Err(err) => {
            log::error!("Failed to list users: {err}");
            HttpResponse::InternalServerError().json(ErrorResponse::new("Failed to fetch users"))
        }
    }
}
