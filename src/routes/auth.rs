use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::auth::ErrorResponse;
use crate::forms::auth::LoginForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};
use crate::session::SessionContext;

#[get("/login")]
pub async fn show_login(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if SessionContext::load(&session).is_some() {
        return redirect("/dashboard");
    }
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    session: Session,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let result = auth_service::login(
        repo.get_ref(),
        &server_config.secret,
        server_config.token_ttl_secs,
        &form,
    );

    match result {
        Ok(response) => {
            let context = SessionContext::new(response.token, response.email);
            if let Err(err) = context.init(&session) {
                log::error!("Failed to start session: {err}");
                FlashMessage::error("Error logging in").send();
                return redirect("/login");
            }
            redirect("/dashboard")
        }
        Err(ServiceError::Validation(message)) => {
            FlashMessage::error(message).send();
            redirect("/login")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(auth_service::INVALID_CREDENTIALS).send();
            redirect("/login")
        }
        Err(_) => {
            FlashMessage::error("Error logging in").send();
            redirect("/login")
        }
    }
}

#[post("/logout")]
pub async fn logout(session: Session) -> impl Responder {
    SessionContext::clear(&session);
    redirect("/login")
}

#[post("/login")]
pub async fn api_login(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    match auth_service::login(
        repo.get_ref(),
        &server_config.secret,
        server_config.token_ttl_secs,
        &form,
    ) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Validation(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(message))
        }
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized()
            .json(ErrorResponse::new(auth_service::INVALID_CREDENTIALS)),
        Err(err) => {
            log::error!("Error logging in: {err}");
            HttpResponse::InternalServerError().json(ErrorResponse::new("Error logging in"))
        }
    }
}
