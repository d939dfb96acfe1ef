use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::routes::{base_context, render_template};
use crate::session::SessionContext;

#[get("/")]
pub async fn show_index(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let user = SessionContext::load(&session);
    let context = base_context(&flash_messages, user.as_ref(), "index");
    render_template(&tera, "main/index.html", &context)
}
