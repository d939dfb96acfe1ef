use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::post::Post;
use crate::forms::listing::{NavigationQuery, SearchForm};
use crate::routes::{base_context, redirect, render_template};
use crate::services::listing::ListingService;
use crate::session::{POSTS_VIEW_KEY, SessionContext, load_view_state, store_view_state};

#[get("/dashboard")]
pub async fn show_dashboard(
    user: SessionContext,
    session: Session,
    params: web::Query<NavigationQuery>,
    posts: web::Data<ListingService<Post>>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let state = load_view_state(&session, POSTS_VIEW_KEY);
    let data = posts.show(&user, state, params.into_inner()).await;
    store_view_state(&session, POSTS_VIEW_KEY, &data.state);

    let mut context = base_context(&flash_messages, Some(&user), "dashboard");
    context.insert("posts", &data.listing);
    context.insert("error", &data.error);
    context.insert("search_query", &data.query);

    render_template(&tera, "dashboard/index.html", &context)
}

#[post("/dashboard/search")]
pub async fn search_dashboard(
    _user: SessionContext,
    session: Session,
    posts: web::Data<ListingService<Post>>,
    web::Form(form): web::Form<SearchForm>,
) -> impl Responder {
    let state = load_view_state(&session, POSTS_VIEW_KEY);
    match posts.search(state, &form).await {
        Ok(state) => store_view_state(&session, POSTS_VIEW_KEY, &state),
        Err(err) => FlashMessage::error(err.to_string()).send(),
    }
    redirect("/dashboard")
}

#[post("/dashboard/refresh")]
pub async fn refresh_dashboard(
    user: SessionContext,
    posts: web::Data<ListingService<Post>>,
) -> impl Responder {
    match posts.refresh(&user).await {
        Ok(count) => FlashMessage::info(format!("Loaded {count} posts.")).send(),
        Err(err) => {
            log::warn!("Posts refresh failed: {err}");
            FlashMessage::error(err.to_string()).send();
        }
    }
    redirect("/dashboard")
}
