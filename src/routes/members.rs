use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::member::Member;
use crate::forms::listing::{NavigationQuery, SearchForm};
use crate::routes::{base_context, redirect, render_template};
use crate::services::listing::ListingService;
use crate::session::{MEMBERS_VIEW_KEY, SessionContext, load_view_state, store_view_state};

/// Member row with the derived avatar initials.
#[derive(serde::Serialize)]
struct MemberRow<'a> {
    #[serde(flatten)]
    member: &'a Member,
    initials: String,
}

#[get("/team/members")]
pub async fn show_members(
    user: SessionContext,
    session: Session,
    params: web::Query<NavigationQuery>,
    members: web::Data<ListingService<Member>>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let state = load_view_state(&session, MEMBERS_VIEW_KEY);
    let data = members.show(&user, state, params.into_inner()).await;
    store_view_state(&session, MEMBERS_VIEW_KEY, &data.state);

    let rows = data.listing.as_ref().map(|listing| {
        listing
            .items
            .iter()
            .map(|member| MemberRow {
                member,
                initials: member.initials(),
            })
            .collect::<Vec<_>>()
    });

    let mut context = base_context(&flash_messages, Some(&user), "members");
    context.insert("members", &data.listing);
    context.insert("rows", &rows);
    context.insert("error", &data.error);
    context.insert("search_query", &data.query);

    render_template(&tera, "team/members.html", &context)
}

#[post("/team/members/search")]
pub async fn search_members(
    _user: SessionContext,
    session: Session,
    members: web::Data<ListingService<Member>>,
    web::Form(form): web::Form<SearchForm>,
) -> impl Responder {
    let state = load_view_state(&session, MEMBERS_VIEW_KEY);
    match members.search(state, &form).await {
        Ok(state) => store_view_state(&session, MEMBERS_VIEW_KEY, &state),
        Err(err) => FlashMessage::error(err.to_string()).send(),
    }
    redirect("/team/members")
}

#[post("/team/members/refresh")]
pub async fn refresh_members(
    user: SessionContext,
    members: web::Data<ListingService<Member>>,
) -> impl Responder {
    match members.refresh(&user).await {
        Ok(count) => FlashMessage::info(format!("Loaded {count} members.")).send(),
        Err(err) => {
            log::warn!("Members refresh failed: {err}");
            FlashMessage::error(err.to_string()).send();
        }
    }
    redirect("/team/members")
}
