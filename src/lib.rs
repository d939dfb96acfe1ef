#[cfg(feature = "server")]
use std::sync::Arc;
#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::{establish_connection_pool, run_migrations};
#[cfg(feature = "server")]
use crate::domain::{member::Member, post::Post};
#[cfg(feature = "server")]
use crate::middleware::redirect_unauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::api::api_users;
#[cfg(feature = "server")]
use crate::routes::auth::{api_login, login, logout, show_login};
#[cfg(feature = "server")]
use crate::routes::dashboard::{refresh_dashboard, search_dashboard, show_dashboard};
#[cfg(feature = "server")]
use crate::routes::main::show_index;
#[cfg(feature = "server")]
use crate::routes::members::{refresh_members, search_members, show_members};
#[cfg(feature = "server")]
use crate::services::listing::ListingService;
#[cfg(feature = "server")]
use crate::sources::HttpItemSource;

pub mod db;
pub mod domain;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;
pub mod search;
pub mod view;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;
#[cfg(feature = "server")]
pub mod sources;

/// Registers every route. Page routes that need a login answer `401` from the
/// [`session::SessionContext`] extractor, which the page scope turns into a
/// redirect to the login form.
#[cfg(feature = "server")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").service(api_login).service(api_users))
        .service(show_index)
        .service(show_login)
        .service(login)
        .service(logout)
        .service(
            web::scope("")
                .wrap(redirect_unauthorized())
                .service(show_dashboard)
                .service(search_dashboard)
                .service(refresh_dashboard)
                .service(show_members)
                .service(search_members)
                .service(refresh_members),
        );
}

#[cfg(feature = "server")]
fn session_middleware(
    server_config: &ServerConfig,
    secret_key: Key,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), secret_key)
        .cookie_secure(false) // set to true in prod
        .cookie_domain(server_config.domain.as_ref().map(|d| format!(".{d}")))
        .build()
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // `Key::from` panics on shorter input.
    if server_config.secret.len() < 64 {
        return Err(std::io::Error::other(
            "secret must be at least 64 bytes long",
        ));
    }

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;
    run_migrations(&pool)
        .map_err(|e| std::io::Error::other(format!("Failed to run migrations: {e}")))?;

    let repo = DieselRepository::new(pool);

    let fetch_timeout = Duration::from_secs(server_config.fetch_timeout_secs);
    let posts_source = HttpItemSource::<Post>::new(&server_config.posts_url, fetch_timeout)
        .map_err(|e| std::io::Error::other(format!("Failed to build posts client: {e}")))?;
    let members_source = HttpItemSource::<Member>::new(&server_config.members_url, fetch_timeout)
        .map_err(|e| std::io::Error::other(format!("Failed to build members client: {e}")))?;

    let posts = web::Data::new(ListingService::new(
        Arc::new(posts_source),
        server_config.posts_view,
    ));
    let members = web::Data::new(ListingService::new(
        Arc::new(members_source),
        server_config.members_view,
    ));

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(session_middleware(&server_config, secret_key.clone()))
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(posts.clone())
            .app_data(members.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
