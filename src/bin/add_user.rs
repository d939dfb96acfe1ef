//! Creates a login account, or resets the password of an existing one.

use clap::Parser;
use dotenvy::dotenv;

use pushkind_dashboard::db::{establish_connection_pool, run_migrations};
use pushkind_dashboard::domain::types::{UserEmail, UserName};
use pushkind_dashboard::domain::user::NewUser;
use pushkind_dashboard::models::config::load_server_config;
use pushkind_dashboard::repository::{DieselRepository, UserWriter};
use pushkind_dashboard::services::auth::hash_password;

#[derive(Parser)]
#[command(name = "add_user")]
#[command(about = "Create or update a dashboard login")]
struct Cli {
    email: String,
    password: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    role: Option<String>,
}

fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    if let Err(err) = add_user(cli) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn add_user(cli: Cli) -> Result<(), String> {
    let server_config =
        load_server_config().map_err(|e| format!("Error loading server config: {e}"))?;

    let email = UserEmail::new(cli.email).map_err(|e| format!("Invalid email: {e}"))?;
    let name = cli
        .name
        .map(UserName::new)
        .transpose()
        .map_err(|e| format!("Invalid name: {e}"))?;
    if cli.password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    let password_hash = hash_password(&cli.password).map_err(|e| e.to_string())?;

    let pool = establish_connection_pool(&server_config.database_url)
        .map_err(|e| format!("Failed to establish database connection: {e}"))?;
    run_migrations(&pool)?;

    let repo = DieselRepository::new(pool);
    let user = repo
        .create_or_update_user(&NewUser::new(email, name, cli.role, password_hash))
        .map_err(|e| format!("Failed to save user: {e}"))?;

    log::info!("Saved user {} (id {})", user.email, user.id);
    Ok(())
}
