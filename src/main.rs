use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, App, HttpServer};
use std::sync::Arc;

use tasknest::auth::token::ACCESS_TOKEN_TTL_SECS;
use tasknest::auth::{PasswordHasher, TokenService};
use tasknest::config::Config;
use tasknest::csrf::{CsrfMiddleware, CSRF_HEADER_NAME};
use tasknest::routes;
use tasknest::state::AppState;
use tasknest::store::{MemoryStore, PgStore, TaskStore, UserStore};

const MEMORY_DATABASE_URL: &str = "memory://";

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

async fn open_store(database_url: &str) -> std::io::Result<(Arc<dyn UserStore>, Arc<dyn TaskStore>)> {
    if database_url == MEMORY_DATABASE_URL {
        log::warn!("Using the in-memory store; data is lost on restart");
        let store = Arc::new(MemoryStore::new());
        let users: Arc<dyn UserStore> = store.clone();
        let tasks: Arc<dyn TaskStore> = store;
        return Ok((users, tasks));
    }
    let store = Arc::new(PgStore::connect(database_url).await.map_err(io_error)?);
    let users: Arc<dyn UserStore> = store.clone();
    let tasks: Arc<dyn TaskStore> = store;
    Ok((users, tasks))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(io_error)?;
    log::debug!("Loaded configuration: {:?}", config);

    let (user_store, task_store) = open_store(&config.database_url).await?;
    let state = AppState::new(
        user_store,
        task_store,
        PasswordHasher::default(),
        TokenService::new(&config.jwt_secret, ACCESS_TOKEN_TTL_SECS),
        config.cookie_same_site,
    );

    let allowed_origins = config.allowed_origins.clone();
    log::info!("Starting tasknest server at {}", config.server_url());

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .supports_credentials()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .allowed_header(CSRF_HEADER_NAME)
            .max_age(3600);

        let state = state.clone();
        App::new()
            .wrap(CsrfMiddleware)
            .wrap(cors)
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, &state))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
