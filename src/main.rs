use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, App, HttpServer};
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;

use taskhub::{
    auth::{PasswordHasher, SystemClock, TokenService},
    config::{Config, StorageBackend},
    routes,
    state::AppState,
    store::{InMemoryTaskStore, InMemoryUserStore, PgTaskStore, PgUserStore, TaskStore, UserStore},
};

fn io_error(err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

async fn open_stores(config: &Config) -> io::Result<(Arc<dyn UserStore>, Arc<dyn TaskStore>)> {
    match config.storage {
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; all data is lost on shutdown");
            Ok((
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemoryTaskStore::new()),
            ))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| io_error("DATABASE_URL must be set"))?;
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(url)
                .await
                .map_err(io_error)?;
            sqlx::migrate!().run(&pool).await.map_err(io_error)?;
            log::info!("Database migrations applied");

            Ok((
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgTaskStore::new(pool)),
            ))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io_error(e)
    })?;
    log::debug!("Loaded {:?}", config);

    let (users, tasks) = open_stores(&config).await?;
    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        Duration::hours(config.jwt_expiration_hours),
        Arc::new(SystemClock),
    ));
    let state = AppState::new(users, tasks, PasswordHasher::new(config.bcrypt_cost), tokens)
        .map_err(io_error)?;

    log::info!("Starting taskhub server at {}", config.server_url());
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::ORIGIN,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .service(routes::health::health)
            .configure(|cfg| routes::config(cfg, &state))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
