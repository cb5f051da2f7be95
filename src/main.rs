use std::{net::SocketAddr, sync::Arc};

use axum::Server;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite};
use tracing_subscriber::EnvFilter;

use crate::repository::{TodoRepository, UserRepository};

mod auth;
mod error;
mod handler;
mod middleware;
mod model;
mod repository;
mod route;
mod schema;

// Struct representing the application state
pub struct AppState {
    pub users: UserRepository,
    pub todos: TodoRepository,
    pub jwt_secret: String,
}

// Entry point of the application
#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://todo.db".to_string());

    // Check if the database exists, if not, create it
    if !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
        tracing::info!("creating database {db_url}");
        if let Err(error) = Sqlite::create_database(&db_url).await {
            tracing::error!("failed to create database: {error}");
            std::process::exit(1);
        }
    }

    // Connect to the database
    let pool = match SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("connected to the database");
            pool
        }
        Err(err) => {
            tracing::error!("failed to connect to the database: {err:?}");
            std::process::exit(1);
        }
    };

    // Create the 'users' and 'todos' tables if they don't exist
    if let Err(err) = repository::create_tables(&pool).await {
        tracing::error!("failed to create tables: {err:?}");
        std::process::exit(1);
    }

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set, using a development-only default");
        "dev-only-secret-do-not-use-in-production".to_string()
    });

    // Create an Arc-wrapped instance of the application state
    let app_state = Arc::new(AppState {
        users: UserRepository::new(pool.clone()),
        todos: TodoRepository::new(pool),
        jwt_secret,
    });

    let app = route::create_router(app_state);

    // Specify the address and port to run the server on
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("BIND_ADDR must be a valid socket address");

    tracing::info!("server listening on {addr}");

    // Start the Axum server
    if let Err(err) = Server::bind(&addr).serve(app.into_make_service()).await {
        tracing::error!("server error: {err}");
        std::process::exit(1);
    }
}
