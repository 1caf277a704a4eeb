//! Notes API
//!
//! User lifecycle management for a notes service:
//! - Case-insensitive unique usernames
//! - Argon2 password hashing
//! - Deletion guarded by note ownership
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::{AppState, UserServiceTrait};
use infrastructure::{
    note::{InMemoryNoteRepository, PostgresNoteRepository},
    storage::{self, run_migrations, PostgresConfig, StorageType},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state for the configured storage backend.
/// The PostgreSQL backend applies pending migrations before serving.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend: StorageType = config.storage.backend.parse()?;
    info!("Storage backend: {:?}", backend);

    let hasher = Arc::new(Argon2Hasher::new());

    let user_service: Arc<dyn UserServiceTrait> = match backend {
        StorageType::InMemory => Arc::new(UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryNoteRepository::new()),
            hasher,
        )),
        StorageType::Postgres => {
            let pg_config = PostgresConfig::from_settings(&config.storage)?;

            info!("Connecting to PostgreSQL...");
            let pool = storage::connect(&pg_config).await?;
            info!("PostgreSQL connection established");

            let applied = run_migrations(&pool).await?;
            info!(applied, "Database schema up to date");

            Arc::new(UserService::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresNoteRepository::new(pool)),
                hasher,
            ))
        }
    };

    Ok(AppState::new(user_service))
}
