//! PostgreSQL persistence for clips and generated videos.
//!
//! Repositories are zero-sized structs taking `&PgPool`; [`store`] adapts
//! them to the `reelgen_core` storage traits.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{PgClipCatalog, PgJobStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
