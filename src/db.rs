use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseSettings;
use crate::errors::AppError;

#[tracing::instrument(name = "Connect to database", skip(settings), fields(max_connections = settings.max_connections))]
pub async fn init_db(settings: &DatabaseSettings) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await
        .map_err(|e| {
            tracing::error!("Error connecting to database: {:?}", e);
            AppError::Database(anyhow::Error::new(e).context("Connecting to the database failed"))
        })?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::debug!("Database migrations applied");

    Ok(pool)
}
