use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

use crate::errors::ModelError;
use crate::{product, user};

/// Open the shared connection pool described by the deployment profile.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> Result<DatabaseConnection, ModelError> {
    if !cfg.is_configured() {
        return Err(ModelError::Validation(
            "database.url is empty; set it in the profile or via DATABASE_URL".into(),
        ));
    }
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    info!(
        backend = ?db.get_database_backend(),
        max_connections = cfg.max_connections,
        "database pool ready"
    );
    if cfg.sync_schema {
        sync_schema(&db).await?;
    }
    Ok(db)
}

/// Single-connection in-memory sqlite database with every table created.
/// Each call yields an independent, empty store.
pub async fn connect_in_memory() -> Result<DatabaseConnection, ModelError> {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    // the database lives inside its only connection
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    sync_schema(&db).await?;
    Ok(db)
}

/// Create missing tables from the entity definitions. Existing tables are
/// left untouched; this does not alter columns.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), ModelError> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statements = [
        schema.create_table_from_entity(user::Entity),
        schema.create_table_from_entity(product::Entity),
    ];
    for stmt in statements.iter_mut() {
        stmt.if_not_exists();
        db.execute(backend.build(&*stmt)).await?;
    }
    info!("schema synchronized");
    Ok(())
}
