use std::path::Path;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr};

use crate::error::StartupError;

/// Pooled connection to the report store. Cloning the inner connection is
/// cheap; handlers borrow it through the service registry.
pub struct DataContextFactory {
    connection: DatabaseConnection,
}

impl DataContextFactory {
    pub async fn connect(database_url: &str) -> Result<Self, StartupError> {
        let in_memory = database_url.contains(":memory:");

        if !in_memory {
            prepare_sqlite_file(database_url)?;
        }

        let mut options = ConnectOptions::new(database_url);
        if in_memory {
            // every pooled connection would otherwise get its own empty database
            options.max_connections(1).min_connections(1);
        }

        let connection = Database::connect(options).await?;
        tracing::info!(backend = ?connection.get_database_backend(), "data store connected");

        Ok(Self { connection })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn backend(&self) -> DbBackend {
        self.connection.get_database_backend()
    }

    /// Applies pending migrations. Safe to call on an initialized store.
    pub async fn initialize(&self) -> Result<(), StartupError> {
        let pending = Migrator::get_pending_migrations(&self.connection)
            .await
            .map_err(StartupError::StoreInitialization)?;

        if pending.is_empty() {
            tracing::info!("data store schema is up to date");
            return Ok(());
        }

        tracing::info!(pending = pending.len(), "applying data store migrations");
        Migrator::up(&self.connection, None)
            .await
            .map_err(StartupError::StoreInitialization)
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}

/// sqlite creates the file (`mode=rwc`) but not its parent directories.
fn prepare_sqlite_file(database_url: &str) -> Result<(), StartupError> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };

    let file = rest.split('?').next().unwrap_or(rest);
    let Some(parent) = Path::new(file).parent() else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    std::fs::create_dir_all(parent).map_err(|source| StartupError::DataDirectory {
        path: parent.to_path_buf(),
        source,
    })
}
