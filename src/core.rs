//! Core Accessor functionality
//!
//! This module contains the main Accessor struct, which owns the shared
//! database handle and the lifecycle hooks registered for each entity type.

use std::sync::Arc;

use config::{AppConfig, DatabaseConfig};
use entity_object::driver::{Driver, Statement, StatementKind};
use entity_object::Database;
use hook_system::HookSet;

use crate::errors::AccessorError;

/// Main Accessor coordinator
///
/// Construct it once and pass [`Accessor::database`] to every entity
/// operation. Nothing connects until the first operation runs.
#[derive(Debug)]
pub struct Accessor {
    database: Database,
}

impl Accessor {
    /// Create a coordinator for the bundled PostgreSQL driver
    pub fn new(config: DatabaseConfig) -> Self {
        crate::debug_log!("[ACCESSOR] Configured for {}", config.dsn());
        Self {
            database: Database::new(config),
        }
    }

    pub fn from_app_config(config: AppConfig) -> Self {
        Self::new(config.database)
    }

    /// Load configuration from the file named by `ACCESSOR_CONFIG` (or `.env`),
    /// falling back to `./accessor.toml`
    pub fn load() -> Result<Self, AccessorError> {
        Ok(Self::from_app_config(AppConfig::load()?))
    }

    /// Wrap an existing connection provider, e.g. one built around a custom driver
    pub fn with_database(database: Database) -> Self {
        Self { database }
    }

    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        Self::with_database(Database::with_driver(driver))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }

    /// Register lifecycle callbacks for entity type `T`
    pub fn register_hooks<T: Send + Sync + 'static>(&mut self, hooks: HookSet<T>) {
        crate::trace_log!(
            "[ACCESSOR] Registering {} hooks for {}",
            hooks.callback_count(),
            std::any::type_name::<T>()
        );
        self.database.register_hooks(hooks);
    }

    /// Connect if needed and run a trivial query
    pub async fn health_check(&self) -> Result<(), AccessorError> {
        let driver = self.database.get().await?;
        driver
            .fetch_all(&Statement::new(StatementKind::Select, "SELECT 1;"))
            .await?;
        crate::debug_log!("[ACCESSOR] Health check passed");
        Ok(())
    }
}
