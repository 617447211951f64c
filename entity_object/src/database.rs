//! Connection provider
//!
//! A [`Database`] owns the configuration and lazily creates the driver
//! handle on first use. The handle is memoized for the lifetime of the
//! value; a failed attempt is not, so the next call retries.

use crate::driver::Driver;
use crate::errors::EntityError;
use crate::postgres::PgDriver;
use config::DatabaseConfig;
use futures::future::BoxFuture;
use hook_system::{HookPoint, HookSet};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Builds a driver handle from configuration
pub type Connector = Arc<
    dyn Fn(DatabaseConfig) -> BoxFuture<'static, Result<Arc<dyn Driver>, EntityError>>
        + Send
        + Sync,
>;

pub struct Database {
    config: Option<DatabaseConfig>,
    connector: Option<Connector>,
    handle: OnceCell<Arc<dyn Driver>>,
    hooks: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("dsn", &self.config.as_ref().map(DatabaseConfig::dsn))
            .field("connected", &self.is_connected())
            .field("hook_sets", &self.hooks.len())
            .finish()
    }
}

impl Database {
    /// Store configuration for the bundled PostgreSQL driver. Nothing connects yet.
    pub fn new(config: DatabaseConfig) -> Self {
        Self::with_connector(config, PgDriver::connector())
    }

    /// Store configuration for a custom driver
    pub fn with_connector(config: DatabaseConfig, connector: Connector) -> Self {
        Self {
            config: Some(config),
            connector: Some(connector),
            handle: OnceCell::new(),
            hooks: HashMap::new(),
        }
    }

    /// Wrap an already established driver handle
    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        Self {
            config: None,
            connector: None,
            handle: OnceCell::new_with(Some(driver)),
            hooks: HashMap::new(),
        }
    }

    pub fn config(&self) -> Option<&DatabaseConfig> {
        self.config.as_ref()
    }

    /// Get the driver handle, connecting on first use
    pub async fn get(&self) -> Result<Arc<dyn Driver>, EntityError> {
        let driver = self
            .handle
            .get_or_try_init(|| async {
                let (config, connector) = match (&self.config, &self.connector) {
                    (Some(config), Some(connector)) => (config.clone(), Arc::clone(connector)),
                    _ => {
                        return Err(EntityError::Connection(
                            "no database configuration available".to_string(),
                        ))
                    }
                };

                config.validate().map_err(EntityError::connection)?;

                tracing::debug!("[CONNECT] {}", config.dsn());
                let driver = connector(config).await?;
                tracing::debug!("[CONNECT] Connection established");
                Ok(driver)
            })
            .await?;

        Ok(Arc::clone(driver))
    }

    pub fn is_connected(&self) -> bool {
        self.handle.initialized()
    }

    /// Register the lifecycle callbacks for entity type `T`, replacing any previous set
    pub fn register_hooks<T: Send + Sync + 'static>(&mut self, hooks: HookSet<T>) {
        self.hooks.insert(TypeId::of::<T>(), Box::new(hooks));
    }

    /// Get the callbacks registered for entity type `T`
    pub fn hooks<T: Send + Sync + 'static>(&self) -> Option<&HookSet<T>> {
        self.hooks
            .get(&TypeId::of::<T>())
            .and_then(|hooks| hooks.downcast_ref::<HookSet<T>>())
    }

    /// Run the callbacks for `point`; a type without registered hooks is a no-op
    pub fn run_hooks<T: Send + Sync + 'static>(&self, point: HookPoint, target: &mut T) {
        if let Some(hooks) = self.hooks::<T>() {
            hooks.run(point, target);
        }
    }
}
