//! Connection configuration and connection caching.
//!
//! Connections are cached by the fingerprint of their [`ConnectionConfig`], so
//! builders created from structurally identical configs share one handle.
//!
//! # Example
//!
//! ```ignore
//! use sqldrawer::pool::{ConnectionConfig, Connector};
//!
//! let config = ConnectionConfig::new("mysql")
//!     .host("127.0.0.1")
//!     .port(3306)
//!     .database("blog");
//! let connector = Connector::new(MyDriverFactory::default());
//! let conn = connector.acquire(&config)?;
//! ```

use crate::client::Connection;
use crate::error::{DrawerError, DrawerResult, DriverError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

/// Database connection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub driver: String,
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    /// Driver specific options.
    pub options: BTreeMap<String, serde_json::Value>,
}

impl ConnectionConfig {
    /// Create a configuration for `driver` with everything else empty.
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            ..Self::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Set one driver option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Stable identity of this configuration.
    ///
    /// BLAKE3 over the canonical JSON form with keys sorted at every level.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.canonical_json().to_string().as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    fn canonical_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("charset".into(), self.charset.clone().into());
        map.insert("database".into(), self.database.clone().into());
        map.insert("driver".into(), self.driver.clone().into());
        map.insert("host".into(), self.host.clone().into());
        map.insert(
            "options".into(),
            serde_json::Value::Object(self.options.clone().into_iter().collect()),
        );
        map.insert("password".into(), self.password.clone().into());
        map.insert("port".into(), self.port.into());
        map.insert("username".into(), self.username.clone().into());
        serde_json::Value::Object(map)
    }
}

/// Creates physical connections. Supplied by the integrator.
pub trait ConnectionFactory: Send + Sync {
    fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>, DriverError>;
}

impl<F> ConnectionFactory for F
where
    F: Fn(&ConnectionConfig) -> Result<Arc<dyn Connection>, DriverError> + Send + Sync,
{
    fn connect(&self, config: &ConnectionConfig) -> Result<Arc<dyn Connection>, DriverError> {
        self(config)
    }
}

/// Hands out connections for a configuration.
pub trait ConnectionPool: Send + Sync {
    fn acquire(&self, config: &ConnectionConfig) -> DrawerResult<Arc<dyn Connection>>;
}

/// Caches one connection per config fingerprint.
pub struct Connector<F> {
    factory: F,
    connections: Mutex<HashMap<String, Arc<dyn Connection>>>,
}

impl<F: ConnectionFactory> Connector<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached connections.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the cached connection for `config`. Returns whether one existed.
    pub fn release(&self, config: &ConnectionConfig) -> bool {
        self.lock().remove(&config.fingerprint()).is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<dyn Connection>>> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: ConnectionFactory> ConnectionPool for Connector<F> {
    fn acquire(&self, config: &ConnectionConfig) -> DrawerResult<Arc<dyn Connection>> {
        let key = config.fingerprint();
        let mut connections = self.lock();
        if let Some(conn) = connections.get(&key) {
            return Ok(Arc::clone(conn));
        }

        let conn = self
            .factory
            .connect(config)
            .map_err(DrawerError::Connection)?;
        tracing::debug!(
            target: "sqldrawer.pool",
            driver = %config.driver,
            host = %config.host,
            database = %config.database,
            "opened connection"
        );
        connections.insert(key, Arc::clone(&conn));
        Ok(conn)
    }
}

impl<P: ConnectionPool + ?Sized> ConnectionPool for Arc<P> {
    fn acquire(&self, config: &ConnectionConfig) -> DrawerResult<Arc<dyn Connection>> {
        (**self).acquire(config)
    }
}
