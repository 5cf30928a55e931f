//! Lazily-opened, process-wide MongoDB connection.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tokio::sync::OnceCell;
use url::Url;

use crate::config::loader::MONGODB_URI_ENV;
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::store::mongo::ItemDocument;

/// Database used when the connection string names none.
pub const DEFAULT_DATABASE_NAME: &str = "inventory";

/// Holds the single client handle for the process.
///
/// The first call to [`Connector::collection`] connects and pings; later
/// calls return the cached collection. Concurrent first calls share one
/// attempt. A failed attempt is not cached, so the next caller tries again.
pub struct Connector {
    settings: DatabaseConfig,
    collection: OnceCell<Collection<ItemDocument>>,
}

impl Connector {
    pub fn new(settings: DatabaseConfig) -> Self {
        Self {
            settings,
            collection: OnceCell::new(),
        }
    }

    /// Whether a connection has been established.
    pub fn is_connected(&self) -> bool {
        self.collection.initialized()
    }

    /// Name of the database this connector targets.
    pub fn database_name(&self) -> Result<String> {
        let uri = self.uri()?;
        Ok(self
            .settings
            .name
            .clone()
            .unwrap_or_else(|| resolve_database_name(uri)))
    }

    /// The item collection, connecting on first use.
    pub async fn collection(&self) -> Result<&Collection<ItemDocument>> {
        self.collection.get_or_try_init(|| self.connect()).await
    }

    fn uri(&self) -> Result<&str> {
        self.settings
            .uri
            .as_deref()
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| Error::Configuration(format!("{} is not set", MONGODB_URI_ENV)))
    }

    async fn connect(&self) -> Result<Collection<ItemDocument>> {
        let uri = self.uri()?;
        let db_name = self.database_name()?;

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| Error::Connection(format!("invalid connection string: {}", e)))?;
        options.max_pool_size = Some(self.settings.max_pool_size);
        options.server_selection_timeout =
            Some(Duration::from_secs(self.settings.server_selection_timeout_secs));
        options.connect_timeout = Some(Duration::from_secs(self.settings.connect_timeout_secs));
        options.app_name = Some(self.settings.app_name.clone());

        tracing::info!(
            database = %db_name,
            collection = %self.settings.collection,
            "Connecting to MongoDB"
        );

        let client = Client::with_options(options).map_err(|e| Error::Connection(e.to_string()))?;
        let database = client.database(&db_name);

        if let Err(e) = database.run_command(doc! { "ping": 1 }).await {
            tracing::error!(database = %db_name, error = %e, "MongoDB ping failed");
            return Err(Error::Connection(e.to_string()));
        }

        tracing::info!(database = %db_name, "MongoDB connection established");
        Ok(database.collection(&self.settings.collection))
    }
}

/// Database name from the path of a connection string.
///
/// Falls back to the last `/` segment (minus any query) when the string is
/// not a URL, and to [`DEFAULT_DATABASE_NAME`] when nothing is named.
pub fn resolve_database_name(uri: &str) -> String {
    let name = match Url::parse(uri) {
        Ok(url) => {
            let path = url.path();
            path.strip_prefix('/').unwrap_or(path).to_string()
        }
        Err(_) => uri
            .rsplit('/')
            .next()
            .and_then(|segment| segment.split('?').next())
            .unwrap_or_default()
            .to_string(),
    };

    if name.is_empty() {
        DEFAULT_DATABASE_NAME.to_string()
    } else {
        name
    }
}
