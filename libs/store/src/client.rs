// [libs/store/src/client.rs]
use std::sync::Arc;

use libsql::{Builder, Connection, Database};
use tracing::{info, instrument};

use crate::errors::StoreError;
use crate::schema;

/// A handle to the underlying libSQL database. Cheaply clonable — each
/// caller opens its own `Connection` from the shared driver.
#[derive(Clone)]
pub struct StoreClient {
    database: Arc<Database>,
    /// Keeps an in-memory database alive for the process lifetime. Without
    /// a held connection, SQLite drops an in-memory database as soon as the
    /// last connection to it closes.
    _memory_anchor: Option<Arc<Connection>>,
}

impl StoreClient {
    #[instrument(skip(auth_token))]
    pub async fn connect(database_url: &str, auth_token: Option<String>) -> Result<Self, StoreError> {
        if database_url.is_empty() {
            return Err(StoreError::Connection("DATABASE_URL is not set".into()));
        }

        let is_remote = database_url.starts_with("libsql://") || database_url.starts_with("https://");
        let is_memory = database_url.contains(":memory:");

        info!(url = database_url, remote = is_remote, "connecting to store");

        let database = if is_remote {
            let token = auth_token
                .ok_or_else(|| StoreError::Connection("TURSO_AUTH_TOKEN is required for remote URLs".into()))?;
            Builder::new_remote(database_url.to_string(), token)
                .build()
                .await
        } else {
            Builder::new_local(database_url).build().await
        }
        .map_err(|err| StoreError::Connection(err.to_string()))?;

        let database = Arc::new(database);

        let bootstrap_connection = database
            .connect()
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        schema::apply(&bootstrap_connection)
            .await
            .map_err(|err| StoreError::Connection(err.to_string()))?;

        let memory_anchor = is_memory.then(|| Arc::new(bootstrap_connection));

        Ok(Self {
            database,
            _memory_anchor: memory_anchor,
        })
    }

    pub fn connection(&self) -> Result<Connection, StoreError> {
        self.database
            .connect()
            .map_err(|err| StoreError::Connection(err.to_string()))
    }
}
