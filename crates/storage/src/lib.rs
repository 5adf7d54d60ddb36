use async_trait::async_trait;
use sqlx::{pool::PoolConnection, postgres::PgPoolOptions, PgPool, Postgres};
use thiserror::Error;

use geo_backend_core::{AcquireError, DomainConnection, DomainPool, StatementError};

/// Top-level database handle that owns the Postgres connection pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Establishes a new Postgres connection pool for the provided connection string.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(StorageError::Connect)?;

        Ok(Self { pool })
    }

    /// Exposes the inner pool when lower level access is required.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// General storage level errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to postgres: {0}")]
    Connect(sqlx::Error),
}

/// One leased connection checked out of the pool.
///
/// Dropping the lease returns the underlying connection to the pool, which
/// is how the provisioning service's release-on-every-exit-path contract is
/// met.
pub struct ConnectionLease {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl DomainPool for Database {
    type Connection = ConnectionLease;

    async fn acquire(&self) -> Result<Self::Connection, AcquireError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|err| AcquireError(Box::new(err)))?;
        Ok(ConnectionLease { conn })
    }
}

#[async_trait]
impl DomainConnection for ConnectionLease {
    async fn execute(&mut self, statement: &str) -> Result<(), StatementError> {
        sqlx::query(statement)
            .execute(&mut *self.conn)
            .await
            .map(|_| ())
            .map_err(|err| StatementError(Box::new(err)))
    }
}
