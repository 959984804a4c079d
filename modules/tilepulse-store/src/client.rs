use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use tilepulse_common::TilePulseError;

use crate::query::{QuerySpec, QueryValue};
use crate::rows::{EdgeRow, TileRow};

/// Thin wrapper around a Postgres pool providing connection setup and
/// positional-placeholder query execution.
#[derive(Clone)]
pub struct StoreClient {
    pool: PgPool,
}

impl StoreClient {
    /// Connect to the tile store with the given connection string.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn inner(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) async fn fetch_tile_rows(
        &self,
        spec: &QuerySpec,
    ) -> Result<Vec<TileRow>, TilePulseError> {
        debug!(sql = %spec.sql, params = spec.params.len(), "Executing tile query");
        let mut query = sqlx::query_as::<_, TileRow>(&spec.sql);
        for param in &spec.params {
            query = bind_value(query, param);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TilePulseError::Database(e.to_string()))
    }

    pub(crate) async fn fetch_edge_rows(
        &self,
        spec: &QuerySpec,
    ) -> Result<Vec<EdgeRow>, TilePulseError> {
        debug!(sql = %spec.sql, params = spec.params.len(), "Executing edge query");
        let mut query = sqlx::query_as::<_, EdgeRow>(&spec.sql);
        for param in &spec.params {
            query = bind_value(query, param);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TilePulseError::Database(e.to_string()))
    }
}

/// Bind a parameter in placeholder order. Values are owned copies so the
/// query can outlive the spec borrow.
fn bind_value<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    param: &QueryValue,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match param {
        QueryValue::Int(v) => query.bind(*v),
        QueryValue::Text(v) => query.bind(v.clone()),
        QueryValue::Timestamp(v) => query.bind(*v),
    }
}
