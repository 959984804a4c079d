use tilepulse_common::{TileCoordinate, TilePulseError};

use crate::client::StoreClient;
use crate::query::{computed_edges_query, computed_tiles_query, TileFilter};
use crate::rows::{edges_from_rows, features_from_rows, EdgeFeature, TileFeature};

/// Read-side entry point for the precomputed aggregates. Builds one
/// positional-placeholder query per request, executes it once, and maps
/// the rows into response features. No caching, no retries; pool
/// management belongs to the client.
pub struct TileReader {
    client: StoreClient,
}

impl TileReader {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }

    /// Per-tile sentiment/mention aggregates for the given tiles.
    pub async fn computed_tiles(
        &self,
        filter: &TileFilter,
        tiles: &[TileCoordinate],
    ) -> Result<Vec<TileFeature>, TilePulseError> {
        let spec = computed_tiles_query(filter, tiles)?;
        let rows = self.client.fetch_tile_rows(&spec).await?;
        Ok(features_from_rows(rows))
    }

    /// Keyword aggregates across the given tiles.
    pub async fn computed_edges(
        &self,
        filter: &TileFilter,
        tiles: &[TileCoordinate],
    ) -> Result<Vec<EdgeFeature>, TilePulseError> {
        let spec = computed_edges_query(filter, tiles)?;
        let rows = self.client.fetch_edge_rows(&spec).await?;
        Ok(edges_from_rows(rows))
    }
}
