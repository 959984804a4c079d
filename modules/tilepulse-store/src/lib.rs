pub mod client;
pub mod query;
pub mod reader;
pub mod rows;
#[cfg(feature = "test-utils")]
pub mod testutil;

pub use client::StoreClient;
pub use query::{computed_edges_query, computed_tiles_query, QuerySpec, QueryValue, TileFilter};
pub use reader::TileReader;
pub use rows::{
    edges_from_rows, features_from_rows, ComputedFeatures, EdgeFeature, EdgeRow,
    SentimentAverages, TileFeature, TileRow,
};
