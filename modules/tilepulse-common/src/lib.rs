pub mod config;
pub mod error;
pub mod geo;
pub mod tile;

pub use config::Config;
pub use error::TilePulseError;
pub use geo::{BoundingBox, GeoPoint, MERCATOR_MAX_LAT};
pub use tile::{dedup_tiles, TileCoordinate, MAX_ZOOM};
