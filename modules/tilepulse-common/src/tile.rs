use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Highest zoom level the API accepts. Precomputed aggregates exist only up
/// to this depth, and tile counts grow as 4^zoom beyond it.
pub const MAX_ZOOM: u8 = 18;

/// Slippy-map tile index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoordinate {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

impl TileCoordinate {
    /// Project a WGS84 degree coordinate onto the slippy-map tile grid.
    ///
    /// Standard OSM tiling: n = 2^zoom, x from the longitude fraction, y
    /// from the Mercator latitude. Indices are clamped into [0, n-1] so the
    /// lon = 180 edge lands on the easternmost column instead of walking
    /// off the grid. Latitude must stay within the Mercator domain
    /// (enforced upstream, see `MERCATOR_MAX_LAT`).
    pub fn from_degrees(lat_deg: f64, lon_deg: f64, zoom: u8) -> Self {
        let n = (1u64 << zoom) as f64;
        let lat_rad = lat_deg.to_radians();
        let x = ((lon_deg + 180.0) / 360.0 * n).floor();
        let y = ((1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n).floor();
        let max = n - 1.0;
        Self {
            x: x.clamp(0.0, max) as u32,
            y: y.clamp(0.0, max) as u32,
            zoom,
        }
    }
}

/// Drop duplicate tiles while preserving first-seen order. Corner tiles of
/// a small fence often coincide at low zoom.
pub fn dedup_tiles(tiles: impl IntoIterator<Item = TileCoordinate>) -> Vec<TileCoordinate> {
    let mut unique: Vec<TileCoordinate> = Vec::new();
    for tile in tiles {
        if !unique.contains(&tile) {
            unique.push(tile);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_tile_zero() {
        let tile = TileCoordinate::from_degrees(0.0, 0.0, 0);
        assert_eq!(
            tile,
            TileCoordinate {
                x: 0,
                y: 0,
                zoom: 0
            }
        );
    }

    #[test]
    fn projection_is_deterministic() {
        let a = TileCoordinate::from_degrees(47.6, -122.3, 12);
        let b = TileCoordinate::from_degrees(47.6, -122.3, 12);
        assert_eq!(a, b);
    }

    #[test]
    fn far_west_high_latitude_lands_in_west_column() {
        let tile = TileCoordinate::from_degrees(85.0, -179.0, 1);
        assert_eq!(tile.x, 0);
        assert_eq!(tile.y, 0);
        assert_eq!(tile.zoom, 1);
    }

    #[test]
    fn antimeridian_clamps_to_east_column() {
        let tile = TileCoordinate::from_degrees(0.0, 180.0, 1);
        assert_eq!(tile.x, 1);
    }

    #[test]
    fn quadrants_map_to_distinct_tiles_at_zoom_one() {
        let nw = TileCoordinate::from_degrees(40.0, -100.0, 1);
        let ne = TileCoordinate::from_degrees(40.0, 100.0, 1);
        let sw = TileCoordinate::from_degrees(-40.0, -100.0, 1);
        let se = TileCoordinate::from_degrees(-40.0, 100.0, 1);
        assert_eq!((nw.x, nw.y), (0, 0));
        assert_eq!((ne.x, ne.y), (1, 0));
        assert_eq!((sw.x, sw.y), (0, 1));
        assert_eq!((se.x, se.y), (1, 1));
    }

    #[test]
    fn y_grows_southward() {
        let north = TileCoordinate::from_degrees(60.0, 10.0, 8);
        let south = TileCoordinate::from_degrees(-60.0, 10.0, 8);
        assert!(south.y > north.y);
    }

    #[test]
    fn dedup_preserves_first_seen_order() {
        let a = TileCoordinate {
            x: 1,
            y: 2,
            zoom: 3,
        };
        let b = TileCoordinate {
            x: 4,
            y: 5,
            zoom: 3,
        };
        let unique = dedup_tiles([a, b, a, b, a]);
        assert_eq!(unique, vec![a, b]);
    }
}
