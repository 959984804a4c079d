use serde::{Deserialize, Serialize};

use crate::error::TilePulseError;
use crate::tile::{dedup_tiles, TileCoordinate};

/// Latitude bound of the Web Mercator projection. The tile projection is
/// undefined beyond this, so coordinates outside are rejected at parse time.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TilePulseError> {
        if !latitude.is_finite() || latitude.abs() > MERCATOR_MAX_LAT {
            return Err(TilePulseError::Validation(format!(
                "latitude {latitude} is outside the projectable range of +/-{MERCATOR_MAX_LAT}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TilePulseError::Validation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse a `[latitude, longitude]` pair as supplied in location-list
    /// arguments.
    pub fn from_pair(pair: &[f64]) -> Result<Self, TilePulseError> {
        if pair.len() != 2 {
            return Err(TilePulseError::Validation(format!(
                "location must be a [latitude, longitude] pair, got {} values",
                pair.len()
            )));
        }
        Self::new(pair[0], pair[1])
    }

    pub fn tile(&self, zoom: u8) -> TileCoordinate {
        TileCoordinate::from_degrees(self.latitude, self.longitude, zoom)
    }
}

/// Geographic fence parsed from an ordered `[north, west, south, east]`
/// argument list.
///
/// Parsing enforces the coordinate domain (the projection is undefined
/// outside it); edge ordering is taken as given, since the corner
/// projection handles swapped or degenerate fences either way round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn from_slice(values: &[f64]) -> Result<Self, TilePulseError> {
        if values.len() != 4 {
            return Err(TilePulseError::Validation(format!(
                "bounding box must contain exactly 4 values (north, west, south, east), got {}",
                values.len()
            )));
        }
        let (north, west, south, east) = (values[0], values[1], values[2], values[3]);
        GeoPoint::new(north, west)?;
        GeoPoint::new(south, east)?;
        Ok(Self {
            north,
            west,
            south,
            east,
        })
    }

    /// Corner points in NW, SW, NE, SE order.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [
            GeoPoint {
                latitude: self.north,
                longitude: self.west,
            },
            GeoPoint {
                latitude: self.south,
                longitude: self.west,
            },
            GeoPoint {
                latitude: self.north,
                longitude: self.east,
            },
            GeoPoint {
                latitude: self.south,
                longitude: self.east,
            },
        ]
    }

    /// Tiles covering the four corners at `zoom`, duplicates dropped.
    pub fn corner_tiles(&self, zoom: u8) -> Vec<TileCoordinate> {
        dedup_tiles(self.corners().iter().map(|p| p.tile(zoom)))
    }

    /// The `[north, west, south, east]` list form, as echoed in responses.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.north, self.west, self.south, self.east]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = BoundingBox::from_slice(&[1.0, 2.0]).unwrap_err();
        assert!(err.to_string().contains("exactly 4"));
    }

    #[test]
    fn accepts_degenerate_edge_ordering() {
        // Existing clients send fences like this; ordering is not enforced.
        let bbox = BoundingBox::from_slice(&[10.0, 10.0, 5.0, 5.0]).unwrap();
        assert_eq!(bbox.to_vec(), vec![10.0, 10.0, 5.0, 5.0]);
    }

    #[test]
    fn rejects_polar_latitude() {
        let err = BoundingBox::from_slice(&[90.0, 10.0, 5.0, 20.0]).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn accepts_ordered_fence_and_echoes_it() {
        let bbox = BoundingBox::from_slice(&[10.0, 10.0, 5.0, 15.0]).unwrap();
        assert_eq!(bbox.to_vec(), vec![10.0, 10.0, 5.0, 15.0]);
    }

    #[test]
    fn corners_come_back_nw_sw_ne_se() {
        let bbox = BoundingBox::from_slice(&[10.0, -20.0, 5.0, -10.0]).unwrap();
        let [nw, sw, ne, se] = bbox.corners();
        assert_eq!((nw.latitude, nw.longitude), (10.0, -20.0));
        assert_eq!((sw.latitude, sw.longitude), (5.0, -20.0));
        assert_eq!((ne.latitude, ne.longitude), (10.0, -10.0));
        assert_eq!((se.latitude, se.longitude), (5.0, -10.0));
    }

    #[test]
    fn corner_tiles_collapse_at_low_zoom() {
        let bbox = BoundingBox::from_slice(&[10.0, 10.0, 5.0, 15.0]).unwrap();
        assert_eq!(bbox.corner_tiles(0).len(), 1);
    }

    #[test]
    fn location_pair_must_have_two_values() {
        let err = GeoPoint::from_pair(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.to_string().contains("pair"));
    }
}
