//! Argument validation for the query resolvers. Checks run before any I/O,
//! first failure wins, and the messages name what the caller was fetching.

use async_graphql::Error;

use tilepulse_common::{dedup_tiles, BoundingBox, GeoPoint, TileCoordinate, TilePulseError, MAX_ZOOM};

/// What the validation messages say the caller was fetching.
#[derive(Clone, Copy)]
pub enum FetchSubject {
    Tiles,
    Places,
    Edges,
}

impl FetchSubject {
    fn noun(self) -> &'static str {
        match self {
            FetchSubject::Tiles => "tiles",
            FetchSubject::Places => "places",
            FetchSubject::Edges => "edges",
        }
    }
}

/// Presence check for the bbox argument, separate from shape parsing so
/// the failure order stays: missing bbox, missing zoom, malformed bbox.
pub fn require_bbox_values(
    subject: FetchSubject,
    bbox: Option<&Vec<f64>>,
) -> Result<&Vec<f64>, Error> {
    bbox.ok_or_else(|| {
        Error::new(format!(
            "No bounding box for which to fetch {} specified",
            subject.noun()
        ))
    })
}

/// Shape and domain parsing for a present bbox argument.
pub fn parse_bbox(subject: FetchSubject, values: &[f64]) -> Result<BoundingBox, Error> {
    BoundingBox::from_slice(values).map_err(|e| match e {
        TilePulseError::Validation(reason) => Error::new(format!(
            "Invalid bounding box for which to fetch {} specified: {reason}",
            subject.noun()
        )),
        other => Error::new(other.to_string()),
    })
}

pub fn require_zoom(subject: FetchSubject, zoom: Option<i32>) -> Result<u8, Error> {
    let Some(zoom) = zoom else {
        return Err(Error::new(format!(
            "No zoom level for which to fetch {} specified",
            subject.noun()
        )));
    };
    if !(0..=i32::from(MAX_ZOOM)).contains(&zoom) {
        return Err(Error::new(format!(
            "Invalid zoom level {zoom}: must be between 0 and {MAX_ZOOM}"
        )));
    }
    Ok(zoom as u8)
}

/// Presence check for the location-list argument.
pub fn require_locations(
    subject: FetchSubject,
    locations: Option<&Vec<Vec<f64>>>,
) -> Result<&Vec<Vec<f64>>, Error> {
    match locations {
        Some(values) if !values.is_empty() => Ok(values),
        _ => Err(Error::new(format!(
            "No locations for which to fetch {} specified",
            subject.noun()
        ))),
    }
}

/// Parse `[latitude, longitude]` pairs and project them to deduplicated
/// tiles at `zoom`.
pub fn location_tiles(
    subject: FetchSubject,
    locations: &[Vec<f64>],
    zoom: u8,
) -> Result<Vec<TileCoordinate>, Error> {
    let mut points = Vec::with_capacity(locations.len());
    for pair in locations {
        let point = GeoPoint::from_pair(pair).map_err(|e| match e {
            TilePulseError::Validation(reason) => Error::new(format!(
                "Invalid location for which to fetch {} specified: {reason}",
                subject.noun()
            )),
            other => Error::new(other.to_string()),
        })?;
        points.push(point);
    }
    Ok(dedup_tiles(points.iter().map(|p| p.tile(zoom))))
}
