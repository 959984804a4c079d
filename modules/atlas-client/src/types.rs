use serde::Deserialize;

/// Named compass-direction fence sent to the atlas bbox endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub north: f64,
    pub west: f64,
    pub south: f64,
    pub east: f64,
}

/// Wrapper for atlas API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesResponse {
    pub features: Vec<Place>,
}

/// A named place returned by the atlas service. `centroid` is `[lat, lng]`
/// and may be absent for areal features; `bbox` is always present.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub bbox: Vec<f64>,
    pub centroid: Option<Vec<f64>>,
    pub population: Option<i64>,
    pub kind: Option<String>,
}
