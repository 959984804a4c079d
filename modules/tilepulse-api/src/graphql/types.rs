use async_graphql::SimpleObject;

use atlas_client::Place;
use tilepulse_store::{EdgeFeature, TileFeature};

// --- Tile results ---

/// Per-tile aggregate feature. Values live under `properties`, the
/// GeoJSON-style nesting the map clients consume.
#[derive(SimpleObject)]
pub struct GqlTileFeature {
    pub properties: GqlTileProperties,
}

#[derive(SimpleObject)]
pub struct GqlTileProperties {
    pub tile_id: String,
    pub mention_count: Option<i64>,
    pub pos_sentiment: Option<f64>,
    pub neg_sentiment: Option<f64>,
}

impl From<TileFeature> for GqlTileFeature {
    fn from(f: TileFeature) -> Self {
        Self {
            properties: GqlTileProperties {
                tile_id: f.tile_id,
                mention_count: f.mention_count,
                pos_sentiment: f.pos_sentiment,
                neg_sentiment: f.neg_sentiment,
            },
        }
    }
}

/// Tile query result. `bbox` echoes the requested fence and is absent for
/// location-list queries; `run_time_ms` is the resolver's elapsed time.
#[derive(SimpleObject)]
pub struct TileFeatureCollection {
    pub features: Vec<GqlTileFeature>,
    pub bbox: Option<Vec<f64>>,
    pub run_time_ms: u64,
}

// --- Place results ---

#[derive(SimpleObject)]
pub struct GqlPlaceFeature {
    pub coordinate: Vec<f64>,
    pub name: String,
    pub id: String,
    pub population: Option<i64>,
    pub kind: Option<String>,
}

impl From<Place> for GqlPlaceFeature {
    fn from(place: Place) -> Self {
        // Prefer the point coordinate; fall back to the place's own fence.
        let coordinate = match place.centroid {
            Some(centroid) => centroid,
            None => place.bbox,
        };
        Self {
            coordinate,
            name: place.name,
            id: place.id,
            population: place.population,
            kind: place.kind,
        }
    }
}

#[derive(SimpleObject)]
pub struct PlaceFeatureCollection {
    pub features: Vec<GqlPlaceFeature>,
    pub bbox: Vec<f64>,
    pub run_time_ms: u64,
}

// --- Edge results ---

#[derive(SimpleObject)]
pub struct GqlEdge {
    pub name: String,
    pub mention_count: i64,
}

impl From<EdgeFeature> for GqlEdge {
    fn from(edge: EdgeFeature) -> Self {
        Self {
            name: edge.name,
            mention_count: edge.mention_count,
        }
    }
}

#[derive(SimpleObject)]
pub struct EdgeCollection {
    pub edges: Vec<GqlEdge>,
    pub bbox: Option<Vec<f64>>,
    pub run_time_ms: u64,
}

/// Keep only places whose population satisfies the given bounds. A place
/// with unknown population is dropped only when a bound is set.
pub fn filter_by_population(
    places: Vec<Place>,
    min: Option<i64>,
    max: Option<i64>,
) -> Vec<Place> {
    if min.is_none() && max.is_none() {
        return places;
    }
    places
        .into_iter()
        .filter(|place| match place.population {
            Some(population) => {
                min.is_none_or(|m| population >= m) && max.is_none_or(|m| population <= m)
            }
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(id: &str, population: Option<i64>) -> Place {
        Place {
            id: id.to_string(),
            name: id.to_string(),
            bbox: vec![1.0, 2.0, 3.0, 4.0],
            centroid: None,
            population,
            kind: None,
        }
    }

    #[test]
    fn no_bounds_passes_everything_through() {
        let places = vec![place("a", Some(10)), place("b", None)];
        assert_eq!(filter_by_population(places, None, None).len(), 2);
    }

    #[test]
    fn bounds_apply_and_unknown_population_is_dropped() {
        let places = vec![
            place("small", Some(100)),
            place("mid", Some(10_000)),
            place("big", Some(1_000_000)),
            place("unknown", None),
        ];
        let kept = filter_by_population(places, Some(1_000), Some(100_000));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "mid");
    }

    #[test]
    fn centroid_wins_over_fence_as_the_coordinate() {
        let mut with_centroid = place("a", None);
        with_centroid.centroid = Some(vec![40.0, -89.9]);
        let feature = GqlPlaceFeature::from(with_centroid);
        assert_eq!(feature.coordinate, vec![40.0, -89.9]);

        let feature = GqlPlaceFeature::from(place("b", None));
        assert_eq!(feature.coordinate, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
