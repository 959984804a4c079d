use std::sync::Arc;
use std::time::Instant;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Result, Schema};
use chrono::{DateTime, Utc};

use atlas_client::{AtlasClient, Bounds};
use tilepulse_store::{TileFilter, TileReader};

use super::args::{
    location_tiles, parse_bbox, require_bbox_values, require_locations, require_zoom,
    FetchSubject,
};
use super::types::{
    filter_by_population, EdgeCollection, GqlEdge, GqlPlaceFeature, GqlTileFeature,
    PlaceFeatureCollection, TileFeatureCollection,
};

pub type ApiSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Sentiment/mention aggregates for the tiles covering a bounding box.
    #[allow(clippy::too_many_arguments)]
    async fn tiles_by_bbox(
        &self,
        ctx: &Context<'_>,
        bbox: Option<Vec<f64>>,
        zoom_level: Option<i32>,
        main_edge: Option<String>,
        filtered_edges: Option<Vec<String>>,
        source_filter: Option<Vec<String>>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        timespan: Option<String>,
    ) -> Result<TileFeatureCollection> {
        let start = Instant::now();
        let values = require_bbox_values(FetchSubject::Tiles, bbox.as_ref())?;
        let zoom = require_zoom(FetchSubject::Tiles, zoom_level)?;
        let fence = parse_bbox(FetchSubject::Tiles, values)?;

        let filter = TileFilter {
            main_edge,
            filtered_edges: filtered_edges.unwrap_or_default(),
            source_filter: source_filter.unwrap_or_default(),
            from_date,
            to_date,
            timespan,
        };

        let reader = ctx.data_unchecked::<Arc<TileReader>>();
        let features = reader
            .computed_tiles(&filter, &fence.corner_tiles(zoom))
            .await?;

        Ok(TileFeatureCollection {
            features: features.into_iter().map(GqlTileFeature::from).collect(),
            bbox: Some(fence.to_vec()),
            run_time_ms: elapsed_ms(start),
        })
    }

    /// Sentiment/mention aggregates for the tiles containing each location.
    #[allow(clippy::too_many_arguments)]
    async fn tiles_by_locations(
        &self,
        ctx: &Context<'_>,
        locations: Option<Vec<Vec<f64>>>,
        zoom_level: Option<i32>,
        filtered_edges: Option<Vec<String>>,
        source_filter: Option<Vec<String>>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        timespan: Option<String>,
    ) -> Result<TileFeatureCollection> {
        let start = Instant::now();
        let pairs = require_locations(FetchSubject::Tiles, locations.as_ref())?;
        let zoom = require_zoom(FetchSubject::Tiles, zoom_level)?;
        let tiles = location_tiles(FetchSubject::Tiles, pairs, zoom)?;

        let filter = TileFilter {
            main_edge: None,
            filtered_edges: filtered_edges.unwrap_or_default(),
            source_filter: source_filter.unwrap_or_default(),
            from_date,
            to_date,
            timespan,
        };

        let reader = ctx.data_unchecked::<Arc<TileReader>>();
        let features = reader.computed_tiles(&filter, &tiles).await?;

        Ok(TileFeatureCollection {
            features: features.into_iter().map(GqlTileFeature::from).collect(),
            bbox: None,
            run_time_ms: elapsed_ms(start),
        })
    }

    /// Known places intersecting a bounding box, via the atlas service.
    async fn places_by_bbox(
        &self,
        ctx: &Context<'_>,
        bbox: Option<Vec<f64>>,
        population_min: Option<i64>,
        population_max: Option<i64>,
    ) -> Result<PlaceFeatureCollection> {
        let start = Instant::now();
        let values = require_bbox_values(FetchSubject::Places, bbox.as_ref())?;
        let fence = parse_bbox(FetchSubject::Places, values)?;

        let atlas = ctx.data_unchecked::<Arc<AtlasClient>>();
        let places = atlas
            .fetch_by_bbox(&Bounds {
                north: fence.north,
                west: fence.west,
                south: fence.south,
                east: fence.east,
            })
            .await?;
        let places = filter_by_population(places, population_min, population_max);

        Ok(PlaceFeatureCollection {
            features: places.into_iter().map(GqlPlaceFeature::from).collect(),
            bbox: fence.to_vec(),
            run_time_ms: elapsed_ms(start),
        })
    }

    /// Keyword aggregates for the tiles covering a bounding box.
    #[allow(clippy::too_many_arguments)]
    async fn edges_by_bbox(
        &self,
        ctx: &Context<'_>,
        bbox: Option<Vec<f64>>,
        zoom_level: Option<i32>,
        main_edge: Option<String>,
        source_filter: Option<Vec<String>>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        timespan: Option<String>,
    ) -> Result<EdgeCollection> {
        let start = Instant::now();
        let values = require_bbox_values(FetchSubject::Edges, bbox.as_ref())?;
        let zoom = require_zoom(FetchSubject::Edges, zoom_level)?;
        let fence = parse_bbox(FetchSubject::Edges, values)?;

        let filter = TileFilter {
            main_edge,
            filtered_edges: Vec::new(),
            source_filter: source_filter.unwrap_or_default(),
            from_date,
            to_date,
            timespan,
        };

        let reader = ctx.data_unchecked::<Arc<TileReader>>();
        let edges = reader
            .computed_edges(&filter, &fence.corner_tiles(zoom))
            .await?;

        Ok(EdgeCollection {
            edges: edges.into_iter().map(GqlEdge::from).collect(),
            bbox: Some(fence.to_vec()),
            run_time_ms: elapsed_ms(start),
        })
    }

    /// Keyword aggregates for the tiles containing each location.
    #[allow(clippy::too_many_arguments)]
    async fn edges_by_locations(
        &self,
        ctx: &Context<'_>,
        locations: Option<Vec<Vec<f64>>>,
        zoom_level: Option<i32>,
        source_filter: Option<Vec<String>>,
        from_date: Option<DateTime<Utc>>,
        to_date: Option<DateTime<Utc>>,
        timespan: Option<String>,
    ) -> Result<EdgeCollection> {
        let start = Instant::now();
        let pairs = require_locations(FetchSubject::Edges, locations.as_ref())?;
        let zoom = require_zoom(FetchSubject::Edges, zoom_level)?;
        let tiles = location_tiles(FetchSubject::Edges, pairs, zoom)?;

        let filter = TileFilter {
            main_edge: None,
            filtered_edges: Vec::new(),
            source_filter: source_filter.unwrap_or_default(),
            from_date,
            to_date,
            timespan,
        };

        let reader = ctx.data_unchecked::<Arc<TileReader>>();
        let edges = reader.computed_edges(&filter, &tiles).await?;

        Ok(EdgeCollection {
            edges: edges.into_iter().map(GqlEdge::from).collect(),
            bbox: None,
            run_time_ms: elapsed_ms(start),
        })
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

pub fn build_schema(reader: Arc<TileReader>, atlas: Arc<AtlasClient>) -> ApiSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(reader)
        .data(atlas)
        .finish()
}
