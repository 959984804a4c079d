use std::collections::HashMap;

use serde::Deserialize;
use sqlx::types::Json;

/// Nested aggregate structure stored in the `computedfeatures` jsonb
/// column. Every level is optional; a missing piece surfaces as an absent
/// feature property, never an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComputedFeatures {
    pub sentiment: Option<SentimentAverages>,
    pub mentions: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentimentAverages {
    pub pos_avg: Option<f64>,
    pub neg_avg: Option<f64>,
}

/// A row from the computedtiles table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TileRow {
    pub tileid: String,
    pub computedfeatures: Option<Json<ComputedFeatures>>,
}

/// A row from the computededges table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EdgeRow {
    pub keyword: String,
    pub mentioncount: Option<i64>,
}

/// Per-tile aggregate projection returned to the API layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature {
    pub tile_id: String,
    pub mention_count: Option<i64>,
    pub pos_sentiment: Option<f64>,
    pub neg_sentiment: Option<f64>,
}

/// Keyword aggregate projection.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFeature {
    pub name: String,
    pub mention_count: i64,
}

/// Collapse rows to one feature per tile id. The last row wins when the
/// store returns duplicates, and output keeps the order ids were first
/// seen in.
pub fn features_from_rows(rows: Vec<TileRow>) -> Vec<TileFeature> {
    let mut order: Vec<String> = Vec::new();
    let mut by_id: HashMap<String, TileRow> = HashMap::new();
    for row in rows {
        if !by_id.contains_key(&row.tileid) {
            order.push(row.tileid.clone());
        }
        by_id.insert(row.tileid.clone(), row);
    }

    order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .map(|row| {
            let features = row
                .computedfeatures
                .map(|json| json.0)
                .unwrap_or_default();
            let sentiment = features.sentiment.unwrap_or_default();
            TileFeature {
                tile_id: row.tileid,
                mention_count: features.mentions,
                pos_sentiment: sentiment.pos_avg,
                neg_sentiment: sentiment.neg_avg,
            }
        })
        .collect()
}

/// Sum mention counts per keyword across tiles. Output is sorted by
/// descending count, then name, so responses are stable.
pub fn edges_from_rows(rows: Vec<EdgeRow>) -> Vec<EdgeFeature> {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for row in rows {
        *totals.entry(row.keyword).or_insert(0) += row.mentioncount.unwrap_or(0);
    }

    let mut edges: Vec<EdgeFeature> = totals
        .into_iter()
        .map(|(name, mention_count)| EdgeFeature {
            name,
            mention_count,
        })
        .collect();
    edges.sort_by(|a, b| {
        b.mention_count
            .cmp(&a.mention_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    edges
}
