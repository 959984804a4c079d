use chrono::{DateTime, Utc};

use tilepulse_common::{TileCoordinate, TilePulseError};

/// A bind parameter for a positional-placeholder query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// SQL text plus bind parameters in placeholder order. Built once per
/// request and consumed once by the store client.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub sql: String,
    pub params: Vec<QueryValue>,
}

/// Optional filter arguments shared by the tile and edge queries.
#[derive(Debug, Clone, Default)]
pub struct TileFilter {
    pub main_edge: Option<String>,
    pub filtered_edges: Vec<String>,
    pub source_filter: Vec<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub timespan: Option<String>,
}

impl TileFilter {
    /// Union of the filtered edges and the main edge, in that order.
    fn keywords(&self) -> Vec<&str> {
        self.filtered_edges
            .iter()
            .map(String::as_str)
            .chain(self.main_edge.as_deref())
            .collect()
    }
}

/// Filter query over the precomputed per-tile sentiment/mention aggregates.
pub fn computed_tiles_query(
    filter: &TileFilter,
    tiles: &[TileCoordinate],
) -> Result<QuerySpec, TilePulseError> {
    let (clauses, params) = filter_clauses(filter, tiles)?;
    Ok(QuerySpec {
        sql: format!(
            "SELECT tileid, computedfeatures FROM computedtiles WHERE {}",
            clauses.join(" AND ")
        ),
        params,
    })
}

/// Filter query over the precomputed per-tile keyword aggregates.
pub fn computed_edges_query(
    filter: &TileFilter,
    tiles: &[TileCoordinate],
) -> Result<QuerySpec, TilePulseError> {
    let (clauses, params) = filter_clauses(filter, tiles)?;
    Ok(QuerySpec {
        sql: format!(
            "SELECT keyword, mentioncount FROM computededges WHERE {}",
            clauses.join(" AND ")
        ),
        params,
    })
}

/// Assemble the AND-combined clause list. Clause order is fixed: tile
/// membership, keywords, pipelines, start date, end date, period type.
/// Bind order matches placeholder order throughout; placeholders are
/// numbered as they are appended.
fn filter_clauses(
    filter: &TileFilter,
    tiles: &[TileCoordinate],
) -> Result<(Vec<String>, Vec<QueryValue>), TilePulseError> {
    if tiles.is_empty() {
        return Err(TilePulseError::Validation(
            "at least one tile is required to build a tile query".to_string(),
        ));
    }

    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<QueryValue> = Vec::new();

    let tile_group = tiles
        .iter()
        .map(|tile| {
            let clause = format!(
                "(tilex = ${} AND tiley = ${} AND tilez = ${})",
                params.len() + 1,
                params.len() + 2,
                params.len() + 3
            );
            params.push(QueryValue::Int(i64::from(tile.x)));
            params.push(QueryValue::Int(i64::from(tile.y)));
            params.push(QueryValue::Int(i64::from(tile.zoom)));
            clause
        })
        .collect::<Vec<_>>()
        .join(" OR ");
    clauses.push(format!("({tile_group})"));

    let keywords = filter.keywords();
    if !keywords.is_empty() {
        let group = keywords
            .iter()
            .map(|keyword| {
                let clause = format!("(keyword = ${})", params.len() + 1);
                params.push(QueryValue::Text((*keyword).to_string()));
                clause
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({group})"));
    }

    if !filter.source_filter.is_empty() {
        let group = filter
            .source_filter
            .iter()
            .map(|pipeline| {
                let clause = format!("(pipeline = ${})", params.len() + 1);
                params.push(QueryValue::Text(pipeline.clone()));
                clause
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({group})"));
    }

    if let Some(from) = filter.from_date {
        params.push(QueryValue::Timestamp(from));
        clauses.push(format!("(periodstartdate >= ${})", params.len()));
    }

    if let Some(to) = filter.to_date {
        params.push(QueryValue::Timestamp(to));
        clauses.push(format!("(periodenddate <= ${})", params.len()));
    }

    if let Some(timespan) = &filter.timespan {
        params.push(QueryValue::Text(timespan.clone()));
        clauses.push(format!("(periodtype = ${})", params.len()));
    }

    Ok((clauses, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tile(x: u32, y: u32, zoom: u8) -> TileCoordinate {
        TileCoordinate { x, y, zoom }
    }

    #[test]
    fn single_tile_no_filters() {
        let spec = computed_tiles_query(&TileFilter::default(), &[tile(1, 2, 3)]).unwrap();
        assert_eq!(
            spec.sql,
            "SELECT tileid, computedfeatures FROM computedtiles \
             WHERE ((tilex = $1 AND tiley = $2 AND tilez = $3))"
        );
        assert_eq!(
            spec.params,
            vec![
                QueryValue::Int(1),
                QueryValue::Int(2),
                QueryValue::Int(3),
            ]
        );
    }

    #[test]
    fn multiple_tiles_or_together() {
        let spec =
            computed_tiles_query(&TileFilter::default(), &[tile(1, 2, 3), tile(4, 5, 3)]).unwrap();
        assert!(spec.sql.contains(
            "((tilex = $1 AND tiley = $2 AND tilez = $3) \
             OR (tilex = $4 AND tiley = $5 AND tilez = $6))"
        ));
        assert_eq!(spec.params.len(), 6);
    }

    #[test]
    fn keywords_union_filtered_edges_then_main_edge() {
        let filter = TileFilter {
            main_edge: Some("flood".to_string()),
            filtered_edges: vec!["storm".to_string(), "rain".to_string()],
            ..Default::default()
        };
        let spec = computed_tiles_query(&filter, &[tile(1, 2, 3)]).unwrap();
        assert!(spec
            .sql
            .contains("((keyword = $4) OR (keyword = $5) OR (keyword = $6))"));
        assert_eq!(
            &spec.params[3..],
            &[
                QueryValue::Text("storm".to_string()),
                QueryValue::Text("rain".to_string()),
                QueryValue::Text("flood".to_string()),
            ]
        );
    }

    #[test]
    fn source_filter_becomes_pipeline_group() {
        let filter = TileFilter {
            source_filter: vec!["twitter".to_string(), "facebook".to_string()],
            ..Default::default()
        };
        let spec = computed_tiles_query(&filter, &[tile(1, 2, 3)]).unwrap();
        assert!(spec
            .sql
            .contains("((pipeline = $4) OR (pipeline = $5))"));
    }

    #[test]
    fn date_clauses_append_after_groups_in_order() {
        let filter = TileFilter {
            main_edge: Some("flood".to_string()),
            from_date: Some(Utc.with_ymd_and_hms(2017, 8, 1, 0, 0, 0).unwrap()),
            to_date: Some(Utc.with_ymd_and_hms(2017, 9, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let spec = computed_tiles_query(&filter, &[tile(1, 2, 3)]).unwrap();
        assert!(spec.sql.contains("(periodstartdate >= $5)"));
        assert!(spec.sql.contains("(periodenddate <= $6)"));
        let start = spec.sql.find("periodstartdate").unwrap();
        let end = spec.sql.find("periodenddate").unwrap();
        assert!(start < end);
        assert_eq!(spec.params.len(), 6);
    }

    #[test]
    fn timespan_is_the_last_clause() {
        let filter = TileFilter {
            from_date: Some(Utc.with_ymd_and_hms(2017, 8, 1, 0, 0, 0).unwrap()),
            timespan: Some("month".to_string()),
            ..Default::default()
        };
        let spec = computed_tiles_query(&filter, &[tile(1, 2, 3)]).unwrap();
        assert!(spec.sql.ends_with("(periodtype = $5)"));
        assert_eq!(
            spec.params.last(),
            Some(&QueryValue::Text("month".to_string()))
        );
    }

    #[test]
    fn empty_tiles_is_a_validation_error() {
        let err = computed_tiles_query(&TileFilter::default(), &[]).unwrap_err();
        assert!(err.to_string().contains("at least one tile"));
    }

    #[test]
    fn edges_query_reads_the_edge_table() {
        let spec = computed_edges_query(&TileFilter::default(), &[tile(1, 2, 3)]).unwrap();
        assert!(spec
            .sql
            .starts_with("SELECT keyword, mentioncount FROM computededges WHERE "));
        assert_eq!(spec.params.len(), 3);
    }
}
