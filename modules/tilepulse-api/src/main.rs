use std::sync::Arc;

use anyhow::Result;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html, routing::get, Router};
use tracing::info;
use tracing_subscriber::EnvFilter;

use atlas_client::AtlasClient;
use tilepulse_common::Config;
use tilepulse_store::{StoreClient, TileReader};

mod graphql;

use graphql::{build_schema, ApiSchema};

pub struct AppState {
    pub schema: ApiSchema,
}

async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tilepulse=info".parse()?))
        .init();

    let config = Config::from_env();

    let store = StoreClient::connect(&config.database_url).await?;
    let reader = Arc::new(TileReader::new(store));
    let atlas = Arc::new(AtlasClient::new(config.atlas_base_url.clone()));
    let schema = build_schema(reader, atlas);

    let state = Arc::new(AppState { schema });

    let app = Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        );

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("TilePulse API starting on {addr}");
    info!("GraphiQL IDE available at http://{addr}/graphql");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
