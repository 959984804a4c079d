pub mod error;
pub mod types;

pub use error::{AtlasError, Result};
pub use types::{Bounds, Place};

use types::FeaturesResponse;

/// Client for the atlas feature-lookup service.
pub struct AtlasClient {
    client: reqwest::Client,
    base_url: String,
}

impl AtlasClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the places intersecting a fence.
    pub async fn fetch_by_bbox(&self, bounds: &Bounds) -> Result<Vec<Place>> {
        let url = format!(
            "{}/features/bbox/{}/{}/{}/{}",
            self.base_url, bounds.north, bounds.west, bounds.south, bounds.east
        );
        tracing::debug!(%url, "Fetching places by bbox");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AtlasError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: FeaturesResponse = resp.json().await?;
        tracing::debug!(count = api_resp.features.len(), "Fetched places");
        Ok(api_resp.features)
    }
}
