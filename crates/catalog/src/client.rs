use std::time::Duration;

use serde::Deserialize;

use crate::Result;
use crate::error::CatalogError;
use crate::traits::GenreLookup;

#[derive(Debug, Deserialize)]
struct TrackResponse {
    genres: Vec<String>,
}

/// HTTP client for the catalog service. Carries its own request timeout so
/// a slow catalog can never stall a caller for long.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("trackleague-backend")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl GenreLookup for HttpCatalog {
    async fn genre_tags(&self, provider_track_id: &str) -> Result<Vec<String>> {
        let url = format!("{}/tracks/{}", self.base_url, provider_track_id);

        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::TrackNotFound(provider_track_id.to_string()));
        }

        let track = response.error_for_status()?.json::<TrackResponse>().await?;

        Ok(track.genres)
    }
}
