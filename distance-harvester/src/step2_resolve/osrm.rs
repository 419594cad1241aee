use super::{RoutingBackend, TransportError};
use async_trait::async_trait;
use common::types::Coordinate;
use log::trace;
use url::Url;

/// Client for the OSRM HTTP route service.
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: Url,
    profile: String,
}

impl OsrmClient {
    pub fn new(base_url: Url, profile: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            profile: profile.into(),
        }
    }

    // OSRM expects longitude first.
    pub fn route_url(&self, from: &Coordinate, to: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.base_url.as_str().trim_end_matches('/'),
            self.profile,
            from.longitude,
            from.latitude,
            to.longitude,
            to.latitude,
        )
    }
}

#[async_trait]
impl RoutingBackend for OsrmClient {
    async fn fetch_route(&self, from: &Coordinate, to: &Coordinate) -> Result<String, TransportError> {
        let url = self.route_url(from, to);
        trace!(target: "resolve", "GET {}", url);

        // Error statuses still carry a JSON body (e.g. `NoRoute`), so they are not checked here.
        let response = self.client.get(&url).send().await?;
        let body = response.text().await?;

        Ok(body)
    }
}
