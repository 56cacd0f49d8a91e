//! `NavitiaClient` - Navitia coverage API client implementation.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use tracing::instrument;
use url::Url;

use super::api::LocalNavitiaApi;
use super::error::NavitiaError;
use super::params::{BoardParams, JourneyParams, PlacesParams};
use super::types::{
    ArrivalsResponse, DeparturesResponse, Journey, JourneysResponse, Passage, Place,
    PlacesResponse, StopArea, StopAreasResponse,
};

/// Default base URL of the SNCF coverage.
const DEFAULT_BASE_URL: &str = "https://api.sncf.com/v1/coverage/sncf/";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Navitia API client.
///
/// Sends exactly one request per call. Timeouts are enforced by the
/// underlying HTTP client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct NavitiaClient {
    /// HTTP client.
    http_client: Client,
    /// Coverage base URL, ending with `/`.
    base_url: Url,
    /// Raw API token sent in `Authorization`.
    api_token: String,
}

/// Builder for `NavitiaClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct NavitiaClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl NavitiaClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the coverage base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set or empty.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<NavitiaClient> {
        let api_token = self
            .api_token
            .filter(|t| !t.is_empty())
            .context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(NavitiaClient {
            http_client,
            base_url,
            api_token,
        })
    }
}

impl NavitiaClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> NavitiaClientBuilder {
        NavitiaClientBuilder::new()
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request with the token and query params, decoding JSON.
    ///
    /// Non-success statuses and transport failures surface as
    /// [`NavitiaError`] inside the returned `anyhow::Error`.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let path = segments.join("/");

        let request = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, &self.api_token)
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "Navitia API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(NavitiaError::from_transport)?;

        let status = response.status();
        tracing::debug!(%status, %path, "Navitia API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%path, body_len = body.len(), "Navitia API error body");
            return Err(NavitiaError::from_status(status.as_u16(), &body).into());
        }

        let body = response
            .text()
            .await
            .map_err(NavitiaError::from_transport)?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }
}

impl LocalNavitiaApi for NavitiaClient {
    #[instrument(skip_all, fields(station_id = %station_id))]
    async fn departures(&self, station_id: &str, params: &BoardParams) -> Result<Vec<Passage>> {
        let response: DeparturesResponse = self
            .get_json(&["stop_areas", station_id, "departures"], &params.to_query())
            .await?;
        Ok(response.departures)
    }

    #[instrument(skip_all, fields(station_id = %station_id))]
    async fn arrivals(&self, station_id: &str, params: &BoardParams) -> Result<Vec<Passage>> {
        let response: ArrivalsResponse = self
            .get_json(&["stop_areas", station_id, "arrivals"], &params.to_query())
            .await?;
        Ok(response.arrivals)
    }

    #[instrument(skip_all)]
    async fn journeys(&self, params: &JourneyParams) -> Result<Vec<Journey>> {
        let response: JourneysResponse = self.get_json(&["journeys"], &params.to_query()).await?;
        Ok(response.journeys)
    }

    #[instrument(skip_all)]
    async fn places(&self, params: &PlacesParams) -> Result<Vec<Place>> {
        let response: PlacesResponse = self.get_json(&["places"], &params.to_query()).await?;
        Ok(response.places)
    }

    #[instrument(skip_all, fields(station_id = %station_id))]
    async fn stop_area(&self, station_id: &str) -> Result<Option<StopArea>> {
        let response: StopAreasResponse = self.get_json(&["stop_areas", station_id], &[]).await?;
        Ok(response.stop_areas.into_iter().next())
    }
}
