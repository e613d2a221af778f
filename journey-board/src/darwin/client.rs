//! Darwin LDB HTTP client.
//!
//! One endpoint is used: `GetDepBoardWithDetails`, which returns a station's
//! departures together with each service's subsequent calling points.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::RawService;
use crate::provider::{BoardProvider, BoardQuery, ProviderError};

use super::convert::convert_station_board;
use super::error::DarwinError;
use super::types::StationBoardWithDetails;

/// Production Rail Data Marketplace endpoint.
const DEFAULT_BASE_URL: &str =
    "https://api1.raildata.org.uk/1010-live-departure-board-dep-with-details/LDBWS";

const API_VERSION: &str = "20220120";

/// One request per board of a batch.
const DEFAULT_MAX_CONCURRENT: usize = 3;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of an unparseable body to keep in the error.
const BODY_EXCERPT_CHARS: usize = 500;

/// Connection settings for [`DarwinClient`].
#[derive(Debug, Clone)]
pub struct DarwinConfig {
    /// Rail Data Marketplace consumer key, sent as `x-apikey`
    pub token: String,
    pub base_url: String,
    /// Requests allowed in flight at once
    pub max_concurrent: usize,
    pub timeout: Duration,
}

impl DarwinConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Darwin departure board client.
///
/// Cheap to clone; clones share the connection pool and request limit.
#[derive(Debug, Clone)]
pub struct DarwinClient {
    http: reqwest::Client,
    base_url: String,
    limiter: Arc<Semaphore>,
}

impl DarwinClient {
    pub fn new(config: DarwinConfig) -> Result<Self, DarwinError> {
        let token = HeaderValue::from_str(&config.token).map_err(|_| DarwinError::InvalidToken)?;
        let mut headers = HeaderMap::new();
        headers.insert("x-apikey", token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limiter: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    fn board_url(&self, query: &BoardQuery) -> String {
        format!(
            "{}/api/{API_VERSION}/GetDepBoardWithDetails/{}",
            self.base_url, query.station
        )
    }

    /// Fetch the raw board for `query`.
    pub async fn fetch_board(
        &self,
        query: &BoardQuery,
    ) -> Result<StationBoardWithDetails, DarwinError> {
        let _permit = self.limiter.acquire().await.map_err(|_| DarwinError::Closed)?;

        debug!(station = %query.station, filter = ?query.filter, "requesting departure board");

        let response = self
            .http
            .get(self.board_url(query))
            .query(&board_params(query))
            .send()
            .await?;
        let response = check_status(response).await?;

        let body = response.text().await?;
        parse_board(&body)
    }
}

/// Query string for a board request.
///
/// A filter asks Darwin for services calling at that station afterwards.
fn board_params(query: &BoardQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("numRows", query.rows.to_string()),
        ("timeWindow", query.time_window_mins.to_string()),
    ];
    if let Some(filter) = query.filter {
        params.push(("filterCrs", filter.to_string()));
        params.push(("filterType", "to".to_string()));
    }
    params
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DarwinError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(DarwinError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => Err(DarwinError::RateLimited),
        status => Err(DarwinError::Status {
            code: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }),
    }
}

/// Parse a board response body.
pub(crate) fn parse_board(body: &str) -> Result<StationBoardWithDetails, DarwinError> {
    serde_json::from_str(body).map_err(|e| DarwinError::MalformedBoard {
        reason: e.to_string(),
        excerpt: (!body.is_empty()).then(|| body.chars().take(BODY_EXCERPT_CHARS).collect()),
    })
}

impl BoardProvider for DarwinClient {
    async fn departures(&self, query: &BoardQuery) -> Result<Vec<RawService>, ProviderError> {
        let board = self.fetch_board(query).await?;
        Ok(convert_station_board(&board).map_err(DarwinError::from)?)
    }
}
