//! HTTP fetcher for portal result pages
//!
//! This module handles the single outbound request made per lookup:
//! - Building the HTTP client with user agent and timeout
//! - Building the lookup URL for an identifier
//! - Classifying failures into timeout / transport / status / other

use crate::config::PortalConfig;
use crate::{BotError, ConfigError, FetchError, FetchResult};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// A successfully fetched portal page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: Url,
    /// HTTP status code (always 2xx)
    pub status_code: u16,
    /// Page body
    pub body: String,
}

/// Builds an HTTP client for talking to the portal
///
/// The configured timeout covers the whole request including the body.
/// Redirects are not followed: a 3xx from the portal is a status failure.
pub fn build_http_client(config: &PortalConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .redirect(Policy::none())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Client for the results portal
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    endpoint: Url,
    query_param: String,
}

impl PortalClient {
    /// Creates a portal client from configuration
    pub fn new(config: &PortalConfig) -> Result<Self, BotError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", config.endpoint, e))
        })?;
        let client = build_http_client(config)?;

        Ok(Self {
            client,
            endpoint,
            query_param: config.query_param.clone(),
        })
    }

    /// Builds the lookup URL for an identifier
    ///
    /// The identifier is percent-encoded into the query string.
    ///
    /// # Example
    ///
    /// ```
    /// use placement_bot::config::PortalConfig;
    /// use placement_bot::portal::PortalClient;
    ///
    /// let portal = PortalClient::new(&PortalConfig::default()).unwrap();
    /// assert_eq!(
    ///     portal.lookup_url("RU 12/34").as_str(),
    ///     "https://portal.ju.edu.et/freshmanR?AdmissionNumber=RU+12%2F34"
    /// );
    /// ```
    pub fn lookup_url(&self, identifier: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(&self.query_param, identifier);
        url
    }

    /// Fetches the result page for an identifier
    ///
    /// Single attempt; no retries.
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Timeout elapsed | `FetchError::Timeout` |
    /// | DNS / connection failure | `FetchError::Transport` |
    /// | Non-2xx status | `FetchError::HttpStatus` |
    /// | Anything else | `FetchError::Unclassified` |
    pub async fn fetch_page(&self, identifier: &str) -> FetchResult<FetchedPage> {
        let url = self.lookup_url(identifier);
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_error(&url, e))?;

        tracing::debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(FetchedPage {
            url,
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    let url = url.to_string();

    if error.is_timeout() {
        FetchError::Timeout { url }
    } else if error.is_connect() {
        FetchError::Transport { url, source: error }
    } else {
        FetchError::Unclassified { url, source: error }
    }
}
