use std::time::Duration;

use async_trait::async_trait;
use orbis_core::{DataSource, OrbisError, RateSource, RateTable, SourceKey};
use serde::Deserialize;
use url::Url;

use crate::http::{decode_error, fetch_body, parse_endpoint};

/// Exchange-rate client for open.er-api.com style endpoints.
#[derive(Debug, Clone)]
pub struct ExchangeRateSource {
    client: reqwest::Client,
    url: Url,
    timeout: Option<Duration>,
}

#[derive(Debug, Deserialize)]
struct RateEnvelope {
    #[serde(default)]
    result: Option<String>,
    #[serde(default, rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: Option<RateTable>,
}

impl ExchangeRateSource {
    /// Static key for logs and error attribution.
    pub const KEY: SourceKey = SourceKey::new("open-er-api");

    /// Latest rates relative to USD.
    pub const DEFAULT_URL: &'static str = "https://open.er-api.com/v6/latest/USD";

    /// Client for [`DEFAULT_URL`](Self::DEFAULT_URL).
    ///
    /// # Errors
    /// Never fails in practice; the built-in URL is valid.
    pub fn new_default() -> Result<Self, OrbisError> {
        Self::new(Self::DEFAULT_URL)
    }

    /// Client for a custom endpoint.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `url` is not an absolute http(s) URL.
    pub fn new(url: &str) -> Result<Self, OrbisError> {
        Ok(Self {
            client: reqwest::Client::new(),
            url: parse_endpoint(url)?,
            timeout: None,
        })
    }

    /// Bound each request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an existing HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Endpoint this client fetches.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Decode the `{"result": ..., "rates": {...}}` envelope.
    ///
    /// # Errors
    /// Returns `DataSourceUnavailable` for malformed JSON, an API-level
    /// `"result": "error"`, or a missing `rates` object.
    pub fn decode(body: &[u8]) -> Result<RateTable, OrbisError> {
        let source = Self::KEY.as_str();
        let env: RateEnvelope = serde_json::from_slice(body).map_err(|e| decode_error(source, &e))?;
        if env.result.as_deref() == Some("error") {
            let kind = env.error_type.as_deref().unwrap_or("unspecified");
            return Err(OrbisError::data_source_unavailable(
                source,
                format!("api reported error: {kind}"),
            ));
        }
        let Some(rates) = env.rates else {
            return Err(OrbisError::data_source_unavailable(
                source,
                "response carried no rates",
            ));
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(count = rates.len(), "decoded exchange rates");
        Ok(rates)
    }
}

impl DataSource for ExchangeRateSource {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "ExchangeRate-API"
    }
}

#[async_trait]
impl RateSource for ExchangeRateSource {
    async fn rates(&self) -> Result<RateTable, OrbisError> {
        let body = fetch_body(&self.client, Self::KEY.as_str(), &self.url, self.timeout).await?;
        Self::decode(&body)
    }
}
