use std::time::Duration;

use async_trait::async_trait;
use orbis_core::{CountryBatch, CountrySource, DataSource, OrbisError, RawCountry, SourceKey};
use serde_json::Value;
use url::Url;

use crate::http::{decode_error, fetch_body, parse_endpoint};

/// Country directory client for the REST Countries v2 API.
#[derive(Debug, Clone)]
pub struct RestCountriesSource {
    client: reqwest::Client,
    url: Url,
    timeout: Option<Duration>,
}

impl RestCountriesSource {
    /// Static key for logs and error attribution.
    pub const KEY: SourceKey = SourceKey::new("restcountries");

    /// Public v2 endpoint restricted to the fields the pipeline reads.
    pub const DEFAULT_URL: &'static str =
        "https://restcountries.com/v2/all?fields=name,capital,region,population,flag,currencies";

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

    /// Bound each request. The orchestrator applies its own deadline as well.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reuse an existing HTTP client (connection pool, proxies, TLS settings).
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

    /// Decode a directory payload element by element.
    ///
    /// # Errors
    /// Returns `DataSourceUnavailable` when the body is not JSON or not an array.
    pub fn decode(body: &[u8]) -> Result<CountryBatch, OrbisError> {
        let source = Self::KEY.as_str();
        let value: Value = serde_json::from_slice(body).map_err(|e| decode_error(source, &e))?;
        let Value::Array(items) = value else {
            let hint = value
                .get("message")
                .and_then(Value::as_str)
                .map(|m| format!(": {m}"))
                .unwrap_or_default();
            return Err(OrbisError::data_source_unavailable(
                source,
                format!("expected a JSON array of countries{hint}"),
            ));
        };

        let mut batch = CountryBatch::default();
        for (idx, item) in items.into_iter().enumerate() {
            let label = item
                .get("name")
                .and_then(Value::as_str)
                .map_or_else(|| format!("#{idx}"), str::to_string);
            match serde_json::from_value::<RawCountry>(item) {
                Ok(raw) => batch.records.push(raw),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(record = %label, error = %e, "undecodable country record");
                    batch
                        .rejected
                        .push(OrbisError::record(label, format!("undecodable: {e}")));
                }
            }
        }
        Ok(batch)
    }
}

impl DataSource for RestCountriesSource {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "REST Countries"
    }
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    async fn countries(&self) -> Result<CountryBatch, OrbisError> {
        let body = fetch_body(&self.client, Self::KEY.as_str(), &self.url, self.timeout).await?;
        Self::decode(&body)
    }
}
