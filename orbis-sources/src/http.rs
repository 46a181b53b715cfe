use std::time::Duration;

use orbis_core::OrbisError;
use url::Url;

/// Validate an endpoint URL up front so request-time failures are transport failures only.
pub(crate) fn parse_endpoint(raw: &str) -> Result<Url, OrbisError> {
    let url = Url::parse(raw)
        .map_err(|e| OrbisError::InvalidArg(format!("invalid endpoint url '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(OrbisError::InvalidArg(format!(
            "unsupported url scheme '{other}' in '{raw}'"
        ))),
    }
}

/// Issue one GET and return the body of a 2xx response.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "orbis_sources::fetch",
        skip(client),
        fields(source = source, url = %url),
    )
)]
pub(crate) async fn fetch_body(
    client: &reqwest::Client,
    source: &'static str,
    url: &Url,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, OrbisError> {
    let mut req = client
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json");
    if let Some(t) = timeout {
        req = req.timeout(t);
    }

    let resp = req.send().await.map_err(|e| transport_error(source, &e, timeout))?;
    let status = resp.status();
    if !status.is_success() {
        #[cfg(feature = "tracing")]
        tracing::warn!(source, status = status.as_u16(), "upstream returned non-success status");
        return Err(OrbisError::data_source_unavailable(
            source,
            format!("HTTP {status}"),
        ));
    }

    let body = resp
        .bytes()
        .await
        .map_err(|e| transport_error(source, &e, timeout))?;
    Ok(body.to_vec())
}

fn transport_error(source: &'static str, e: &reqwest::Error, timeout: Option<Duration>) -> OrbisError {
    let cause = match timeout {
        Some(t) if e.is_timeout() => format!("request timed out after {}ms", t.as_millis()),
        _ if e.is_timeout() => "request timed out".to_string(),
        _ if e.is_connect() => format!("connection failed: {e}"),
        _ => e.to_string(),
    };
    #[cfg(feature = "tracing")]
    tracing::warn!(source, cause = %cause, "upstream fetch failed");
    OrbisError::data_source_unavailable(source, cause)
}

pub(crate) fn decode_error(source: &'static str, e: &serde_json::Error) -> OrbisError {
    OrbisError::data_source_unavailable(source, format!("malformed payload: {e}"))
}
