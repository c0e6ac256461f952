//! HTTP transport for sending metrics.

use crate::config::Config;
use crate::types::{Metrics, TrackResult};
use crate::Error;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// HTTP transport for sending metrics to the Shorttags API.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport using the configured timeouts.
    ///
    /// `open_timeout` bounds connecting; `timeout` is the deadline for the
    /// whole request. Redirects are never followed, so a 3xx is reported
    /// as an API error and the API key stays with the configured host.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.open_timeout())
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Send metrics to the notify endpoint.
    ///
    /// Makes exactly one attempt. Disabled tracking returns
    /// [`TrackResult::Skipped`] without touching the network.
    pub async fn send(&self, config: &Config, metrics: &Metrics) -> Result<TrackResult, Error> {
        if !config.enabled() {
            debug!("tracking disabled, skipping send");
            return Ok(TrackResult::disabled());
        }

        if !config.valid() {
            return Err(Error::Configuration(
                "Shorttags is not properly configured. Please set api_key and site_id.".into(),
            ));
        }

        let endpoint = config.endpoint();
        debug!(endpoint = %endpoint, metric_count = metrics.len(), "sending metrics");

        let response = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("X-API-Key", config.api_key())
            .json(metrics)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;

        let result = classify(status, &body);
        match &result {
            Ok(_) => debug!(status, "metrics sent successfully"),
            Err(e) => warn!(status, body = %body, error = %e, "API request failed"),
        }

        result.map(TrackResult::Delivered)
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    let err = if e.is_timeout() {
        Error::Api(format!("Request timed out: {e}"))
    } else {
        Error::Api(format!("Request failed: {e}"))
    };
    warn!(error = %err, "transport error");
    err
}

/// Map a response status and body onto the result taxonomy.
pub(crate) fn classify(status: u16, body: &str) -> Result<Value, Error> {
    match status {
        200..=299 => Ok(serde_json::from_str(body).unwrap_or_else(|_| json!({ "success": true }))),
        401 => Err(Error::Api("Invalid API key".into())),
        404 => Err(Error::Api("Site not found".into())),
        422 => {
            let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
            let detail = ["error", "errors"]
                .iter()
                .filter_map(|key| parsed.get(*key))
                .find(|v| !matches!(v, Value::Null | Value::Bool(false)))
                .map(crate::events::label)
                .unwrap_or_else(|| "Unknown error".into());
            Err(Error::Api(format!("Validation error: {detail}")))
        }
        429 => Err(Error::Api("Rate limit exceeded".into())),
        _ => Err(Error::Api(format!("API returned {status}: {body}"))),
    }
}
