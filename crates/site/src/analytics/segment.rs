//! Segment HTTP tracking API client.
//!
//! Delivers page, identify, and track calls to Segment. Delivery is
//! fire-and-forget: each call spawns a task and failures are logged at
//! warn level and dropped. Batching and retry belong to the service,
//! not to this client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::SegmentConfig;

use super::{AnalyticsSink, EventContext};

/// Segment tracking API base URL.
const BASE_URL: &str = "https://api.segment.io/v1";

/// Errors that can occur when delivering events to Segment.
#[derive(Debug, Error)]
pub enum SegmentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client construction failed.
    #[error("Client error: {0}")]
    Client(String),
}

/// Segment tracking API client.
#[derive(Clone)]
pub struct SegmentClient {
    client: reqwest::Client,
}

impl SegmentClient {
    /// Create a new Segment API client.
    ///
    /// The write key is carried as HTTP Basic auth with an empty
    /// password, per the tracking API's authentication scheme.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SegmentConfig) -> Result<Self, SegmentError> {
        let mut headers = HeaderMap::new();

        let credentials = BASE64.encode(format!("{}:", config.write_key.expose_secret()));
        let mut auth_value = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| SegmentError::Client(format!("Invalid write key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert("Authorization", auth_value);

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Deliver one event payload to a tracking API endpoint.
    async fn send(&self, endpoint: &str, body: serde_json::Value) -> Result<(), SegmentError> {
        let url = format!("{BASE_URL}/{endpoint}");

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SegmentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Spawn a delivery task and return immediately.
    fn dispatch(&self, endpoint: &'static str, body: serde_json::Value) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.send(endpoint, body).await {
                tracing::warn!(endpoint, error = %e, "Analytics delivery failed");
            }
        });
    }

    /// Common envelope fields for every call.
    fn envelope(ctx: &EventContext) -> serde_json::Map<String, serde_json::Value> {
        let mut body = serde_json::Map::new();
        body.insert(
            "anonymousId".to_owned(),
            serde_json::Value::String(ctx.anonymous_id.to_string()),
        );
        if let Some(user_id) = &ctx.user_id {
            body.insert(
                "userId".to_owned(),
                serde_json::Value::String(user_id.as_str().to_owned()),
            );
        }
        body.insert(
            "timestamp".to_owned(),
            serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
        );
        body
    }
}

impl AnalyticsSink for SegmentClient {
    fn page(&self, ctx: &EventContext, name: &str) {
        let mut body = Self::envelope(ctx);
        body.insert(
            "name".to_owned(),
            serde_json::Value::String(name.to_owned()),
        );
        self.dispatch("page", serde_json::Value::Object(body));
    }

    fn identify(&self, ctx: &EventContext, traits: serde_json::Value) {
        let mut body = Self::envelope(ctx);
        body.insert("traits".to_owned(), traits);
        self.dispatch("identify", serde_json::Value::Object(body));
    }

    fn track(&self, ctx: &EventContext, event: &str, properties: serde_json::Value) {
        let mut body = Self::envelope(ctx);
        body.insert(
            "event".to_owned(),
            serde_json::Value::String(event.to_owned()),
        );
        body.insert("properties".to_owned(), properties);
        self.dispatch("track", serde_json::Value::Object(body));
    }
}
