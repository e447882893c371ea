//! Outbound half of the relay: one POST per event, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, instrument};

use super::dto::WebhookEvent;
use super::errors::RelayError;

#[async_trait]
pub trait WebhookForwarder: Send + Sync {
    /// Posts `event` as JSON and returns the endpoint's JSON body verbatim.
    async fn forward(&self, url: &Url, event: &WebhookEvent) -> Result<Value, RelayError>;
}

pub struct HttpForwarder {
    client: Client,
}

impl HttpForwarder {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookForwarder for HttpForwarder {
    #[instrument(skip(self, event), fields(user_id = %event.user_id))]
    async fn forward(&self, url: &Url, event: &WebhookEvent) -> Result<Value, RelayError> {
        let response = self
            .client
            .post(url.clone())
            .json(event)
            .send()
            .await
            .map_err(RelayError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(RelayError::transport)?;
        let data: Value = serde_json::from_slice(&body).map_err(|e| RelayError::Decode(e.to_string()))?;
        debug!(%status, "onboarding webhook accepted event");
        Ok(data)
    }
}

#[cfg(test)]
pub use recording::RecordingForwarder;
