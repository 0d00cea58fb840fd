//! HTTP adapter for the append-only event store

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use vigil_core::{LogSink, SinkError};
use vigil_domain::{ActivityEvent, SinkConfig, VigilError};

use crate::http::HttpClient;

/// Appends activity events to a remote store over HTTP.
pub struct HttpLogSink {
    client: HttpClient,
    endpoint: String,
}

impl HttpLogSink {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn from_config(config: &SinkConfig) -> Result<Self, VigilError> {
        Ok(Self::new(super::client_from_config(config)?, config.log_endpoint.clone()))
    }
}

#[async_trait]
impl LogSink for HttpLogSink {
    async fn append(&self, event: &ActivityEvent) -> Result<(), SinkError> {
        let builder = self.client.request(Method::POST, &self.endpoint).json(event);
        let response = self
            .client
            .send(builder)
            .await
            .map_err(|err| SinkError::Delivery(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Delivery(format!("log store returned {status}")));
        }

        debug!(endpoint = %self.endpoint, kind = event.kind_label(), "event appended");
        Ok(())
    }
}
