//! HTTP adapter for artifact upload

use std::path::Path;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use vigil_core::{BlobSink, SinkError};
use vigil_domain::{SinkConfig, VigilError};

use crate::http::HttpClient;

/// Uploads local artifacts to remote storage and returns a durable URL.
pub struct HttpBlobSink {
    client: HttpClient,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpBlobSink {
    pub fn new(client: HttpClient, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }

    pub fn from_config(config: &SinkConfig) -> Result<Self, VigilError> {
        Ok(Self::new(super::client_from_config(config)?, config.blob_endpoint.clone()))
    }
}

#[async_trait]
impl BlobSink for HttpBlobSink {
    async fn upload(&self, artifact: &Path) -> Result<String, SinkError> {
        let bytes = tokio::fs::read(artifact)
            .await
            .map_err(|err| SinkError::Upload(format!("read {}: {err}", artifact.display())))?;

        let builder = self
            .client
            .request(Method::POST, &self.endpoint)
            .header(CONTENT_TYPE, "image/png")
            .body(bytes);
        let response = self
            .client
            .send(builder)
            .await
            .map_err(|err| SinkError::Upload(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Upload(format!("blob store returned {status}")));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|err| SinkError::Upload(format!("malformed upload response: {err}")))?;

        debug!(endpoint = %self.endpoint, url = %parsed.url, "artifact uploaded");
        Ok(parsed.url)
    }
}
