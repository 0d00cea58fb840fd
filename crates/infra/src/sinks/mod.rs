//! HTTP sink adapters
//!
//! The remote stores are opaque network services: the log sink accepts
//! structured records, the blob sink accepts artifact bytes and returns a
//! durable reference. No wire format beyond that contract is assumed.

mod blob_sink;
mod log_sink;

pub use blob_sink::HttpBlobSink;
pub use log_sink::HttpLogSink;

use std::time::Duration;

use vigil_domain::{SinkConfig, VigilError};

use crate::http::HttpClient;

fn client_from_config(config: &SinkConfig) -> Result<HttpClient, VigilError> {
    HttpClient::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .max_attempts(config.max_attempts)
        .build()
}
