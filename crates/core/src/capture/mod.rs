//! Capture pipeline: classification and loop orchestration

pub mod classifier;
pub mod ports;
pub mod service;

use thiserror::Error;
use vigil_domain::VigilError;

/// Errors surfaced by the remote sinks.
///
/// Both categories are non-fatal inside the capture loop: a failed delivery
/// loses at most one sample, and a failed upload degrades the sample's
/// screenshot reference instead of dropping the sample.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log delivery failed: {0}")]
    Delivery(String),

    #[error("artifact upload failed: {0}")]
    Upload(String),
}

impl From<SinkError> for VigilError {
    fn from(err: SinkError) -> Self {
        VigilError::Network(err.to_string())
    }
}
