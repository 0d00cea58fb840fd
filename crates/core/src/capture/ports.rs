//! Port interfaces for the capture pipeline
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use vigil_domain::{ActivityEvent, Result};

use super::SinkError;

/// Trait for reading the foreground window title from the OS
#[async_trait]
pub trait WindowInspector: Send + Sync {
    /// Title of the current foreground window
    async fn active_window_title(&self) -> Result<String>;
}

/// Trait for producing a screenshot artifact
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    /// Capture the primary screen and return the local artifact path.
    ///
    /// The path is fixed and overwritten on each capture; callers needing
    /// retention must persist the uploaded reference, not the local file.
    async fn capture_screen(&self) -> Result<PathBuf>;
}

/// Trait for uploading a local artifact to remote storage
#[async_trait]
pub trait BlobSink: Send + Sync {
    /// Upload the artifact and return a durable remote reference
    async fn upload(&self, artifact: &Path) -> std::result::Result<String, SinkError>;
}

/// Trait for appending events to the remote append-only store
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Append one structured event record
    async fn append(&self, event: &ActivityEvent) -> std::result::Result<(), SinkError>;
}

/// Trait resolving the identity of the session owner.
///
/// Resolved once per event rather than cached for the whole run, so an
/// account switch is reflected in subsequent samples.
pub trait IdentityProvider: Send + Sync {
    fn username(&self) -> String;
}
