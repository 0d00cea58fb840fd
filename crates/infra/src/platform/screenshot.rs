//! Primary-display screen capture

use std::path::PathBuf;

use async_trait::async_trait;
use screenshots::Screen;
use tracing::debug;
use vigil_core::CaptureProvider;
use vigil_domain::{Result, VigilError};

/// Captures the primary screen to a fixed local PNG file.
///
/// The file is overwritten on each capture; the durable copy is whatever the
/// blob sink returns, never the local path.
pub struct ScreenCaptureProvider {
    path: PathBuf,
}

impl ScreenCaptureProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CaptureProvider for ScreenCaptureProvider {
    async fn capture_screen(&self) -> Result<PathBuf> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let screens = Screen::all()
                .map_err(|err| VigilError::Platform(format!("screen enumeration failed: {err}")))?;
            let screen = screens
                .first()
                .ok_or_else(|| VigilError::Platform("no displays found".into()))?;
            let image = screen
                .capture()
                .map_err(|err| VigilError::Platform(format!("screen capture failed: {err}")))?;
            image
                .save(&path)
                .map_err(|err| VigilError::Platform(format!("failed to write {}: {err}", path.display())))?;
            debug!(path = %path.display(), "screenshot written");
            Ok(path)
        })
        .await
        .map_err(|err| VigilError::Internal(format!("capture task failed: {err}")))?
    }
}
