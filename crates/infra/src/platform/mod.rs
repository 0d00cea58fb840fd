//! Platform adapters for window inspection and screen capture

mod screenshot;
#[cfg(target_os = "windows")]
mod windows;

pub use screenshot::ScreenCaptureProvider;

use async_trait::async_trait;
use vigil_core::WindowInspector;
use vigil_domain::Result;

/// Foreground window inspector backed by the host window system.
///
/// On Windows this reads the foreground window title through the Win32 API.
/// On other hosts inspection fails with a descriptive platform error, which
/// the capture loop degrades into a sample rather than crashing on.
#[derive(Debug, Default)]
pub struct SystemWindowInspector;

impl SystemWindowInspector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WindowInspector for SystemWindowInspector {
    async fn active_window_title(&self) -> Result<String> {
        #[cfg(target_os = "windows")]
        {
            use vigil_domain::VigilError;
            tokio::task::spawn_blocking(windows::foreground_window_title)
                .await
                .map_err(|err| VigilError::Internal(format!("window inspection task failed: {err}")))?
        }
        #[cfg(not(target_os = "windows"))]
        {
            Err(vigil_domain::VigilError::Platform(
                "foreground window enumeration is not available on this platform".into(),
            ))
        }
    }
}

#[cfg(all(test, not(target_os = "windows")))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_platform_reports_a_descriptive_error() {
        let inspector = SystemWindowInspector::new();
        let err = inspector.active_window_title().await.unwrap_err();
        assert!(err.to_string().contains("not available"));
    }
}
