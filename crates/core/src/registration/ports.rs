//! Port interface for the OS scheduled-execution service

use async_trait::async_trait;
use vigil_domain::{RegisteredTaskHandle, ScheduledTaskSpec};

use super::SchedulerError;

/// Trait abstracting the OS's native scheduled-execution facility.
///
/// Implementations must preserve two contract points regardless of the
/// platform API they target:
/// - create-or-update semantics: registering an existing name overwrites the
///   previous definition and never produces duplicates
/// - atomic definition: a failure after connecting must not leave a
///   partially-registered enabled task behind (best-effort cleanup)
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Register the task described by `spec`, returning a handle on success
    async fn register(
        &self,
        spec: &ScheduledTaskSpec,
    ) -> Result<RegisteredTaskHandle, SchedulerError>;
}
