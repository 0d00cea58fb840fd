//! Task registration service - core business logic

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};
use vigil_domain::{RegisteredTaskHandle, ScheduledTaskSpec};

use super::ports::TaskScheduler;
use super::SchedulerError;

/// Registration service
///
/// Validates CLI inputs, builds the [`ScheduledTaskSpec`] (derived working
/// directory, defaulted start time) and hands it to the scheduler port in a
/// single one-shot call.
pub struct RegistrationService {
    scheduler: Arc<dyn TaskScheduler>,
}

impl RegistrationService {
    pub fn new(scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self { scheduler }
    }

    /// Register a hidden task running `executable_path` under the service
    /// account, starting at `start_time` (now plus one minute when omitted).
    pub async fn register_task(
        &self,
        name: &str,
        executable_path: &str,
        start_time: Option<DateTime<Utc>>,
    ) -> Result<RegisteredTaskHandle, SchedulerError> {
        if name.trim().is_empty() {
            return Err(SchedulerError::Registration("task name must not be empty".into()));
        }
        if executable_path.trim().is_empty() {
            return Err(SchedulerError::Registration("executable path must not be empty".into()));
        }

        let spec = ScheduledTaskSpec::new(name, executable_path, start_time);
        info!(
            task = %spec.name,
            executable = %spec.executable_path,
            working_directory = %spec.working_directory,
            start_time = %spec.start_time,
            "registering scheduled task"
        );

        match self.scheduler.register(&spec).await {
            Ok(handle) => {
                info!(task = %handle.name, "scheduled task registered");
                Ok(handle)
            }
            Err(err) => {
                error!(task = %spec.name, error = %err, "scheduled task registration failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// In-memory scheduler with create-or-update semantics, standing in for
    /// the OS service.
    #[derive(Default)]
    struct InMemoryScheduler {
        tasks: Mutex<HashMap<String, ScheduledTaskSpec>>,
    }

    impl InMemoryScheduler {
        fn task(&self, name: &str) -> Option<ScheduledTaskSpec> {
            self.tasks.lock().unwrap().get(name).cloned()
        }

        fn len(&self) -> usize {
            self.tasks.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TaskScheduler for InMemoryScheduler {
        async fn register(
            &self,
            spec: &ScheduledTaskSpec,
        ) -> Result<RegisteredTaskHandle, SchedulerError> {
            self.tasks.lock().unwrap().insert(spec.name.clone(), spec.clone());
            Ok(RegisteredTaskHandle { name: spec.name.clone(), registered_at: Utc::now() })
        }
    }

    struct UnreachableScheduler;

    #[async_trait]
    impl TaskScheduler for UnreachableScheduler {
        async fn register(
            &self,
            _spec: &ScheduledTaskSpec,
        ) -> Result<RegisteredTaskHandle, SchedulerError> {
            Err(SchedulerError::Connection("service unavailable".into()))
        }
    }

    #[tokio::test]
    async fn registration_builds_spec_with_defaults() {
        let scheduler = Arc::new(InMemoryScheduler::default());
        let service = RegistrationService::new(scheduler.clone());

        let before = Utc::now();
        let handle = service.register_task("Agent", r"C:\tools\agent.exe", None).await.unwrap();
        assert_eq!(handle.name, "Agent");

        let spec = scheduler.task("Agent").unwrap();
        assert_eq!(spec.working_directory, r"C:\tools");
        assert!(spec.hidden);
        let offset = spec.start_time - before;
        assert!(
            offset >= chrono::Duration::seconds(59) && offset <= chrono::Duration::seconds(61),
            "start offset was {offset}"
        );
    }

    #[tokio::test]
    async fn re_registration_overwrites_instead_of_duplicating() {
        let scheduler = Arc::new(InMemoryScheduler::default());
        let service = RegistrationService::new(scheduler.clone());

        service.register_task("Agent", r"C:\old\agent.exe", None).await.unwrap();
        service.register_task("Agent", r"C:\new\agent.exe", None).await.unwrap();

        assert_eq!(scheduler.len(), 1);
        let spec = scheduler.task("Agent").unwrap();
        assert_eq!(spec.executable_path, r"C:\new\agent.exe");
        assert_eq!(spec.working_directory, r"C:\new");
    }

    #[tokio::test]
    async fn empty_inputs_are_rejected_before_the_service_is_touched() {
        let service = RegistrationService::new(Arc::new(UnreachableScheduler));
        let err = service.register_task("", "agent.exe", None).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Registration(_)));

        let err = service.register_task("Agent", "  ", None).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Registration(_)));
    }

    #[tokio::test]
    async fn connection_failures_propagate() {
        let service = RegistrationService::new(Arc::new(UnreachableScheduler));
        let err = service.register_task("Agent", "agent.exe", None).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Connection(_)));
    }
}
