//! Windows Task Scheduler client
//!
//! Drives the OS scheduled-execution service through `schtasks`, keeping the
//! registration contract intact: a rigid connect, define, register order;
//! create-or-update semantics so re-registration of the same name overwrites;
//! and best-effort cleanup so a failed registration leaves no enabled task
//! behind. Each service command is bounded by a timeout.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, info, warn};
use vigil_core::{SchedulerError, TaskScheduler};
use vigil_domain::constants::TASK_AUTHOR;
use vigil_domain::{RegisteredTaskHandle, RunLevel, RunPrincipal, ScheduledTaskSpec, SchedulerConfig};

/// Task Scheduler client for registration-mode invocations.
pub struct SystemTaskScheduler {
    command_timeout: Duration,
}

impl SystemTaskScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self { command_timeout: Duration::from_secs(config.command_timeout_seconds) }
    }

    /// Connecting: probe the scheduling service before defining anything.
    async fn connect(&self) -> Result<(), SchedulerError> {
        let output = self.run_schtasks(&["/Query"]).await.map_err(SchedulerError::Connection)?;
        if !output.status.success() {
            return Err(SchedulerError::Connection(command_failure_text(&output)));
        }
        debug!("task scheduler service reachable");
        Ok(())
    }

    /// Registering: stage the definition and submit it in a single
    /// create-or-update call (`/F` overwrites an existing task of the same
    /// name instead of erroring).
    async fn register_definition(
        &self,
        spec: &ScheduledTaskSpec,
        definition: &str,
    ) -> Result<(), SchedulerError> {
        let xml_path = definition_file_path(&spec.name);
        tokio::fs::write(&xml_path, definition).await.map_err(|err| {
            SchedulerError::Registration(format!("failed to stage task definition: {err}"))
        })?;

        let xml_arg = xml_path.to_string_lossy().to_string();
        let result = self
            .run_schtasks(&["/Create", "/TN", &spec.name, "/XML", &xml_arg, "/F"])
            .await;
        let _ = tokio::fs::remove_file(&xml_path).await;

        let output = result.map_err(SchedulerError::Registration)?;
        if !output.status.success() {
            return Err(SchedulerError::Registration(command_failure_text(&output)));
        }
        Ok(())
    }

    /// Best-effort cleanup after a failed registration.
    async fn cleanup(&self, name: &str) {
        match self.run_schtasks(&["/Delete", "/TN", name, "/F"]).await {
            Ok(_) => debug!(task = name, "cleanup delete issued"),
            Err(err) => warn!(task = name, error = %err, "cleanup delete failed"),
        }
    }

    async fn run_schtasks(&self, args: &[&str]) -> Result<Output, String> {
        debug!(?args, "invoking schtasks");
        match tokio::time::timeout(
            self.command_timeout,
            Command::new("schtasks").args(args).output(),
        )
        .await
        {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => Err(format!("failed to invoke schtasks: {err}")),
            Err(_) => Err(format!("schtasks timed out after {:?}", self.command_timeout)),
        }
    }
}

#[async_trait]
impl TaskScheduler for SystemTaskScheduler {
    async fn register(
        &self,
        spec: &ScheduledTaskSpec,
    ) -> Result<RegisteredTaskHandle, SchedulerError> {
        self.connect().await?;

        // Defining: the whole multi-field definition is rendered up front so
        // registration against the service is a single call.
        let definition = render_task_definition(spec);

        if let Err(err) = self.register_definition(spec, &definition).await {
            self.cleanup(&spec.name).await;
            return Err(err);
        }

        info!(task = %spec.name, "task registered with OS scheduler");
        Ok(RegisteredTaskHandle { name: spec.name.clone(), registered_at: Utc::now() })
    }
}

/// Render the Task Scheduler XML for a spec: metadata, service-account
/// principal at the requested run level, hidden/enabled settings with
/// battery suspension disabled, one enabled time trigger, one exec action.
fn render_task_definition(spec: &ScheduledTaskSpec) -> String {
    let user_id = match spec.run_as {
        // Built-in SYSTEM account SID
        RunPrincipal::LocalSystem => "S-1-5-18",
    };
    let run_level = match spec.run_level {
        RunLevel::Highest => "HighestAvailable",
    };
    // Zone-less boundaries are read as local time by the service; keep the
    // explicit offset so the trigger fires at the requested instant.
    let start_boundary = spec.start_time.format("%Y-%m-%dT%H:%M:%S%:z");

    // The definition is staged as UTF-8 bytes; the prolog must declare the
    // same encoding or the service decodes the file as the wrong width.
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Task version="1.2" xmlns="http://schemas.microsoft.com/windows/2004/02/mit/task">
  <RegistrationInfo>
    <Author>{author}</Author>
    <Description>{description}</Description>
  </RegistrationInfo>
  <Triggers>
    <TimeTrigger>
      <StartBoundary>{start_boundary}</StartBoundary>
      <Enabled>true</Enabled>
    </TimeTrigger>
  </Triggers>
  <Principals>
    <Principal id="Author">
      <UserId>{user_id}</UserId>
      <LogonType>ServiceAccount</LogonType>
      <RunLevel>{run_level}</RunLevel>
    </Principal>
  </Principals>
  <Settings>
    <Hidden>{hidden}</Hidden>
    <Enabled>true</Enabled>
    <DisallowStartIfOnBatteries>false</DisallowStartIfOnBatteries>
    <StopIfGoingOnBatteries>false</StopIfGoingOnBatteries>
  </Settings>
  <Actions Context="Author">
    <Exec>
      <Command>{command}</Command>
      <WorkingDirectory>{working_directory}</WorkingDirectory>
    </Exec>
  </Actions>
</Task>
"#,
        author = xml_escape(TASK_AUTHOR),
        description = xml_escape(&format!("Vigil monitoring task: {}", spec.name)),
        hidden = spec.hidden,
        command = xml_escape(&spec.executable_path),
        working_directory = xml_escape(&spec.working_directory),
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn command_failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("schtasks exited with {}", output.status)
    } else {
        format!("schtasks exited with {}: {stderr}", output.status)
    }
}

fn definition_file_path(task_name: &str) -> PathBuf {
    let sanitized: String = task_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    std::env::temp_dir().join(format!("vigil-task-{sanitized}.xml"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn spec() -> ScheduledTaskSpec {
        ScheduledTaskSpec::new("Agent", r"C:\tools\agent.exe", None)
    }

    #[test]
    fn definition_carries_the_spec_fields() {
        let spec = spec();
        let xml = render_task_definition(&spec);
        assert!(xml.contains("<Hidden>true</Hidden>"));
        assert!(xml.contains("<UserId>S-1-5-18</UserId>"));
        assert!(xml.contains("<RunLevel>HighestAvailable</RunLevel>"));
        assert!(xml.contains("<LogonType>ServiceAccount</LogonType>"));
        assert!(xml.contains(r"<Command>C:\tools\agent.exe</Command>"));
        assert!(xml.contains(r"<WorkingDirectory>C:\tools</WorkingDirectory>"));
        assert!(xml.contains("<DisallowStartIfOnBatteries>false</DisallowStartIfOnBatteries>"));
        assert!(xml.contains("<StopIfGoingOnBatteries>false</StopIfGoingOnBatteries>"));
        let boundary = spec.start_time.format("%Y-%m-%dT%H:%M:%S%:z").to_string();
        assert!(xml.contains(&format!("<StartBoundary>{boundary}</StartBoundary>")));
    }

    #[test]
    fn definition_declares_the_encoding_it_is_staged_in() {
        // register_definition writes the rendered String verbatim as UTF-8
        let xml = render_task_definition(&spec());
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(!xml.contains("UTF-16"));
    }

    #[test]
    fn start_boundary_carries_an_explicit_utc_offset() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let spec = ScheduledTaskSpec::new("Agent", r"C:\tools\agent.exe", Some(start));
        let xml = render_task_definition(&spec);
        assert!(xml.contains("<StartBoundary>2026-09-01T08:00:00+00:00</StartBoundary>"));
    }

    #[test]
    fn definition_has_exactly_one_trigger_and_one_action() {
        let xml = render_task_definition(&spec());
        assert_eq!(xml.matches("<TimeTrigger>").count(), 1);
        assert_eq!(xml.matches("<Exec>").count(), 1);
    }

    #[test]
    fn xml_special_characters_are_escaped() {
        let spec = ScheduledTaskSpec::new("A&B", r"C:\tools <x>\agent.exe", None);
        let xml = render_task_definition(&spec);
        assert!(xml.contains("A&amp;B"));
        assert!(xml.contains(r"C:\tools &lt;x&gt;\agent.exe"));
    }

    #[test]
    fn definition_file_name_is_sanitized() {
        let path = definition_file_path("My Task/../x");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, "vigil-task-My_Task____x.xml");
    }

    #[cfg(not(target_os = "windows"))]
    #[tokio::test]
    async fn register_fails_with_connection_error_off_windows() {
        // schtasks does not exist here, so the connect step must fail
        let scheduler = SystemTaskScheduler::new(&SchedulerConfig::default());
        let err = scheduler.register(&spec()).await.unwrap_err();
        assert!(matches!(err, SchedulerError::Connection(_)));
    }
}
