//! Common data types used throughout the application

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_START_OFFSET_SECS, LOGIN_PROCESS_NAME, LOGOUT_PROCESS_NAME};

/// Session boundary event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserEventKind {
    Login,
    Logout,
}

impl UserEventKind {
    /// Process name recorded alongside the session event.
    pub fn process_name(&self) -> &'static str {
        match self {
            UserEventKind::Login => LOGIN_PROCESS_NAME,
            UserEventKind::Logout => LOGOUT_PROCESS_NAME,
        }
    }
}

/// One record delivered to the log sink.
///
/// Serialized untagged so every variant lands in the store as a flat
/// document, matching the append-only record shape the sink expects.
/// Events are immutable once constructed and persisted exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActivityEvent {
    /// Session bracketing event (login or logout), a point in time.
    User {
        id: Uuid,
        username: String,
        event: UserEventKind,
        process_name: String,
        timestamp: DateTime<Utc>,
    },
    /// A sample classified as browser activity.
    Browser {
        id: Uuid,
        username: String,
        active_window: String,
        active_url: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
    /// A sample classified as application activity, with screenshot evidence.
    App {
        id: Uuid,
        username: String,
        active_window: String,
        screenshot_ref: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    },
}

impl ActivityEvent {
    /// Create a session bracketing event.
    pub fn user(username: impl Into<String>, event: UserEventKind, timestamp: DateTime<Utc>) -> Self {
        Self::User {
            id: Uuid::new_v4(),
            username: username.into(),
            event,
            process_name: event.process_name().to_string(),
            timestamp,
        }
    }

    /// Create a browser activity sample.
    ///
    /// The active URL is the window title verbatim: no deeper URL extraction
    /// is performed. This is a documented approximation, a browser window
    /// title is the closest URL evidence available without instrumenting the
    /// browser itself.
    pub fn browser(
        username: impl Into<String>,
        active_window: impl Into<String>,
        start_time: DateTime<Utc>,
        sample_window: Duration,
    ) -> Self {
        let active_window = active_window.into();
        Self::Browser {
            id: Uuid::new_v4(),
            username: username.into(),
            active_url: active_window.clone(),
            active_window,
            start_time,
            end_time: start_time + sample_window,
        }
    }

    /// Create an application activity sample.
    ///
    /// `screenshot_ref` is either a durable remote reference or a
    /// failure-descriptive string when capture or upload degraded.
    pub fn app(
        username: impl Into<String>,
        active_window: impl Into<String>,
        screenshot_ref: impl Into<String>,
        start_time: DateTime<Utc>,
        sample_window: Duration,
    ) -> Self {
        Self::App {
            id: Uuid::new_v4(),
            username: username.into(),
            active_window: active_window.into(),
            screenshot_ref: screenshot_ref.into(),
            start_time,
            end_time: start_time + sample_window,
        }
    }

    /// Username the event was recorded for.
    pub fn username(&self) -> &str {
        match self {
            Self::User { username, .. }
            | Self::Browser { username, .. }
            | Self::App { username, .. } => username,
        }
    }

    /// Stable label for logging and metrics.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::User { .. } => "session",
            Self::Browser { .. } => "browser",
            Self::App { .. } => "app",
        }
    }
}

/// Privilege level a scheduled task runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunLevel {
    Highest,
}

/// Account identity a scheduled task runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPrincipal {
    /// Built-in non-interactive service account (SYSTEM).
    LocalSystem,
}

/// Description of a task to register with the OS scheduled-execution service.
///
/// `name` is the unique key within the scheduler namespace; registering the
/// same name again overwrites the previous definition (create-or-update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTaskSpec {
    pub name: String,
    pub executable_path: String,
    pub working_directory: String,
    pub start_time: DateTime<Utc>,
    pub run_as: RunPrincipal,
    pub run_level: RunLevel,
    pub hidden: bool,
}

impl ScheduledTaskSpec {
    /// Build a spec with derived working directory and defaulted start time
    /// (now plus one minute when unspecified).
    pub fn new(
        name: impl Into<String>,
        executable_path: impl Into<String>,
        start_time: Option<DateTime<Utc>>,
    ) -> Self {
        let executable_path = executable_path.into();
        let working_directory = derive_working_directory(&executable_path);
        Self {
            name: name.into(),
            executable_path,
            working_directory,
            start_time: start_time
                .unwrap_or_else(|| Utc::now() + Duration::seconds(DEFAULT_START_OFFSET_SECS)),
            run_as: RunPrincipal::LocalSystem,
            run_level: RunLevel::Highest,
            hidden: true,
        }
    }
}

/// Working directory is the text before the last path separator; a bare
/// filename has no directory component and yields an empty string.
pub fn derive_working_directory(executable_path: &str) -> String {
    executable_path
        .rfind(['\\', '/'])
        .map(|idx| executable_path[..idx].to_string())
        .unwrap_or_default()
}

/// Handle returned by a successful task registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredTaskHandle {
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

/// One observation of foreground activity, consumed immediately by the
/// classifier and never persisted.
#[derive(Debug, Clone)]
pub struct CaptureSample {
    pub window_title: String,
    pub captured_at: DateTime<Utc>,
}

impl CaptureSample {
    pub fn now(window_title: impl Into<String>) -> Self {
        Self { window_title: window_title.into(), captured_at: Utc::now() }
    }
}
