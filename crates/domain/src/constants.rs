//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Capture loop configuration
pub const DEFAULT_CAPTURE_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SAMPLE_WINDOW_SECS: u64 = 10;
pub const DEFAULT_SCREENSHOT_PATH: &str = "screenshot.png";
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// Session event process names
pub const LOGIN_PROCESS_NAME: &str = "login_process";
pub const LOGOUT_PROCESS_NAME: &str = "logout_process";

// Browser window-title markers (case-sensitive substring match)
pub const DEFAULT_BROWSER_MARKERS: [&str; 3] = ["Chrome", "Firefox", "Edge"];

// Scheduled task registration
pub const DEFAULT_START_OFFSET_SECS: i64 = 60;
pub const TASK_AUTHOR: &str = "Vigil";
pub const REGISTRATION_LOG_FILE: &str = "task_registration.log";

// Remote sink configuration
pub const DEFAULT_SINK_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SINK_MAX_ATTEMPTS: usize = 1;
pub const DEFAULT_SCHEDULER_COMMAND_TIMEOUT_SECS: u64 = 30;
