//! Configuration structures for the agent

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BROWSER_MARKERS, DEFAULT_CAPTURE_INTERVAL_SECS, DEFAULT_SAMPLE_WINDOW_SECS,
    DEFAULT_SCHEDULER_COMMAND_TIMEOUT_SECS, DEFAULT_SCREENSHOT_PATH, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
    DEFAULT_SINK_MAX_ATTEMPTS, DEFAULT_SINK_TIMEOUT_SECS,
};

/// Top-level agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub sinks: SinkConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Capture loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Seconds between samples
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Length attributed to each sample (end_time - start_time)
    #[serde(default = "default_sample_window")]
    pub sample_window_seconds: u64,
    /// Local screenshot file, overwritten on each capture
    #[serde(default = "default_screenshot_path")]
    pub screenshot_path: String,
    /// Bound on the session-logout write during shutdown
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// Window-title markers classified as browser activity
    /// (case-sensitive substring match)
    #[serde(default = "default_browser_markers")]
    pub browser_markers: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_CAPTURE_INTERVAL_SECS,
            sample_window_seconds: DEFAULT_SAMPLE_WINDOW_SECS,
            screenshot_path: DEFAULT_SCREENSHOT_PATH.to_string(),
            shutdown_timeout_seconds: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            browser_markers: default_browser_markers(),
        }
    }
}

/// Remote sink endpoints and delivery policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Append-only event store endpoint
    #[serde(default = "default_log_endpoint")]
    pub log_endpoint: String,
    /// Artifact upload endpoint
    #[serde(default = "default_blob_endpoint")]
    pub blob_endpoint: String,
    /// Timeout per sink call in seconds
    #[serde(default = "default_sink_timeout")]
    pub timeout_seconds: u64,
    /// Delivery attempts per sink call. The capture loop is best-effort
    /// single-attempt by default; raising this enables bounded retry.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            log_endpoint: default_log_endpoint(),
            blob_endpoint: default_blob_endpoint(),
            timeout_seconds: DEFAULT_SINK_TIMEOUT_SECS,
            max_attempts: DEFAULT_SINK_MAX_ATTEMPTS,
        }
    }
}

/// Scheduled-task registration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Timeout for each scheduler service command in seconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { command_timeout_seconds: DEFAULT_SCHEDULER_COMMAND_TIMEOUT_SECS }
    }
}

fn default_interval() -> u64 {
    DEFAULT_CAPTURE_INTERVAL_SECS
}

fn default_sample_window() -> u64 {
    DEFAULT_SAMPLE_WINDOW_SECS
}

fn default_screenshot_path() -> String {
    DEFAULT_SCREENSHOT_PATH.to_string()
}

fn default_shutdown_timeout() -> u64 {
    DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

fn default_browser_markers() -> Vec<String> {
    DEFAULT_BROWSER_MARKERS.iter().map(|m| m.to_string()).collect()
}

fn default_log_endpoint() -> String {
    "http://127.0.0.1:8750/events".to_string()
}

fn default_blob_endpoint() -> String {
    "http://127.0.0.1:8750/artifacts".to_string()
}

fn default_sink_timeout() -> u64 {
    DEFAULT_SINK_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_SINK_MAX_ATTEMPTS
}

fn default_command_timeout() -> u64 {
    DEFAULT_SCHEDULER_COMMAND_TIMEOUT_SECS
}
