//! Configuration loader
//!
//! Loads agent configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. If no file is found, built-in defaults apply
//!
//! ## Environment Variables
//! - `VIGIL_LOG_ENDPOINT`: append-only event store endpoint (required)
//! - `VIGIL_BLOB_ENDPOINT`: artifact upload endpoint (required)
//! - `VIGIL_CAPTURE_INTERVAL`: seconds between samples
//! - `VIGIL_SAMPLE_WINDOW`: seconds attributed to each sample
//! - `VIGIL_SCREENSHOT_PATH`: local screenshot file path
//! - `VIGIL_BROWSER_MARKERS`: comma-separated browser window-title markers
//! - `VIGIL_SINK_TIMEOUT`: sink call timeout in seconds
//! - `VIGIL_SINK_MAX_ATTEMPTS`: delivery attempts per sink call
//! - `VIGIL_SCHEDULER_COMMAND_TIMEOUT`: scheduler command timeout in seconds
//!
//! ## File Locations
//! The loader probes `config.json`, `config.toml`, `vigil.json` and
//! `vigil.toml` in the current working directory.

use std::path::{Path, PathBuf};

use vigil_domain::{AgentConfig, CaptureConfig, Result, SchedulerConfig, SinkConfig, VigilError};

/// Load configuration with automatic fallback strategy.
///
/// Environment first, then a probed config file, then built-in defaults, so
/// the agent runs unattended without requiring any local setup.
pub fn load() -> Result<AgentConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(env_err) => {
            tracing::debug!(error = ?env_err, "environment incomplete, trying file");
            match load_from_file(None) {
                Ok(config) => Ok(config),
                Err(file_err) => {
                    tracing::info!(error = ?file_err, "no configuration found, using defaults");
                    Ok(AgentConfig::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables.
///
/// The sink endpoints are required; everything else falls back to defaults.
///
/// # Errors
/// Returns `VigilError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<AgentConfig> {
    let log_endpoint = env_var("VIGIL_LOG_ENDPOINT")?;
    let blob_endpoint = env_var("VIGIL_BLOB_ENDPOINT")?;

    let defaults = AgentConfig::default();

    Ok(AgentConfig {
        capture: CaptureConfig {
            interval_seconds: env_parse("VIGIL_CAPTURE_INTERVAL", defaults.capture.interval_seconds)?,
            sample_window_seconds: env_parse(
                "VIGIL_SAMPLE_WINDOW",
                defaults.capture.sample_window_seconds,
            )?,
            screenshot_path: std::env::var("VIGIL_SCREENSHOT_PATH")
                .unwrap_or(defaults.capture.screenshot_path),
            shutdown_timeout_seconds: defaults.capture.shutdown_timeout_seconds,
            browser_markers: env_markers("VIGIL_BROWSER_MARKERS", defaults.capture.browser_markers),
        },
        sinks: SinkConfig {
            log_endpoint,
            blob_endpoint,
            timeout_seconds: env_parse("VIGIL_SINK_TIMEOUT", defaults.sinks.timeout_seconds)?,
            max_attempts: env_parse("VIGIL_SINK_MAX_ATTEMPTS", defaults.sinks.max_attempts)?,
        },
        scheduler: SchedulerConfig {
            command_timeout_seconds: env_parse(
                "VIGIL_SCHEDULER_COMMAND_TIMEOUT",
                defaults.scheduler.command_timeout_seconds,
            )?,
        },
    })
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the working-directory locations listed in the
/// module documentation. JSON and TOML are detected by extension.
pub fn load_from_file(path: Option<&Path>) -> Result<AgentConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => probe_config_paths().ok_or_else(|| {
            VigilError::Config("no configuration file found in working directory".into())
        })?,
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|err| VigilError::Config(format!("failed to read {}: {err}", path.display())))?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|err| VigilError::Config(format!("invalid JSON in {}: {err}", path.display())))?,
        Some("toml") => toml::from_str(&content)
            .map_err(|err| VigilError::Config(format!("invalid TOML in {}: {err}", path.display())))?,
        other => {
            return Err(VigilError::Config(format!(
                "unsupported config extension {other:?} for {}",
                path.display()
            )))
        }
    };

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    ["config.json", "config.toml", "vigil.json", "vigil.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| VigilError::Config(format!("missing environment variable {name}")))
}

fn env_markers(name: &str, default: Vec<String>) -> Vec<String> {
    match std::env::var(name) {
        Ok(raw) => {
            let markers: Vec<String> = raw
                .split(',')
                .map(|marker| marker.trim().to_string())
                .filter(|marker| !marker.is_empty())
                .collect();
            if markers.is_empty() {
                default
            } else {
                markers
            }
        }
        Err(_) => default,
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|err| VigilError::Config(format!("invalid value for {name}: {err}"))),
        Err(_) => Ok(default),
    }
}
