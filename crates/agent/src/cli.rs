//! Command-line interface for the agent

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use vigil_domain::{Result, VigilError};

/// Two invocation modes: `task` registers the agent with the OS scheduler,
/// everything else (including no arguments) runs the capture loop.
#[derive(Debug, Parser)]
#[command(
    name = "vigil",
    version = env!("CARGO_PKG_VERSION"),
    about = "Single-host activity monitoring agent",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register the agent with the OS scheduled-execution service
    Task {
        /// Unique task name within the scheduler namespace
        task_name: String,
        /// Full path to the executable the task runs
        executable_path: String,
        /// ISO 8601 start time (defaults to one minute from now)
        start_time: Option<String>,
    },
    /// Any other invocation falls through to monitoring mode
    #[command(external_subcommand)]
    Monitor(Vec<String>),
}

/// Whether the raw arguments target registration mode.
///
/// Checked before parsing so a `task` invocation with bad arguments still
/// routes its usage failure to the registration diagnostic log.
pub fn is_task_invocation<I, S>(mut args: I) -> bool
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    args.next().is_some_and(|arg| arg.as_ref() == "task")
}

/// Parse an operator-supplied start time.
///
/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` interpreted in local
/// time.
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|err| VigilError::InvalidInput(format!("invalid start time {raw:?}: {err}")))?;

    Local
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| VigilError::InvalidInput(format!("ambiguous local start time {raw:?}")))
}
