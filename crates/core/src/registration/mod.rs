//! Scheduled-task registration: port and service

pub mod ports;
pub mod service;

use thiserror::Error;
use vigil_domain::VigilError;

/// Errors from the OS scheduled-execution service.
///
/// Registration-path errors are fatal: there is no retry in this subsystem,
/// failures propagate to the caller and surface as a non-zero exit.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The scheduling service could not be reached
    #[error("scheduler service connection failed: {0}")]
    Connection(String),

    /// The task definition was rejected (invalid path, invalid principal,
    /// or a naming conflict the overwrite could not resolve)
    #[error("task registration rejected: {0}")]
    Registration(String),
}

impl From<SchedulerError> for VigilError {
    fn from(err: SchedulerError) -> Self {
        VigilError::Scheduler(err.to_string())
    }
}
