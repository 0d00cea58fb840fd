//! # Vigil Core
//!
//! Business logic for the Vigil monitoring agent.
//!
//! This crate contains:
//! - Port traits separating core logic from OS and network adapters
//! - The activity classifier
//! - The capture loop orchestration service
//! - The scheduled-task registration service
//!
//! ## Architecture
//! - Depends only on `vigil-domain`
//! - Infrastructure implementations live in `vigil-infra`

pub mod capture;
pub mod registration;

pub use capture::classifier::{ActivityClassifier, ActivityKind};
pub use capture::ports::{BlobSink, CaptureProvider, IdentityProvider, LogSink, WindowInspector};
pub use capture::service::{CaptureLoopConfig, CaptureService};
pub use capture::SinkError;
pub use registration::ports::TaskScheduler;
pub use registration::service::RegistrationService;
pub use registration::SchedulerError;
