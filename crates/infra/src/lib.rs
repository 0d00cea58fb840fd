//! # Vigil Infra
//!
//! Infrastructure adapters for the Vigil monitoring agent.
//!
//! This crate implements the ports defined in `vigil-core`:
//! - Platform window inspection and screen capture
//! - HTTP log and blob sinks over a retrying HTTP client
//! - OS task-scheduler client
//! - Configuration loading and session identity resolution

pub mod config;
pub mod http;
pub mod identity;
pub mod platform;
pub mod scheduling;
pub mod sinks;

pub use http::HttpClient;
pub use identity::SessionIdentityProvider;
pub use platform::{ScreenCaptureProvider, SystemWindowInspector};
pub use scheduling::SystemTaskScheduler;
pub use sinks::{HttpBlobSink, HttpLogSink};
