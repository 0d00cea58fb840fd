//! HTTP plumbing shared by the sink adapters

mod client;

pub use client::{HttpClient, HttpClientBuilder};
