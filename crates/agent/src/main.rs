//! Vigil agent entrypoint
//!
//! `vigil task <NAME> <EXECUTABLE> [START_TIME]` registers the agent with the
//! OS scheduled-execution service and exits; any other invocation runs the
//! capture loop until interrupted.

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vigil_core::{ActivityClassifier, CaptureLoopConfig, CaptureService, RegistrationService};
use vigil_domain::constants::REGISTRATION_LOG_FILE;
use vigil_domain::{Result, VigilError};
use vigil_infra::{
    config, HttpBlobSink, HttpLogSink, ScreenCaptureProvider, SessionIdentityProvider,
    SystemTaskScheduler, SystemWindowInspector,
};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() {
    // Tracing guards must drop before the exit call so the registration log
    // file is flushed
    let code = run().await;
    std::process::exit(code);
}

async fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Registration attempts with bad arguments still reach the
            // diagnostic log file
            let _guard = cli::is_task_invocation(std::env::args().skip(1))
                .then(init_registration_tracing);
            error!(error = %err.kind(), "invalid command line");
            let _ = err.print();
            return 1;
        }
    };

    match cli.command {
        Some(Command::Task { task_name, executable_path, start_time }) => {
            let _guard = init_registration_tracing();
            if let Err(err) = run_registration(&task_name, &executable_path, start_time).await {
                error!(error = %err, task = %task_name, "registration mode failed");
                return 1;
            }
        }
        _ => {
            init_monitor_tracing();
            if let Err(err) = run_monitoring().await {
                error!(error = %err, "monitoring mode failed to start");
                return 1;
            }
        }
    }
    0
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_monitor_tracing() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Console output plus an append-only diagnostic log of registration
/// attempts and their outcomes.
fn init_registration_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(".", REGISTRATION_LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    guard
}

async fn run_registration(
    task_name: &str,
    executable_path: &str,
    start_time: Option<String>,
) -> Result<()> {
    let start_time = start_time.as_deref().map(cli::parse_start_time).transpose()?;

    let config = config::load()?;
    let scheduler = Arc::new(SystemTaskScheduler::new(&config.scheduler));
    let service = RegistrationService::new(scheduler);

    let handle = service
        .register_task(task_name, executable_path, start_time)
        .await
        .map_err(VigilError::from)?;

    println!("Scheduled task '{}' registered.", handle.name);
    Ok(())
}

async fn run_monitoring() -> Result<()> {
    let config = config::load()?;

    let log_sink = Arc::new(HttpLogSink::from_config(&config.sinks)?);
    let blob_sink = Arc::new(HttpBlobSink::from_config(&config.sinks)?);

    let service = Arc::new(CaptureService::new(
        Arc::new(SystemWindowInspector::new()),
        Arc::new(ScreenCaptureProvider::new(config.capture.screenshot_path.as_str())),
        blob_sink,
        log_sink,
        Arc::new(SessionIdentityProvider::new()),
        ActivityClassifier::new(config.capture.browser_markers.clone()),
        CaptureLoopConfig::from_config(&config.capture),
    ));

    info!(
        interval_seconds = config.capture.interval_seconds,
        log_endpoint = %config.sinks.log_endpoint,
        "starting capture loop"
    );

    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let loop_service = Arc::clone(&service);
    let loop_handle = tokio::spawn(async move { loop_service.run(loop_cancel).await });

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for interrupt signal");
    }
    info!("interrupt received, shutting down");
    cancel.cancel();

    // The loop records the session logout before finishing
    if let Err(err) = loop_handle.await {
        error!(error = %err, "capture loop task failed");
    }

    Ok(())
}
