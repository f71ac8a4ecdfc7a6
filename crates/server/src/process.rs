use std::process::ExitCode;

use common::utils::logging::{init_logging, init_logging_default};
use configs::LogFormat;
use dotenvy::dotenv;
use tracing::{error, info};

use crate::compose::{self, ServiceKind};
use crate::startup::Bootstrap;

/// Entry point shared by the four binaries.
pub fn run(kind: ServiceKind) -> ExitCode {
    dotenv().ok();
    let service = kind.name();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // the profile decides the log format, so it is read before logging starts
    let configured = match Bootstrap::new().configure() {
        Ok(c) => c,
        Err(e) => {
            init_logging_default();
            error!(service, event = "config_invalid", error = %e, "startup aborted");
            return ExitCode::FAILURE;
        }
    };
    init_logging(configured.config().logging.format == LogFormat::Json);
    info!(service, event = "logger_init", profile = %configured.deployment().profile, "tracing subscriber initialized");

    std::panic::set_hook(Box::new(move |info| {
        error!(service, event = "panic", pid, message = %info, "unhandled panic occurred");
    }));

    let worker_threads = configured.config().runtime.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(service, event = "start", pid, version, threads = worker_threads.unwrap_or_default(), "service starting");

    rt.block_on(async move {
        let endpoints = match compose::endpoints(kind, configured.config()).await {
            Ok(endpoints) => endpoints,
            Err(e) => {
                error!(service, event = "compose_failed", error = %e, "startup aborted");
                return ExitCode::FAILURE;
            }
        };
        let serving = match configured.serve(endpoints).await {
            Ok(serving) => serving,
            Err(e) => {
                error!(service, event = "bind_failed", error = %e, "startup aborted");
                return ExitCode::FAILURE;
            }
        };

        tokio::select! {
            res = serving.wait() => match res {
                Ok(()) => {
                    info!(service, event = "stop", pid, "service stopped normally");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(service, event = "serve_failed", error = %e, "listener failed");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service, event = "shutdown_signal", pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
