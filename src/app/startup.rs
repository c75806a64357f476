//! Application startup: configuration, logging, then the pipeline run

use super::cli::{load_config_file, resolve_args, Args};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version;
use crate::monitor::{ConsoleSink, WriterSink};
use crate::pipeline::{PipelineConfig, PipelineError, PipelineResult, RunSummary, Topology};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast;

/// Run the application and return the process exit code
pub async fn startup() -> i32 {
    let cli = Args::parse();

    // The file may set logging options, so it is read before logging starts
    let loaded = load_config_file(cli.config_file.as_deref()).await;
    let (args, config_result) = match loaded {
        Ok(file) => match resolve_args(cli.clone(), file.as_ref().map(|(_, table)| table)) {
            Ok(args) => (args, Ok(file.map(|(path, _)| path))),
            Err(e) => (cli, Err(e)),
        },
        Err(e) => (cli, Err(e)),
    };

    let color = args.color_enabled();
    colored::control::set_override(color);
    let log_file = args.log_file_path().map(|path| path.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return 1;
    }

    log::info!(
        "sendsim {} ({}, built {}) starting",
        version::package_version(),
        version::git_hash(),
        version::build_time()
    );

    match config_result {
        Ok(Some(path)) => log::info!("Loaded configuration from {}", path.display()),
        Ok(None) => log::debug!("No configuration file; using command line and defaults"),
        Err(e) => {
            log_error_with_context(&e, "Loading configuration file");
            return 1;
        }
    }

    let config = args.pipeline_config();
    log::debug!("Pipeline configuration: {:#?}", config);

    let stats_file = args.stats_file.clone();
    let duration = args.run_duration();
    let result = ShutdownCoordinator::guard_with_coordinator(|coordinator, shutdown_rx| {
        run_pipeline(config, stats_file, duration, coordinator, shutdown_rx)
    })
    .await;

    match result {
        Ok(summary) => {
            summary.log();
            if summary.is_clean() {
                log::info!("Shutdown complete");
                0
            } else {
                log::error!("{} pipeline task(s) failed", summary.failures.len());
                1
            }
        }
        Err(e) => {
            log_error_with_context(&e, "Running pipeline");
            1
        }
    }
}

/// Build and run one topology until shutdown, then collect its summary
///
/// Shutdown comes from a signal or, when `duration` is set, from the run
/// time elapsing.
pub async fn run_pipeline(
    config: PipelineConfig,
    stats_file: Option<PathBuf>,
    duration: Option<Duration>,
    coordinator: ShutdownCoordinator,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> PipelineResult<RunSummary> {
    let topology = Topology::build(&config);

    let running = match stats_file {
        Some(path) => {
            let file = tokio::fs::File::create(&path)
                .await
                .map_err(|e| {
                    PipelineError::configuration(
                        "stats-file",
                        format!("cannot create statistics file {}: {}", path.display(), e),
                    )
                })?
                .into_std()
                .await;
            log::info!("Writing statistics to {}", path.display());
            topology.spawn(&coordinator, WriterSink::new(file))?
        }
        None => topology.spawn(&coordinator, ConsoleSink::new())?,
    };

    match duration {
        Some(limit) => {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                _ = tokio::time::sleep(limit) => {
                    log::info!("Run time of {:.1}s elapsed; shutting down", limit.as_secs_f64());
                    coordinator.trigger_shutdown();
                }
            }
        }
        None => {
            let _ = shutdown_rx.recv().await;
        }
    }

    log::info!("Waiting for pipeline tasks to finish");
    Ok(running.join().await)
}
