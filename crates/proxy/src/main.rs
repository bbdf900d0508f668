//! S3 Proxy - Main Application Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use config::{BootSequence, BootSettings, EnvSink, EnvSnapshot, ProcessEnv};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod version;

use app::Application;

/// Reverse proxy in front of an S3 bucket
#[derive(Parser, Debug)]
#[command(name = "s3-proxy", version)]
struct Cli {
    /// Bucket descriptor path, overrides the settings
    #[arg(long)]
    descriptor: Option<PathBuf>,

    /// YAML file with proxy settings
    #[arg(long, env = "S3_PROXY_SETTINGS")]
    settings: Option<PathBuf>,

    /// Resolve and validate the configuration, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists; reported once logging is up
    let dotenv_result = dotenv::dotenv();

    let cli = Cli::parse();

    let mut settings =
        BootSettings::load(cli.settings.as_deref()).context("Failed to load proxy settings")?;
    if let Some(path) = &cli.descriptor {
        settings.descriptor_path = path.display().to_string();
    }

    // Initialize logging
    init_logging(&settings)?;

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if !e.not_found() => warn!("Could not load .env file: {}", e),
        Err(_) => {}
    }

    info!("Starting S3 proxy v{}", env!("CARGO_PKG_VERSION"));

    // Snapshot before anything is published so resolution never reads its own writes
    let env = EnvSnapshot::from_process();

    let resolver =
        region_resolver::from_settings(&settings).context("Failed to create region resolver")?;

    let mut sink: Box<dyn EnvSink> = if settings.publish_environment {
        Box::new(ProcessEnv)
    } else {
        Box::new(EnvSnapshot::new())
    };

    let mut boot = BootSequence::new(&settings.descriptor_path);
    let ready = match boot.run(&env, resolver.as_ref(), sink.as_mut()).await {
        Ok(ready) => ready,
        Err(e) => {
            error!(
                state = ?boot.state(),
                descriptor = %boot.descriptor_path().display(),
                error = %e,
                "Fatal configuration error, aborting"
            );
            std::process::exit(1);
        }
    };

    info!("{}", ready.report.summary());

    if cli.check {
        info!(
            listen_mode = ?ready.config.listen_mode(),
            "Configuration check passed"
        );
        return Ok(());
    }

    // Create and start the application
    let mut app = Application::new(ready).context("Failed to create application")?;

    // Setup signal handling
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    };

    tokio::select! {
        result = app.run() => {
            if let Err(e) = result {
                error!("Application error: {:#}", e);
                return Err(e);
            }
        }
        _ = shutdown_signal => {
            info!("Initiating graceful shutdown...");
            app.shutdown().await?;
        }
    }

    info!("S3 proxy shutdown complete");
    Ok(())
}

/// Initialize logging from the boot settings; `RUST_LOG` wins for the filter
fn init_logging(settings: &BootSettings) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.log_format.as_str() {
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    if settings.log_level == "trace" || settings.log_level == "debug" {
        warn!("Debug/trace logging enabled - may impact performance in production");
    }

    Ok(())
}
