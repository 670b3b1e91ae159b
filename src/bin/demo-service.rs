use std::time::Duration;

use clap::{Parser, ValueEnum};
use health_gate::config::ObservabilityConfig;
use health_gate::lifecycle::{signals, Cancellation};
use health_gate::observability::logging;
use health_gate::service::{self, ServiceMode};
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// /health always returns 200
    Healthy,
    /// /health returns 503 until --ready-after has elapsed
    SlowStart,
    /// /health always returns 503
    Unhealthy,
}

#[derive(Parser)]
#[command(name = "demo-service")]
#[command(about = "Tiny web service with a health endpoint, for exercising health-gate", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: String,

    #[arg(short, long, value_enum, default_value_t = Mode::Healthy)]
    mode: Mode,

    /// Startup time simulated by slow-start mode (e.g. "10s")
    #[arg(long, value_parser = humantime::parse_duration, default_value = "10s")]
    ready_after: Duration,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init(&ObservabilityConfig {
        log_level: cli.log_level.clone(),
        ..ObservabilityConfig::default()
    })?;

    let mode = match cli.mode {
        Mode::Healthy => ServiceMode::Healthy,
        Mode::SlowStart => ServiceMode::SlowStart {
            ready_after: cli.ready_after,
        },
        Mode::Unhealthy => ServiceMode::Unhealthy,
    };

    let listener = TcpListener::bind(&cli.bind).await?;

    let shutdown = Cancellation::new();
    signals::cancel_on_signal(shutdown.clone());

    service::serve(listener, mode, shutdown.signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
