//! health-gate: wait for an HTTP endpoint to become ready.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI flags ─┐
//!   TOML file ─┴─▶ GateConfig ──▶ HealthGate ──probe──▶ Transport ──▶ target
//!                                    │
//!                                    ├─▶ progress lines (stderr)
//!                                    ├─▶ attempt log (JSON lines)
//!                                    └─▶ RunResult ──▶ summary + exit code
//!
//!   SIGINT/SIGTERM ──▶ Cancellation ──▶ gate stops with Cancelled
//! ```
//!
//! # Exit Codes
//! - 0: target became ready
//! - 1: attempt budget exhausted
//! - 2: invalid configuration or target (no attempts made)
//! - 3: non-retryable error during the run
//! - 4: cancelled

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use health_gate::config::loader::read_config;
use health_gate::config::{BackoffStrategy, GateConfig, LogFormat};
use health_gate::health::HealthGate;
use health_gate::lifecycle::{signals, Cancellation};
use health_gate::observability::attempt_log::AttemptLog;
use health_gate::observability::{logging, metrics};
use health_gate::report::{self, ProgressPrinter, EXIT_INVALID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "health-gate", version)]
#[command(about = "Probe an HTTP endpoint until it is ready or the retry budget runs out", long_about = None)]
struct Cli {
    /// Address to probe, e.g. http://127.0.0.1:3000/health or localhost:3000
    target: String,

    /// TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum number of attempts [default: 30]
    #[arg(short = 'n', long)]
    max_attempts: Option<u32>,

    /// Wait between failed attempts, e.g. "2s", "500ms" [default: 2s]
    #[arg(short, long, value_parser = humantime::parse_duration)]
    delay: Option<Duration>,

    /// Per-attempt timeout [default: 5s]
    #[arg(short, long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Path to use when the target has none, e.g. "/health"
    #[arg(long)]
    path: Option<String>,

    /// Status codes that count as ready (default: any 2xx)
    #[arg(long = "accept", value_delimiter = ',')]
    accept: Vec<u16>,

    /// Status codes that abort the gate immediately
    #[arg(long = "fatal", value_delimiter = ',')]
    fatal: Vec<u16>,

    #[arg(long, value_enum)]
    backoff: Option<BackoffStrategy>,

    /// Cap for exponential backoff
    #[arg(long, value_parser = humantime::parse_duration)]
    max_delay: Option<Duration>,

    /// Add up to 10% random jitter to each wait
    #[arg(long)]
    jitter: bool,

    /// Append one JSON line per attempt to this file
    #[arg(long)]
    attempt_log: Option<PathBuf>,

    /// Write a Prometheus text snapshot here when the run ends
    #[arg(long)]
    metrics_textfile: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[arg(long)]
    log_level: Option<String>,

    /// Suppress per-attempt progress lines
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Layer flags over a file or default config.
    fn apply(&self, config: &mut GateConfig) {
        if let Some(n) = self.max_attempts {
            config.max_attempts = n;
        }
        if let Some(delay) = self.delay {
            config.delay_ms = ceil_millis(delay);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = ceil_millis(timeout);
        }
        if let Some(path) = &self.path {
            config.path = Some(path.clone());
        }
        if !self.accept.is_empty() {
            config.accepted_statuses = self.accept.clone();
        }
        if !self.fatal.is_empty() {
            config.fatal_statuses = self.fatal.clone();
        }
        if let Some(strategy) = self.backoff {
            config.backoff.strategy = strategy;
        }
        if let Some(max_delay) = self.max_delay {
            config.backoff.max_delay_ms = ceil_millis(max_delay);
        }
        if self.jitter {
            config.backoff.jitter = true;
        }
        if let Some(path) = &self.attempt_log {
            config.attempt_log = Some(path.clone());
        }
        if let Some(path) = &self.metrics_textfile {
            config.observability.metrics_textfile = Some(path.clone());
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

/// Whole milliseconds, rounded up so a positive duration never becomes zero.
fn ceil_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match read_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{} cannot load {}: {}", report::PREFIX, path.display(), e);
                return ExitCode::from(EXIT_INVALID);
            }
        },
        None => GateConfig::default(),
    };
    cli.apply(&mut config);

    if let Err(e) = logging::init(&config.observability) {
        eprintln!("{} failed to initialize logging: {}", report::PREFIX, e);
    }

    let metrics_handle = match &config.observability.metrics_textfile {
        Some(_) => match metrics::install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Metrics disabled");
                None
            }
        },
        None => None,
    };

    let mut gate = HealthGate::http(config.clone());
    if !cli.quiet {
        gate = gate.observe(Arc::new(ProgressPrinter::stderr()));
    }
    if let Some(path) = &config.attempt_log {
        match AttemptLog::open(path) {
            Ok(log) => gate = gate.observe(Arc::new(log)),
            Err(e) => {
                eprintln!("{} cannot open attempt log {}: {}", report::PREFIX, path.display(), e);
                return ExitCode::from(EXIT_INVALID);
            }
        }
    }

    let cancellation = Cancellation::new();
    signals::cancel_on_signal(cancellation.clone());

    let result = gate.probe(&cli.target, &cancellation.signal()).await;

    match cli.output {
        OutputFormat::Text => eprintln!("{}", report::summary_line(&result)),
        OutputFormat::Json => match report::summary_json(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!(error = %e, "Failed to render run summary"),
        },
    }

    if let (Some(handle), Some(path)) = (&metrics_handle, &config.observability.metrics_textfile) {
        if let Err(e) = metrics::write_textfile(handle, path) {
            tracing::warn!(path = ?path, error = %e, "Failed to write metrics textfile");
        }
    }

    ExitCode::from(report::exit_code(&result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("health-gate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = parse(&["localhost:3000"]);
        let mut config = GateConfig::default();
        cli.apply(&mut config);

        assert_eq!(config, GateConfig::default());
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "http://127.0.0.1:8080",
            "-n", "5",
            "--delay", "500ms",
            "--timeout", "2s",
            "--path", "/ready",
            "--accept", "200,204",
            "--fatal", "404",
            "--backoff", "exponential",
            "--max-delay", "10s",
            "--jitter",
            "--log-format", "json",
            "--output", "json",
        ]);

        let mut config = GateConfig {
            max_attempts: 99,
            ..GateConfig::default()
        };
        cli.apply(&mut config);

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.delay_ms, 500);
        assert_eq!(config.timeout_ms, 2_000);
        assert_eq!(config.path.as_deref(), Some("/ready"));
        assert_eq!(config.accepted_statuses, vec![200, 204]);
        assert_eq!(config.fatal_statuses, vec![404]);
        assert_eq!(config.backoff.strategy, BackoffStrategy::Exponential);
        assert_eq!(config.backoff.max_delay_ms, 10_000);
        assert!(config.backoff.jitter);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_sub_millisecond_durations_round_up() {
        let cli = parse(&["localhost:3000", "--timeout", "500us", "--delay", "1500us"]);
        let mut config = GateConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.timeout_ms, 1);
        assert_eq!(config.delay_ms, 2);
        assert_eq!(ceil_millis(Duration::ZERO), 0);
        assert_eq!(ceil_millis(Duration::from_secs(2)), 2_000);
    }

    #[test]
    fn test_zero_attempts_parses_so_the_gate_can_reject_it() {
        let cli = parse(&["localhost:3000", "--max-attempts", "0"]);
        assert_eq!(cli.max_attempts, Some(0));
    }

    #[test]
    fn test_target_is_required() {
        assert!(Cli::try_parse_from(["health-gate"]).is_err());
    }

    #[test]
    fn test_bad_duration_rejected() {
        assert!(Cli::try_parse_from(["health-gate", "localhost", "--delay", "soon"]).is_err());
    }
}
