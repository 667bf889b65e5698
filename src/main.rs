//! lpdash - Print Queue Dashboard Binary
//!
//! A standalone daemon that renders CUPS print-queue state and host metrics
//! to a PNG file or framebuffer device on a polling interval.

use clap::Parser;
use lpdash::{
    config::Config, metrics::MetricsCollector, render, sink, sink::FrameSink,
};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "lpdash")]
#[command(about = "Print queue dashboard for small embedded displays")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Renders CUPS print-queue state and host metrics \
(IP, CPU load, temperature) to a PNG file or a Linux framebuffer device on a \
polling interval. Configuration comes from the environment: WIDTH, HEIGHT, \
OUTPUT_PATH, DISPLAY_MODE, FBDEV, REFRESH_SEC, PRINTER.")]
struct Cli {
    /// Collect and render a single frame, then exit
    #[arg(long)]
    once: bool,

    /// Print one metrics snapshot as JSON and exit
    #[arg(long)]
    snapshot: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    init_logging(&cli)?;

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let mut collector = MetricsCollector::new();

    if cli.snapshot {
        let snapshot = collector.collect(&config);
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    info!(
        width = config.width,
        height = config.height,
        mode = %config.display_mode,
        refresh_secs = config.refresh.as_secs_f64(),
        printer = config.printer.as_deref().unwrap_or("<any>"),
        "starting lpdash"
    );

    let mut sink = sink::from_config(&config);

    if cli.once {
        let snapshot = collector.collect(&config);
        let frame = render(&snapshot, &config);
        sink.present(&frame)?;
        return Ok(());
    }

    run_loop(&config, &mut collector, sink.as_mut()).await?;

    // Leave the panel blank rather than frozen on the last frame.
    if let Err(err) = sink.clear() {
        warn!("failed to clear display on shutdown: {}", err);
    }

    Ok(())
}

/// The refresh loop: collect, render, present, wait.
///
/// The wait is a `select!` over the interval tick and the termination
/// signals, so SIGINT/SIGTERM interrupt the sleep promptly instead of being
/// served on the next tick. Sink failures are logged and cost only the
/// current iteration.
async fn run_loop(
    config: &Config,
    collector: &mut MetricsCollector,
    sink: &mut dyn FrameSink,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(config.refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("received SIGINT, shutting down");
                break;
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = ticker.tick() => {
                let snapshot = collector.collect(config);
                let frame = render(&snapshot, config);
                if let Err(err) = sink.present(&frame) {
                    error!(error = %err, "failed to deliver frame, retrying next interval");
                }
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["lpdash", "--once", "--verbose"]).unwrap();
        assert!(cli.once);
        assert!(cli.verbose);
        assert!(!cli.snapshot);
    }

    #[test]
    fn test_default_flags() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["lpdash"]).unwrap();
        assert!(!cli.once);
        assert!(!cli.snapshot);
        assert!(!cli.debug);
    }
}
