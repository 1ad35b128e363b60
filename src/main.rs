use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use paper_pit::config::{Config, Overrides};
use paper_pit::report;
use paper_pit::session::Session;
use paper_pit::ui::TerminalConsole;

#[derive(Debug, Parser)]
#[command(
    name = "paper-pit",
    about = "Interactive paper-trading market simulator",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Upper bound of the configured value band.
    #[arg(long)]
    n_max: Option<i64>,

    /// Lower bound of the configured value band.
    #[arg(long)]
    n_min: Option<i64>,

    /// Bars visible across the chart.
    #[arg(long)]
    n_ticks: Option<usize>,

    /// Seconds between committed chart ticks.
    #[arg(long)]
    t_update: Option<f64>,

    /// Chart frame height in pixels.
    #[arg(long)]
    image_height: Option<usize>,

    /// Chart frame width in pixels.
    #[arg(long)]
    image_width: Option<usize>,

    /// Seed for a reproducible price walk.
    #[arg(long)]
    seed: Option<u64>,

    /// Hide the fair value line.
    #[arg(long)]
    hide_fair_line: bool,

    /// Where to write the closed-trade report.
    #[arg(long)]
    trades_out: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            n_max: self.n_max,
            n_min: self.n_min,
            seed: self.seed,
            n_ticks: self.n_ticks,
            image_height: self.image_height,
            image_width: self.image_width,
            t_update: self.t_update,
            hide_fair_line: self.hide_fair_line,
            trades_out: self.trades_out.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };
    config.apply_overrides(&cli.overrides());

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create("paper-pit.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        n_max = config.market.n_max,
        n_min = config.market.n_min,
        n_ticks = config.chart.n_ticks,
        t_update = config.ui.t_update,
        "starting paper-pit"
    );

    // Config validation happens here, before the terminal is taken over.
    let mut session = Session::new(&config)?;

    let mut console = TerminalConsole::new();
    let run_result = session.run(&mut console);

    let flush_result = report::write_trades(&config.report.trades_out, session.trades())
        .with_context(|| format!("failed to write {}", config.report.trades_out.display()));
    if let Err(e) = &flush_result {
        tracing::warn!(error = %e, "trade report not written during shutdown");
    }

    console.shutdown();
    tracing::info!("shutdown complete");

    if flush_result.is_ok() && !session.trades().is_empty() {
        println!(
            "Saved {} trade(s) to {}",
            session.trades().len(),
            config.report.trades_out.display()
        );
    }
    println!("Goodbye! Check paper-pit.log for details.");

    run_result.and(flush_result)
}
