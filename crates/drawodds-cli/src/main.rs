use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use drawodds_cli::config::{Mode, ScenarioConfig};
use drawodds_cli::logging::init_logging;
use drawodds_cli::report::Report;
use drawodds_cli::runner::{Calculation, Request};

/// Exact draw probabilities for decks with overlapping card categories.
#[derive(Debug, Parser)]
#[command(
    name = "drawodds",
    author,
    version,
    about = "Exact opening-hand probability calculator"
)]
struct Cli {
    /// Path to the YAML scenario file.
    #[arg(short, long, value_name = "FILE", default_value = "scenario.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of cards drawn.
    #[arg(long, value_name = "CARDS")]
    hand_size: Option<u32>,

    /// Evaluate the category list (range) or the combo list (combos).
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Cancel the calculation after this many milliseconds (0 disables).
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Print the report as JSON instead of a result line.
    #[arg(long)]
    json: bool,

    /// Exit after validating the scenario (nothing is calculated).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ScenarioConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(hand_size) = cli.hand_size {
        config.hand_size = hand_size;
    }

    if let Some(mode) = cli.mode {
        config.mode = Some(mode);
    }

    if let Some(timeout_ms) = cli.timeout_ms {
        config.limits.timeout_ms = timeout_ms;
    }

    config.validate()?;

    let outputs = config.resolved_outputs();
    let mode = config.mode();
    let logging_guard = init_logging(&config.logging, &outputs.log_dir, &config.run_id)?;

    tracing::info!(
        target: "drawodds_cli",
        run_id = %config.run_id,
        mode = mode.as_str(),
        deck_entries = config.deck.len(),
        hand_size = config.hand_size,
        "scenario loaded"
    );

    if cli.validate_only {
        println!("Scenario '{}' is valid ({} mode).", config.run_id, mode.as_str());
        return Ok(());
    }

    let request = match mode {
        Mode::Range => Request::Range {
            deck: config.items(),
            bounds: config.bounds(),
            hand_size: config.hand_size,
        },
        Mode::Combos => Request::Combos {
            deck: config.items(),
            combos: config.combo_list(),
            hand_size: config.hand_size,
        },
    };

    let timeout = match config.limits.timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };
    let started = Instant::now();
    let calculation = Calculation::spawn(request)?;
    let outcome = calculation.wait_for(timeout)?;
    let report = Report::new(&config, mode, outcome, started.elapsed().as_millis() as u64);

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.result_text());
    }

    if let Some(path) = outputs.report_json.as_ref() {
        report.write_json(path)?;
        if !cli.json {
            println!("Report: {}", path.display());
        }
    }

    if let Some(path) = logging_guard.log_path.as_ref().filter(|_| !cli.json) {
        println!("Structured log: {}", path.display());
    }

    Ok(())
}
