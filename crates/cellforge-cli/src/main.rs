use anyhow::{Context, Result};
use cellforge_core::{GameConfig, RunSummary, Session, TickCadence};
use clap::Parser;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Headless driver for the cellforge engine: seed a session, run it for a
/// fixed number of ticks (flat out or paced at the configured period), and
/// emit the JSON run summary.
#[derive(Parser, Debug)]
#[command(name = "cellforge")]
struct Args {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 300)]
    steps: usize,

    /// Keep every Nth tick report in the summary (the last is always kept).
    #[arg(long, default_value_t = 10)]
    sample_every: usize,

    /// Session seed: drives resource-node placement and initial life.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Fraction of cells seeded alive before the first tick.
    #[arg(long, default_value_t = 0.25)]
    fill: f64,

    /// Pace ticks at the configured period instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Write the JSON run summary to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = GameConfig {
        seed: args.seed,
        ..GameConfig::default()
    };
    let mut session = Session::try_new(config).context("invalid game configuration")?;
    session.seed_random_life(args.fill);
    info!(
        rows = session.config().rows,
        columns = session.config().columns,
        seed = args.seed,
        alive = session.alive_count(),
        nodes = session.grid().resource_node_count(),
        "session ready"
    );

    let summary = if args.realtime {
        run_paced(&mut session, args.steps, args.sample_every)?
    } else {
        session.try_run_experiment(args.steps, args.sample_every)?
    };

    info!(
        resources = summary.final_resources,
        avg_per_second = summary.final_avg_per_second,
        alive = summary.final_alive_count,
        births = summary.total_births,
        deaths = summary.total_deaths,
        "run complete"
    );
    write_summary(&summary, args.out.as_deref())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Drive the session at wall-clock cadence. A host that falls behind drops
/// the missed periods (logged) rather than bursting to catch up.
fn run_paced(session: &mut Session, steps: usize, sample_every: usize) -> Result<RunSummary> {
    anyhow::ensure!(sample_every > 0, "sample_every must be positive");

    let mut cadence = TickCadence::new(session.period(), Instant::now());
    let mut samples = Vec::new();
    let mut dropped_seen = 0;
    let births_before = session.total_births();
    let deaths_before = session.total_deaths();

    let mut completed = 0;
    while completed < steps {
        let now = Instant::now();
        if cadence.tick_due(now) {
            let report = session.tick();
            completed += 1;
            if completed % sample_every == 0 || completed == steps {
                info!(
                    tick = report.tick,
                    delta = report.delta,
                    resources = report.resources,
                    avg_per_second = report.avg_per_second,
                    alive = report.alive_count,
                    "tick"
                );
                samples.push(report);
            }
            if cadence.dropped() > dropped_seen {
                warn!(
                    dropped = cadence.dropped() - dropped_seen,
                    "tick periods dropped; host fell behind"
                );
                dropped_seen = cadence.dropped();
            }
        } else {
            thread::sleep(cadence.time_until_due(now));
        }
    }

    Ok(RunSummary {
        schema_version: 1,
        steps,
        sample_every,
        final_resources: session.resources(),
        final_avg_per_second: session.avg_per_second(),
        final_alive_count: session.alive_count(),
        total_births: session.total_births() - births_before,
        total_deaths: session.total_deaths() - deaths_before,
        samples,
    })
}

fn write_summary(summary: &RunSummary, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer_pretty(file, summary).context("writing run summary")?;
            info!(path = %path.display(), "run summary written");
        }
        None => {
            serde_json::to_writer_pretty(io::stdout().lock(), summary)
                .context("writing run summary")?;
            println!();
        }
    }
    Ok(())
}
