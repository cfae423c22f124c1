//! headless — runs the warehouse simulator without a UI.
//!
//! ```text
//! headless [--stress] [--config FILE.json] [--catalog FILE.csv] [--out DIR]
//!          [--seed N] [--ticks N] [--workers N] [--pickers N]
//! ```
//!
//! Normal mode runs `sim.total_ticks` ticks and writes `zone_kpis.csv` and
//! `cell_snapshots.csv`.  Stress mode walks the stress phases until every
//! zone fails or the phases run out, and also writes `stress_rounds.json`.
//!
//! Logging is controlled by `RUST_LOG` (default `info`).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wh_catalog::{Catalog, load_catalog_csv};
use wh_core::Zone;
use wh_output::{CsvWriter, OutputWriter, SimOutputObserver};
use wh_sim::{Sim, SimBuilder, WarehouseConfig};
use wh_stress::{StressConfig, StressEvent, StressRunner};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_OUT:        &str = "output/headless";
/// Stress runs tick every 2 ms of simulated time; keep one KPI row per second.
const STRESS_KPI_EVERY:   u64  = 500;

// ── Command line ──────────────────────────────────────────────────────────────

/// Headless runner for the three storage strategies.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run the stress phases instead of a fixed-length simulation
    #[arg(long, default_value_t = false)]
    stress: bool,

    /// JSON file with `warehouse` and `stress` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Item catalog CSV (defaults to the built-in catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = DEFAULT_OUT)]
    out: PathBuf,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to run in normal mode (overrides the config file)
    #[arg(long)]
    ticks: Option<u64>,

    /// Workers per zone (overrides the config file)
    #[arg(long)]
    workers: Option<usize>,

    /// Pickers per zone (overrides the config file)
    #[arg(long)]
    pickers: Option<usize>,
}

impl Args {
    /// Fold command-line overrides into the loaded configuration.
    fn apply(&self, config: &mut WarehouseConfig) {
        if let Some(seed) = self.seed {
            config.sim.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            config.sim.total_ticks = ticks;
        }
        if let Some(workers) = self.workers {
            config.staffing.workers = [workers; 3];
        }
        if let Some(pickers) = self.pickers {
            config.staffing.pickers = [pickers; 3];
        }
    }
}

/// Shape of the optional JSON config file.  Every section may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    warehouse: WarehouseConfig,
    stress:    StressConfig,
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else { return Ok(DemoConfig::default()) };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_kpis(sim: &Sim) {
    let kpis = sim.kpis();
    println!(
        "{:<8} {:>6} {:>8} {:>7} {:>7} {:>8} {:>7} {:>9} {:>9}",
        "Zone", "Load", "Bins", "Puts", "Picks", "Overflow", "Shadow", "Repairs", "Avg pick"
    );
    println!("{}", "-".repeat(80));
    for zone in Zone::ALL {
        let z = kpis.zone(zone);
        println!(
            "{:<8} {:>5.1}% {:>4}/{:<3} {:>7} {:>7} {:>8} {:>7} {:>9} {:>9}",
            zone.as_str(),
            z.load * 100.0,
            z.bins,
            z.capacity,
            z.puts,
            z.picks,
            z.overflow,
            z.shadow_stock,
            z.repairs,
            z.avg_pick_ticks.map_or_else(|| "-".to_owned(), |t| format!("{t:.1}")),
        );
    }
}

fn finish_output<W: OutputWriter>(obs: &mut SimOutputObserver<W>) {
    if let Some(e) = obs.take_error() {
        warn!(error = %e, "output error");
    }
}

// ── Modes ─────────────────────────────────────────────────────────────────────

fn run_normal(sim: &mut Sim, out: &Path) -> Result<()> {
    let ticks = sim.config.sim.total_ticks;
    info!(ticks, out = %out.display(), "running");

    let mut obs = SimOutputObserver::new(CsvWriter::new(out)?);
    let t0 = Instant::now();
    sim.run(&mut obs);
    let elapsed = t0.elapsed();
    finish_output(&mut obs);

    println!("Simulation complete: {ticks} ticks in {:.3} s", elapsed.as_secs_f64());
    println!("  zone_kpis.csv : {} rows", obs.rows_written());
    println!();
    print_kpis(sim);
    sim.check_invariants()?;
    Ok(())
}

fn run_stress(sim: &mut Sim, config: StressConfig, out: &Path) -> Result<()> {
    let mut runner = StressRunner::new(config)?;
    let mut obs = SimOutputObserver::new(CsvWriter::new(out)?).with_kpi_every(STRESS_KPI_EVERY);

    let t0 = Instant::now();
    let summary = runner.run(sim, &mut obs)?;
    let elapsed = t0.elapsed();
    finish_output(&mut obs);

    println!("Stress run complete: {} ticks in {:.3} s", summary.ticks, elapsed.as_secs_f64());
    for event in &summary.events {
        match event {
            StressEvent::RoundStarted { phase, workers, pickers, .. } => {
                println!();
                println!("== {phase}: {workers} workers, {pickers} pickers per zone ==");
            }
            StressEvent::ZoneFailed(report) => println!("  overloaded  {report}"),
            StressEvent::RoundEnded(round) => {
                for z in round.zones.iter().filter(|z| z.outcome == wh_stress::ZoneOutcome::Completed) {
                    println!("  survived    {z}");
                }
            }
            StressEvent::Finished { rounds, all_failed } => {
                println!();
                println!(
                    "{rounds} round(s){}",
                    if *all_failed { ", stopped early: every zone failed" } else { "" }
                );
            }
        }
    }

    let path = out.join("stress_rounds.json");
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &summary.rounds)?;
    println!("  {} written", path.display());
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    args.apply(&mut config.warehouse);
    let catalog = match &args.catalog {
        Some(path) => load_catalog_csv(path).with_context(|| format!("loading {}", path.display()))?,
        None => Catalog::standard(),
    };
    let out = args.out.as_path();

    println!("=== headless — warehouse storage strategies ===");
    println!(
        "Seed: {}  |  Items: {}  |  Mode: {}",
        config.warehouse.sim.seed,
        catalog.len(),
        if args.stress { "stress" } else { "normal" }
    );
    println!();

    let mut sim = SimBuilder::new(config.warehouse).catalog(catalog).build()?;
    if args.stress {
        run_stress(&mut sim, config.stress, out)
    } else {
        run_normal(&mut sim, out)
    }
}
