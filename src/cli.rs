//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_source::CsvReplaySource;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::gbm_source::GbmPriceSource;
use crate::adapters::tape_writer::TapeWriter;
use crate::domain::clock::SimClock;
use crate::domain::config::{load_simulation_config, SimulationConfig};
use crate::domain::error::SimtraderError;
use crate::domain::event::Timestamp;
use crate::domain::gbm::GbmParameters;
use crate::domain::sequencer::EventSequencer;
use crate::ports::event_source::EventSource;

#[derive(Parser, Debug)]
#[command(name = "simtrader", about = "Discrete-event trading back-test driver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation and write the merged event tape
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        /// Tape output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the configured RNG seed
        #[arg(long)]
        seed: Option<u64>,
        /// Validate and describe the run without executing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a simulation configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Simulate {
            config,
            output,
            seed,
            dry_run,
        } => run_simulate(&config, output.as_deref(), seed, dry_run),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn load(config_path: &Path) -> Result<SimulationConfig, SimtraderError> {
    let adapter = FileConfigAdapter::from_file(config_path)?;
    load_simulation_config(&adapter)
}

fn run_validate(config_path: &Path) -> Result<(), SimtraderError> {
    let sim = load(config_path)?;
    eprintln!(
        "config ok: {} code(s), {} steps from {}, dt {}s",
        sim.codes.len(),
        sim.steps,
        sim.start,
        sim.dt_secs
    );
    Ok(())
}

fn build_sources(
    sim: &SimulationConfig,
    seed_override: Option<u64>,
) -> Result<Vec<Box<dyn EventSource>>, SimtraderError> {
    if let Some(dir) = &sim.data_dir {
        let mut sources: Vec<Box<dyn EventSource>> = Vec::new();
        for code in &sim.codes {
            let path = Path::new(dir).join(format!("{code}.csv"));
            sources.push(Box::new(CsvReplaySource::from_path(&path)?));
        }
        return Ok(sources);
    }

    let seed = seed_override.unwrap_or(sim.seed);
    let mut sources: Vec<Box<dyn EventSource>> = Vec::new();
    for (offset, gbm) in sim.sources.iter().enumerate() {
        let params = GbmParameters::new(gbm.mu, gbm.sigma)?;
        sources.push(Box::new(GbmPriceSource::new(
            &gbm.code,
            params,
            gbm.initial_price,
            sim.start,
            sim.dt_secs,
            sim.steps,
            // Each code gets an independent stream.
            seed.wrapping_add(offset as u64),
        )));
    }
    Ok(sources)
}

fn run_simulate(
    config_path: &Path,
    output: Option<&Path>,
    seed: Option<u64>,
    dry_run: bool,
) -> Result<(), SimtraderError> {
    eprintln!("Loading config from {}", config_path.display());
    let sim = load(config_path)?;

    if dry_run {
        let mode = if sim.data_dir.is_some() {
            "csv replay"
        } else {
            "gbm"
        };
        eprintln!(
            "dry run: {} {mode} source(s), {} steps from {}, dt {}s",
            sim.codes.len(),
            sim.steps,
            sim.start,
            sim.dt_secs
        );
        return Ok(());
    }

    let sources = build_sources(&sim, seed)?;
    let (dispatched, final_time) = match output {
        Some(path) => drive(&sim, sources, File::create(path)?)?,
        None => drive(&sim, sources, std::io::stdout())?,
    };
    eprintln!("dispatched {dispatched} event(s), clock at {final_time}");
    Ok(())
}

fn drive<W: Write>(
    sim: &SimulationConfig,
    sources: Vec<Box<dyn EventSource>>,
    out: W,
) -> Result<(u64, Timestamp), SimtraderError> {
    let clock = SimClock::new(sim.start);
    let mut sequencer = EventSequencer::new(clock, sources, TapeWriter::new(out))?;
    sequencer.run()?;

    let final_time = sequencer.clock().now();
    let tape = sequencer.into_processor();
    let dispatched = tape.dispatched();
    tape.finish()?;
    Ok((dispatched, final_time))
}
