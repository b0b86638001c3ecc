//! npcsim command-line front end.
//!
//! Drives a replayed commit log through the simulator. It provides:
//! 1. **Batch run:** Retire up to `-n` instructions (or until the program ends), optionally
//!    quitting at the limit, and export the counters as JSON.
//! 2. **Monitor:** An interactive prompt (`c`, `si [N]`, `info r`, `info s`, `q`) over the
//!    same simulator.

mod monitor;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use npcsim_core::config::Config;
use npcsim_core::design::ReplayDesign;
use npcsim_core::sim::RunState;
use npcsim_core::{SimError, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "npcsim",
    author,
    version,
    about = "Next-PC prediction accounting for a cycle-level RISC-V design",
    long_about = "Replay a recorded commit log through the clock driver and score the design's \
                  next-PC predictor on every branch, JAL, and JALR.\n\nExamples:\n  \
                  npcsim run --replay pcpred-800k.jsonl --report-interval 50000\n  \
                  npcsim run --replay loop.jsonl -n 1000 --quit-on-limit --stats-json out.json\n  \
                  npcsim monitor --replay loop.jsonl"
)]
struct Cli {
    /// JSON configuration file; absent keys take their defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a commit log in batch mode.
    Run {
        /// Commit log to replay (JSON lines).
        #[arg(short, long)]
        replay: PathBuf,

        /// Maximum instructions to retire; runs until the program ends when omitted.
        #[arg(short = 'n', long)]
        count: Option<u64>,

        /// Stop with the final report once `-n` instructions have retired.
        #[arg(long)]
        quit_on_limit: bool,

        /// Emit a `[PCPRED]` progress line every N retirements (0 disables).
        #[arg(long)]
        report_interval: Option<u64>,

        /// Keep a ring of recent commits and dump it if the run aborts.
        #[arg(long)]
        itrace: bool,

        /// Write the run summary as JSON to this path.
        #[arg(long)]
        stats_json: Option<PathBuf>,
    },

    /// Step a commit log interactively.
    Monitor {
        /// Commit log to replay (JSON lines).
        #[arg(short, long)]
        replay: PathBuf,

        /// Keep a ring of recent commits and dump it if the run aborts.
        #[arg(long)]
        itrace: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("npcsim_core=info,npcsim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            replay,
            count,
            quit_on_limit,
            report_interval,
            itrace,
            stats_json,
        } => load_config(cli.config.as_deref()).and_then(|mut config| {
            config.batch.quit_on_limit |= quit_on_limit;
            if let Some(interval) = report_interval {
                config.batch.report_interval = interval;
            }
            config.trace.itrace |= itrace;
            cmd_run(&replay, config, count, stats_json.as_deref())
        }),
        Commands::Monitor { replay, itrace } => {
            load_config(cli.config.as_deref()).and_then(|mut config| {
                config.trace.itrace |= itrace;
                let mut sim = build(&replay, config)?;
                monitor::run(&mut sim)?;
                Ok(0)
            })
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, SimError> {
    path.map_or_else(|| Ok(Config::default()), Config::from_json_file)
}

/// Loads the commit log and brings the design out of reset.
fn build(replay: &Path, config: Config) -> Result<Simulator<ReplayDesign>, SimError> {
    let design = ReplayDesign::open(replay)?;
    tracing::info!(
        "replaying {} commits from {}",
        design.len(),
        replay.display()
    );
    let mut sim = Simulator::new(design, config);
    sim.init()?;
    Ok(sim)
}

/// Batch mode: one run request, then the exit code derived from the final state.
///
/// Exits 0 on a good trap, a quit, or an exhausted budget; 1 on a bad trap or abort.
fn cmd_run(
    replay: &Path,
    config: Config,
    count: Option<u64>,
    stats_json: Option<&Path>,
) -> Result<i32, SimError> {
    let mut sim = build(replay, config)?;
    let state = sim.run(count.unwrap_or(u64::MAX))?;
    if state == RunState::Stopped {
        sim.statistic()?;
    }

    if let Some(path) = stats_json {
        fs::write(path, sim.summary().to_json()?)?;
        tracing::info!("summary written to {}", path.display());
    }

    Ok(match state {
        RunState::Ended if sim.control().halt_ret() == 0 => 0,
        RunState::Ended | RunState::Aborted => 1,
        RunState::Quit | RunState::Stopped | RunState::Running => 0,
    })
}
