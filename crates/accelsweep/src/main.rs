use std::path::PathBuf;

use clap::{Parser, Subcommand};

use accelsweep_core::runner::SimulatorHarness;

mod commands;
mod logging;

use commands::{RunArgs, SampleArgs, SweepArgs};
use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "accelsweep")]
#[command(about = "Drive an external accelerator simulator across parameter searches")]
struct Args {
    /// Simulator checkout root (default: derived from ALADDIN_HOME)
    #[arg(long)]
    sim_root: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one simulation and report the scalar target value
    Run(RunArgs),
    /// Evaluate the full Cartesian grid over selected parameters
    Sweep(SweepArgs),
    /// Evaluate randomly sampled parameter combinations
    Sample(SampleArgs),
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level);

    let harness = match &args.sim_root {
        Some(root) => SimulatorHarness::from_root(root),
        None => SimulatorHarness::from_env()?,
    };

    match &args.command {
        Command::Run(run_args) => commands::run(&harness, run_args),
        Command::Sweep(sweep_args) => commands::sweep(&harness, sweep_args),
        Command::Sample(sample_args) => commands::sample(&harness, sample_args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_sweep_invocation() {
        let args = Args::parse_from([
            "accelsweep",
            "--sim-root",
            "/opt/sim",
            "sweep",
            "--template",
            "template.xe",
            "--params",
            "enable_l2,tlb_miss_latency",
            "--shuffle",
        ]);
        match args.command {
            Command::Sweep(sweep) => {
                assert_eq!(
                    sweep.batch.params,
                    vec!["enable_l2".to_string(), "tlb_miss_latency".to_string()]
                );
                assert_eq!(sweep.batch.workers, 1);
                assert!(sweep.shuffle);
            }
            other => panic!("expected sweep, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_invocation() {
        let args = Args::parse_from([
            "accelsweep",
            "run",
            "--template",
            "template.xe",
            "--params",
            r#"{"cache_size": 32768}"#,
            "--target",
            "P1",
        ]);
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.target, "P1");
                assert_eq!(run.invoke.benchmark, "fft_transpose");
            }
            other => panic!("expected run, got {other:?}"),
        }
    }
}
