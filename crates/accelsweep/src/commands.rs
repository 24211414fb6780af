//! The three driver commands: single run, grid sweep, random sampling.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Args;
use color_eyre::eyre::WrapErr;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use accelsweep_core::dispatch::{Sample, dispatch_with};
use accelsweep_core::grid::{apply_entry_scaling, cartesian_grid, random_samples, shuffle_samples};
use accelsweep_core::params::{ParameterDomain, ParameterSet};
use accelsweep_core::results::{ResultWriter, WriteMode};
use accelsweep_core::runner::{RunRequest, SimulatorHarness, run_simulation};
use accelsweep_core::target::{BaselineMaxima, TargetProfile, target_value};

/// Options shared by every command that invokes the simulator
#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Benchmark to activate in the shared listing
    #[arg(short, long, default_value = "fft_transpose")]
    pub benchmark: String,

    /// Simulator configuration template
    #[arg(short, long)]
    pub template: PathBuf,

    /// Keep each run's output directory instead of deleting it
    #[arg(long)]
    pub keep_outputs: bool,
}

/// Run the simulator once and write the scalar target value to a file.
///
/// This is the interface a Bayesian-optimization collaborator shells out
/// to: parameters in as a JSON object, one number out.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub invoke: InvokeArgs,

    /// Accelerator parameters as a JSON object, e.g. '{"cache_size": 32768}'
    #[arg(long)]
    pub params: String,

    /// Target profile (cycle, power, area, or P1..P5)
    #[arg(long, default_value = "cycle")]
    pub target: String,

    /// File the scalar target value is written to
    #[arg(long, default_value = "sim_result.txt")]
    pub results_file: PathBuf,
}

/// Options shared by the batch commands
#[derive(Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub invoke: InvokeArgs,

    /// Parameter dimensions to sweep, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub params: Vec<String>,

    /// Results table path
    #[arg(long, default_value = "results.csv")]
    pub results: PathBuf,

    /// Append to an existing results table instead of overwriting it
    #[arg(long)]
    pub append: bool,

    /// Worker pool size. The simulator is a singleton resource; anything
    /// above 1 requires per-worker harness isolation.
    #[arg(long, default_value_t = 1)]
    pub workers: usize,

    /// Seed for shuffling/sampling (random when absent)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Exhaustively sweep the Cartesian grid over the selected dimensions
#[derive(Args, Debug)]
pub struct SweepArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Randomly permute the grid before dispatch
    #[arg(long)]
    pub shuffle: bool,
}

/// Randomly sample the selected dimensions
#[derive(Args, Debug)]
pub struct SampleArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Number of samples to draw
    #[arg(long, default_value_t = 100)]
    pub count: usize,

    /// Deduplicate samples (the batch may come out smaller than --count)
    #[arg(long)]
    pub unique: bool,
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    }
}

pub fn run(harness: &SimulatorHarness, args: &RunArgs) -> color_eyre::Result<()> {
    let params: ParameterSet = serde_json::from_str(&args.params)
        .wrap_err("could not parse --params as a JSON object of name: integer pairs")?;
    let profile: TargetProfile = args.target.parse()?;

    let mut request = RunRequest::new(&args.invoke.benchmark, params, args.invoke.template.clone());
    request.remove_output = !args.invoke.keep_outputs;

    // A failed run still reports a value; the collaborator reading the
    // results file expects 0.0 rather than an empty file.
    let text = match run_simulation(harness, &request) {
        Ok(result) => target_value(&result, profile, &BaselineMaxima::default()).to_string(),
        Err(e) => {
            tracing::error!(error = %e, "simulation failed");
            "0.0".to_string()
        }
    };

    fs::write(&args.results_file, &text)
        .wrap_err_with(|| format!("could not write {}", args.results_file.display()))?;
    println!("{text}");
    Ok(())
}

pub fn sweep(harness: &SimulatorHarness, args: &SweepArgs) -> color_eyre::Result<()> {
    let selected = ParameterDomain::builtin().select(&args.batch.params)?;
    let mut samples = cartesian_grid(&selected);

    if args.shuffle {
        let mut rng = make_rng(args.batch.seed);
        shuffle_samples(&mut samples, &mut rng);
    }

    run_batch(harness, &args.batch, samples)
}

pub fn sample(harness: &SimulatorHarness, args: &SampleArgs) -> color_eyre::Result<()> {
    let selected = ParameterDomain::builtin().select(&args.batch.params)?;
    let mut rng = make_rng(args.batch.seed);
    let samples = random_samples(&selected, args.count, args.unique, &mut rng);

    if samples.len() < args.count {
        tracing::info!(
            requested = args.count,
            drawn = samples.len(),
            "deduplication reduced the batch"
        );
    }

    run_batch(harness, &args.batch, samples)
}

fn run_batch(
    harness: &SimulatorHarness,
    args: &BatchArgs,
    mut samples: Vec<ParameterSet>,
) -> color_eyre::Result<()> {
    apply_entry_scaling(&mut samples);

    if args.workers > 1 {
        tracing::warn!(
            workers = args.workers,
            "simulator harness is a singleton; concurrent workers race on the benchmark listing"
        );
    }

    let mode = if args.append {
        WriteMode::Append
    } else {
        WriteMode::Overwrite
    };
    let writer = Mutex::new(
        ResultWriter::open(&args.results, &args.params, mode)
            .wrap_err_with(|| format!("could not open {}", args.results.display()))?,
    );

    let completed = dispatch_with(
        samples,
        args.workers,
        |params| {
            let mut request =
                RunRequest::new(&args.invoke.benchmark, params.clone(), args.invoke.template.clone());
            request.remove_output = !args.invoke.keep_outputs;
            run_simulation(harness, &request)
        },
        |sample: &Sample| {
            if let Err(e) = writer.lock().unwrap().write_sample(sample) {
                tracing::error!(error = %e, "could not persist sample row");
            }
        },
    );

    let failed = completed.iter().filter(|s| !s.success).count();
    tracing::info!(
        total = completed.len(),
        failed,
        results = %args.results.display(),
        "batch complete"
    );
    Ok(())
}
