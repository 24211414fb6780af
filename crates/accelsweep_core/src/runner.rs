//! One end-to-end simulator invocation.
//!
//! The runner walks a fixed sequence, terminal on the first failure:
//! prepare (output dir, benchmark selection, config emission), generate
//! (external sweep expansion), execute (external run script), collect
//! (log extraction), cleanup.
//!
//! The original driver switched the process-wide working directory around
//! each external call and never checked exit statuses. Neither survives
//! here: child working directories are set per-invocation via
//! `Command::current_dir`, and a nonzero exit is a `ProcessError` instead
//! of falling through to a missing log.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use uuid::Uuid;

use crate::benchmark::select_benchmark;
use crate::config::emit_config;
use crate::error::{ProcessError, SimulationError};
use crate::extract::{SimulationResult, extract_results};
use crate::params::{ParameterDomain, ParameterSet};

const SWEEPS_DIR_NAME: &str = "sweeps";
const BENCH_DIR_NAME: &str = "benchmarks";
const GENERATOR_SCRIPT: &str = "generate_design_sweeps.py";
const LISTING_FILE: &str = "benchmarks.py";
const RUN_SUBDIR: &str = "0";
const LOG_REL_PATH: &str = "outputs/stdout";

/// Filesystem layout and invocation shape of the external simulator tools.
///
/// The underlying simulator is a singleton resource: the benchmark listing
/// is shared mutable state and the sweep generator assumes a single
/// instance. One harness must never serve concurrent runs; give each
/// parallel worker its own root (or at least its own listing copy).
#[derive(Debug, Clone)]
pub struct SimulatorHarness {
    /// Directory the sweep generator runs in
    pub sweeps_dir: PathBuf,
    /// Where temporary configs land; the generator resolves configs
    /// relative to `sweeps_dir`
    pub benchmarks_dir: PathBuf,
    /// Shared benchmark listing mutated by selection
    pub listing_path: PathBuf,
    /// Interpreter for the sweep generator (`python2` for gem5-aladdin)
    pub generator_program: String,
    pub generator_script: PathBuf,
    /// Interpreter for the per-benchmark run script
    pub run_program: String,
    pub run_script: String,
    /// Subdirectory of the generated benchmark dir holding the run
    pub run_subdir: String,
    /// Log location relative to the run directory
    pub log_rel_path: PathBuf,
}

impl SimulatorHarness {
    /// Harness rooted at a simulator checkout
    pub fn from_root(root: &Path) -> SimulatorHarness {
        let sweeps_dir = root.join(SWEEPS_DIR_NAME);
        let benchmarks_dir = sweeps_dir.join(BENCH_DIR_NAME);
        SimulatorHarness {
            listing_path: benchmarks_dir.join(LISTING_FILE),
            generator_program: "python2".to_string(),
            generator_script: sweeps_dir.join(GENERATOR_SCRIPT),
            run_program: "sh".to_string(),
            run_script: "run.sh".to_string(),
            run_subdir: RUN_SUBDIR.to_string(),
            log_rel_path: PathBuf::from(LOG_REL_PATH),
            sweeps_dir,
            benchmarks_dir,
        }
    }

    /// Harness located via `ALADDIN_HOME` (two levels below the checkout
    /// root, as the accelerator toolchain lays itself out)
    pub fn from_env() -> Result<SimulatorHarness, SimulationError> {
        let home =
            env::var("ALADDIN_HOME").map_err(|_| SimulationError::MissingEnv { var: "ALADDIN_HOME" })?;
        let root = PathBuf::from(home).join("..").join("..");
        let root = fs::canonicalize(&root).unwrap_or(root);
        Ok(SimulatorHarness::from_root(&root))
    }
}

/// Everything one simulation run needs beyond the harness
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub benchmark: String,
    pub params: ParameterSet,
    pub template_path: PathBuf,
    /// Output directory for the generated run; a unique directory under
    /// `sweeps_dir` when absent
    pub output_dir: Option<PathBuf>,
    /// Recursively delete the output directory after a successful collect
    pub remove_output: bool,
}

impl RunRequest {
    pub fn new(benchmark: impl Into<String>, params: ParameterSet, template_path: PathBuf) -> Self {
        RunRequest {
            benchmark: benchmark.into(),
            params,
            template_path,
            output_dir: None,
            remove_output: false,
        }
    }
}

/// Removes the temporary config on drop, covering every failure path
struct TempConfig(PathBuf);

impl Drop for TempConfig {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.0)
            && self.0.exists()
        {
            tracing::warn!(path = %self.0.display(), error = %e, "failed to remove temp config");
        }
    }
}

fn run_tool(mut cmd: Command, tool: &str) -> Result<(), ProcessError> {
    tracing::debug!(tool, command = ?cmd, "invoking external tool");
    // No timeout anywhere in the pipeline; a hung tool blocks the worker.
    let status = cmd.status().map_err(|source| ProcessError::Spawn {
        tool: tool.to_string(),
        source,
    })?;
    if !status.success() {
        return Err(ProcessError::NonZeroExit {
            tool: tool.to_string(),
            code: status.code(),
        });
    }
    Ok(())
}

/// Drive one simulation: select the benchmark, emit the config, expand the
/// sweep, run it, and extract the metrics.
///
/// On failure the temporary config is still removed, but the output
/// directory is retained for debugging; it is deleted only after a
/// successful run, and only when the request asks for it.
pub fn run_simulation(
    harness: &SimulatorHarness,
    request: &RunRequest,
) -> Result<SimulationResult, SimulationError> {
    let run_id = Uuid::new_v4().to_string();
    let output_dir = request
        .output_dir
        .clone()
        .unwrap_or_else(|| harness.sweeps_dir.join(format!("sim_{}", &run_id[..12])));

    tracing::info!(
        benchmark = %request.benchmark,
        output_dir = %output_dir.display(),
        "starting simulation run"
    );

    // PREPARE
    fs::create_dir_all(&output_dir).map_err(|source| SimulationError::Io {
        path: output_dir.clone(),
        source,
    })?;
    select_benchmark(&harness.listing_path, &request.benchmark)?;

    let config_name = format!("t_{run_id}");
    let config_path = harness.benchmarks_dir.join(&config_name);
    emit_config(
        &request.params,
        ParameterDomain::builtin(),
        &output_dir,
        &request.template_path,
        &config_path,
    )?;
    // The generator resolves the config relative to its working directory;
    // when benchmarks_dir lives outside sweeps_dir, hand it the absolute path.
    let generator_config = match harness.benchmarks_dir.strip_prefix(&harness.sweeps_dir) {
        Ok(rel) => rel.join(&config_name),
        Err(_) => config_path.clone(),
    };
    let _temp_config = TempConfig(config_path);

    // GENERATE: the generator runs with sweeps_dir as its working
    // directory (its own, not ours).
    let mut generate = Command::new(&harness.generator_program);
    generate
        .arg(&harness.generator_script)
        .arg(generator_config)
        .current_dir(&harness.sweeps_dir);
    run_tool(generate, "sweep generator")?;

    // EXECUTE
    let run_dir = output_dir.join(&request.benchmark).join(&harness.run_subdir);
    if !run_dir.is_dir() {
        return Err(ProcessError::RunDirMissing { path: run_dir }.into());
    }
    let mut execute = Command::new(&harness.run_program);
    execute.arg(&harness.run_script).current_dir(&run_dir);
    run_tool(execute, "run script")?;

    // COLLECT
    let result = extract_results(&run_dir.join(&harness.log_rel_path))?;
    tracing::info!(
        cycle = result.cycle,
        power = result.power,
        area = result.area,
        "simulation run complete"
    );

    // CLEANUP
    if request.remove_output && let Err(e) = fs::remove_dir_all(&output_dir) {
        tracing::warn!(
            path = %output_dir.display(),
            error = %e,
            "failed to remove output directory"
        );
    }

    Ok(result)
}
