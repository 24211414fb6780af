//! Accelerator design-space exploration library
//!
//! This crate drives an external cycle-accurate accelerator simulator
//! through repeated, parameterized runs. It covers:
//! - The known accelerator parameter table and value domains
//! - Rendering parameter sets into the simulator's on-disk configuration
//! - Activating one benchmark in the shared listing file
//! - Invoking the external sweep generator and run script
//! - Recovering cycle/power/area metrics from the simulation log
//! - Reducing metrics to a scalar objective under a target profile
//! - Grid and random sample generation with worker-pool dispatch
//! - Incremental persistence of per-sample result rows
//!
//! The simulator itself, and any surrogate-model optimizer steering the
//! search, live outside this crate.

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod benchmark;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod grid;
pub mod io;
pub mod params;
pub mod results;
pub mod runner;
pub mod target;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use dispatch::{Sample, dispatch, dispatch_with};
pub use error::SimulationError;
pub use extract::SimulationResult;
pub use params::{ParamDomain, ParameterDomain, ParameterSet};
pub use runner::{RunRequest, SimulatorHarness, run_simulation};
pub use target::{BaselineMaxima, TargetProfile, target_value};
