//! Distributing samples across a worker pool.
//!
//! Each worker drives one full simulator invocation per sample. Results
//! come back in submission order, not completion order, and a failure
//! inside one sample never aborts the batch: the sample is downgraded to
//! `success = false` with its error preserved.
//!
//! The simulator is a singleton resource (shared benchmark listing,
//! single-instance sweep generator), so the worker count must stay at 1
//! unless every worker gets an isolated harness; raising it against one
//! shared harness reintroduces races on the listing file.

use serde::Serialize;

use crate::error::SimulationError;
use crate::extract::SimulationResult;
use crate::params::ParameterSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One parameter set paired with its (possibly failed) simulation outcome.
/// Never mutated after completion.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    pub params: ParameterSet,
    pub result: Option<SimulationResult>,
    pub success: bool,
    /// Why the run failed, when it did. Lets callers tell a simulator
    /// failure from an infrastructure fault instead of conflating both
    /// into the boolean.
    pub error: Option<String>,
}

impl Sample {
    fn from_outcome(params: ParameterSet, outcome: Result<SimulationResult, SimulationError>) -> Self {
        match outcome {
            Ok(result) => Sample {
                params,
                result: Some(result),
                success: true,
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "sample failed");
                Sample {
                    params,
                    result: None,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Process every sample through `processor` on a pool of `workers`
/// parallel workers, yielding completed samples in submission order.
pub fn dispatch<F>(samples: Vec<ParameterSet>, workers: usize, processor: F) -> Vec<Sample>
where
    F: Fn(&ParameterSet) -> Result<SimulationResult, SimulationError> + Sync,
{
    dispatch_with(samples, workers, processor, |_| {})
}

/// Like [`dispatch`], but invokes `on_complete` as each sample finishes,
/// so callers can persist rows incrementally instead of waiting for the
/// whole batch. With more than one worker the callback order follows
/// completion, not submission; the returned vector is always in
/// submission order.
pub fn dispatch_with<F, C>(
    samples: Vec<ParameterSet>,
    workers: usize,
    processor: F,
    on_complete: C,
) -> Vec<Sample>
where
    F: Fn(&ParameterSet) -> Result<SimulationResult, SimulationError> + Sync,
    C: Fn(&Sample) + Sync,
{
    let total = samples.len();
    tracing::info!(total, workers, "dispatching samples");

    let process_one = |params: ParameterSet| {
        let outcome = processor(&params);
        let sample = Sample::from_outcome(params, outcome);
        on_complete(&sample);
        sample
    };

    #[cfg(feature = "parallel")]
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build();
        match pool {
            Ok(pool) => {
                return pool.install(|| samples.into_par_iter().map(process_one).collect());
            }
            Err(e) => {
                tracing::warn!(error = %e, "worker pool unavailable, falling back to sequential");
            }
        }
    }

    samples.into_iter().map(process_one).collect()
}
