//! Sample generation over selected parameter dimensions.
//!
//! Two modes: exhaustive Cartesian enumeration (optionally shuffled) and
//! fixed-count random sampling with optional post-hoc deduplication.

use rand::Rng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;

use crate::params::{ParamDomain, ParameterSet};

/// Grid sizes above this are almost certainly a mistake
pub const GRID_WARN_THRESHOLD: usize = 100_000;

const ENTRIES_PARAM: &str = "tlb_entries";
const ASSOC_PARAM: &str = "tlb_assoc";

fn materialize(selected: &[(String, ParamDomain)], row: &[i64]) -> ParameterSet {
    selected
        .iter()
        .zip(row.iter())
        .map(|((name, _), value)| (name.clone(), *value))
        .collect()
}

/// Enumerate the full Cartesian product across the selected dimensions.
///
/// The result size is the product of the domain sizes; combinatorial
/// blow-up is the caller's to manage, but anything past
/// [`GRID_WARN_THRESHOLD`] is logged loudly.
pub fn cartesian_grid(selected: &[(String, ParamDomain)]) -> Vec<ParameterSet> {
    if selected.is_empty() {
        return Vec::new();
    }

    let axes: Vec<Vec<i64>> = selected.iter().map(|(_, d)| d.values()).collect();
    if axes.iter().any(|axis| axis.is_empty()) {
        return Vec::new();
    }

    let total: usize = axes.iter().map(|axis| axis.len()).product();
    if total > GRID_WARN_THRESHOLD {
        tracing::warn!(
            total,
            dimensions = selected.len(),
            "Cartesian grid is very large; consider random sampling"
        );
    }

    let mut grid = Vec::with_capacity(total);
    let mut indices = vec![0usize; axes.len()];

    loop {
        let row: Vec<i64> = indices
            .iter()
            .zip(axes.iter())
            .map(|(&idx, axis)| axis[idx])
            .collect();
        grid.push(materialize(selected, &row));

        // Increment indices (counting with mixed radix)
        let mut carry = true;
        for (index, axis) in indices.iter_mut().zip(axes.iter()) {
            if carry {
                *index += 1;
                if *index >= axis.len() {
                    *index = 0;
                } else {
                    carry = false;
                }
            }
        }
        if carry {
            break;
        }
    }

    grid
}

/// Randomly permute a generated grid in place
pub fn shuffle_samples<R: Rng + ?Sized>(samples: &mut [ParameterSet], rng: &mut R) {
    samples.shuffle(rng);
}

/// Draw `count` samples with independent per-dimension draws.
///
/// With `unique` set, duplicates are removed after sampling, so the
/// returned count may be smaller than requested.
pub fn random_samples<R: Rng + ?Sized>(
    selected: &[(String, ParamDomain)],
    count: usize,
    unique: bool,
    rng: &mut R,
) -> Vec<ParameterSet> {
    if selected.is_empty() || selected.iter().any(|(_, d)| d.is_empty()) {
        return Vec::new();
    }

    let mut seen = FxHashSet::default();
    let mut samples = Vec::with_capacity(count);

    for _ in 0..count {
        let row: Vec<i64> = selected.iter().map(|(_, d)| d.sample(rng)).collect();
        if unique && !seen.insert(row.clone()) {
            continue;
        }
        samples.push(materialize(selected, &row));
    }

    samples
}

/// Apply the entries/associativity derivation to sampled sets.
///
/// When a set carries both `tlb_entries` and `tlb_assoc`, the sampled
/// entries value is a multiplier and the effective value is
/// `entries * assoc`. Runs after sampling, before dispatch.
pub fn apply_entry_scaling(samples: &mut [ParameterSet]) {
    for sample in samples.iter_mut() {
        if let Some(&assoc) = sample.get(ASSOC_PARAM)
            && let Some(entries) = sample.get_mut(ENTRIES_PARAM)
        {
            *entries *= assoc;
        }
    }
}
