//! Accelerator parameter names and their legal value domains.
//!
//! The table is the single source of truth for which configuration knobs
//! the simulated accelerator exposes. It is not freely extensible: adding
//! a knob means adding a row here.

use std::sync::OnceLock;

use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::UnknownParameter;

/// One concrete parameter assignment set, keyed by parameter name.
///
/// All accelerator knobs take integral values (sizes, latencies, boolean
/// flags as 0/1).
pub type ParameterSet = FxHashMap<String, i64>;

/// Legal values for a single parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamDomain {
    /// Half-open integer range `lo..hi`
    Range { lo: i64, hi: i64 },
    /// Explicit enumeration
    Choices(Vec<i64>),
}

impl ParamDomain {
    pub fn len(&self) -> usize {
        match self {
            ParamDomain::Range { lo, hi } => (hi - lo).max(0) as usize,
            ParamDomain::Choices(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, value: i64) -> bool {
        match self {
            ParamDomain::Range { lo, hi } => (*lo..*hi).contains(&value),
            ParamDomain::Choices(values) => values.contains(&value),
        }
    }

    /// All legal values, in domain order
    pub fn values(&self) -> Vec<i64> {
        match self {
            ParamDomain::Range { lo, hi } => (*lo..*hi).collect(),
            ParamDomain::Choices(values) => values.clone(),
        }
    }

    /// Draw one legal value uniformly at random
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match self {
            ParamDomain::Range { lo, hi } => rng.random_range(*lo..*hi),
            ParamDomain::Choices(values) => values[rng.random_range(0..values.len())],
        }
    }
}

/// Read-only table of known parameter names and their domains
#[derive(Debug, Clone)]
pub struct ParameterDomain {
    table: FxHashMap<&'static str, ParamDomain>,
}

impl ParameterDomain {
    /// The built-in accelerator parameter table (shared, immutable)
    pub fn builtin() -> &'static ParameterDomain {
        static TABLE: OnceLock<ParameterDomain> = OnceLock::new();
        TABLE.get_or_init(ParameterDomain::new_builtin)
    }

    fn new_builtin() -> ParameterDomain {
        use ParamDomain::{Choices, Range};

        let mut table = FxHashMap::default();
        // Core
        table.insert("cycle_time", Range { lo: 1, hi: 6 });
        table.insert("pipelining", Choices(vec![0, 1]));
        table.insert("enable_l2", Choices(vec![0, 1]));
        // TLB
        table.insert("tlb_entries", Range { lo: 0, hi: 17 });
        table.insert("tlb_hit_latency", Range { lo: 1, hi: 5 });
        table.insert("tlb_miss_latency", Range { lo: 10, hi: 21 });
        table.insert("tlb_page_size", Choices(vec![4096, 8192]));
        table.insert("tlb_assoc", Choices(vec![4, 8, 16]));
        table.insert("tlb_bandwidth", Choices(vec![1, 2]));
        table.insert("tlb_max_outstanding_walks", Choices(vec![4, 8]));
        // Cache
        table.insert("cache_size", Choices(vec![16384, 32768, 65536, 131072]));
        table.insert("cache_assoc", Choices(vec![1, 2, 4, 8, 16]));
        table.insert("cache_hit_latency", Range { lo: 1, hi: 5 });
        table.insert("cache_line_sz", Choices(vec![16, 32, 64]));
        table.insert("cache_queue_size", Choices(vec![32, 64, 128]));
        table.insert("cache_bandwidth", Range { lo: 4, hi: 17 });
        // DMA
        table.insert("pipelined_dma", Choices(vec![0, 1]));

        ParameterDomain { table }
    }

    pub fn get(&self, name: &str) -> Option<&ParamDomain> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Resolve a list of dimension names against the table, preserving the
    /// caller's order. Fails on the first name without a domain row.
    pub fn select(&self, names: &[String]) -> Result<Vec<(String, ParamDomain)>, UnknownParameter> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .cloned()
                    .map(|domain| (name.clone(), domain))
                    .ok_or_else(|| UnknownParameter(name.clone()))
            })
            .collect()
    }
}
