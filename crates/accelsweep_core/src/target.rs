//! Target profiles: reducing the three metrics to one scalar objective.
//!
//! Raw profiles return a single metric verbatim. Composite profiles
//! normalize each metric against an empirical maximum calibrated offline
//! for the benchmark, then combine the normalized ratios with a weight
//! pair summing to 1.0.

use std::fmt;
use std::str::FromStr;

use crate::error::InvalidProfile;
use crate::extract::SimulationResult;

/// A named weighting scheme for the scalar objective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetProfile {
    Cycle,
    Power,
    Area,
    P1,
    P2,
    P3,
    P4,
    P5,
}

impl TargetProfile {
    /// `(c1, c2)` weights for composite profiles; `None` for raw metrics
    fn weights(self) -> Option<(f64, f64)> {
        match self {
            TargetProfile::P1 => Some((0.50, 0.50)),
            TargetProfile::P2 => Some((0.25, 0.75)),
            TargetProfile::P3 => Some((0.75, 0.25)),
            TargetProfile::P4 => Some((0.99, 0.01)),
            TargetProfile::P5 => Some((0.01, 0.99)),
            _ => None,
        }
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetProfile::Cycle => "cycle",
            TargetProfile::Power => "power",
            TargetProfile::Area => "area",
            TargetProfile::P1 => "P1",
            TargetProfile::P2 => "P2",
            TargetProfile::P3 => "P3",
            TargetProfile::P4 => "P4",
            TargetProfile::P5 => "P5",
        };
        write!(f, "{name}")
    }
}

impl FromStr for TargetProfile {
    type Err = InvalidProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cycle" => Ok(TargetProfile::Cycle),
            "power" => Ok(TargetProfile::Power),
            "area" => Ok(TargetProfile::Area),
            "P1" => Ok(TargetProfile::P1),
            "P2" => Ok(TargetProfile::P2),
            "P3" => Ok(TargetProfile::P3),
            "P4" => Ok(TargetProfile::P4),
            "P5" => Ok(TargetProfile::P5),
            other => Err(InvalidProfile(other.to_string())),
        }
    }
}

/// Empirical per-benchmark maxima used to normalize composite profiles.
///
/// Calibrated offline from large random-search studies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineMaxima {
    pub cycle: f64,
    pub power: f64,
    pub area: f64,
}

impl BaselineMaxima {
    /// eas_eas, 1000-sample random search
    pub const EAS_EAS: BaselineMaxima = BaselineMaxima {
        cycle: 23282.0,
        power: 69.5747,
        area: 1155350.0,
    };

    /// fft_transpose, 1000-sample random search
    pub const FFT_TRANSPOSE: BaselineMaxima = BaselineMaxima {
        cycle: 62966.0,
        power: 225.118,
        area: 2515230.0,
    };
}

impl Default for BaselineMaxima {
    fn default() -> Self {
        BaselineMaxima::EAS_EAS
    }
}

/// Score one simulation result under a target profile. Pure; safe to call
/// any number of times on the same result.
#[must_use]
pub fn target_value(
    result: &SimulationResult,
    profile: TargetProfile,
    maxima: &BaselineMaxima,
) -> f64 {
    match profile {
        TargetProfile::Cycle => result.cycle as f64,
        TargetProfile::Power => result.power,
        TargetProfile::Area => result.area,
        composite => {
            let (c1, c2) = composite.weights().unwrap_or((0.0, 0.0));
            let cycle_norm = result.cycle as f64 / maxima.cycle;
            let power_norm = result.power / maxima.power;
            let area_norm = result.area / maxima.area;
            c1 * (cycle_norm / area_norm) + c2 * (power_norm / area_norm)
        }
    }
}
