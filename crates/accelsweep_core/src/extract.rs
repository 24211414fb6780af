//! Metric recovery from the simulator's textual log.
//!
//! The simulator writes an unstructured stdout log; three fixed patterns
//! carry the numbers we care about:
//!
//! ```text
//! Cycle : 65029 cycles
//! Avg Power: 67.5946 mW
//! Total Area: 1094960.0 uM
//! ```

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// The three scalar metrics produced by one successful simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub cycle: u64,
    pub power: f64,
    pub area: f64,
}

fn cycle_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Cycle : (\d+) cycles").unwrap())
}

fn power_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Avg Power: (\S+) mW").unwrap())
}

fn area_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Total Area: (\S+) uM").unwrap())
}

fn first_capture<'t>(
    re: &Regex,
    text: &'t str,
    metric: &'static str,
    path: &Path,
) -> Result<&'t str, ExtractError> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ExtractError::MissingMetric {
            metric,
            path: path.to_path_buf(),
        })
}

/// Scan the log text for the three metrics.
///
/// The first occurrence of each pattern wins silently; any pattern with
/// zero matches fails with `MissingMetric`.
pub fn extract_from_text(text: &str, log_path: &Path) -> Result<SimulationResult, ExtractError> {
    let cycle_text = first_capture(cycle_re(), text, "cycle", log_path)?;
    let power_text = first_capture(power_re(), text, "power", log_path)?;
    let area_text = first_capture(area_re(), text, "area", log_path)?;

    let cycle = cycle_text.parse().map_err(|_| ExtractError::Malformed {
        metric: "cycle",
        text: cycle_text.to_string(),
    })?;
    let power = power_text.parse().map_err(|_| ExtractError::Malformed {
        metric: "power",
        text: power_text.to_string(),
    })?;
    let area = area_text.parse().map_err(|_| ExtractError::Malformed {
        metric: "area",
        text: area_text.to_string(),
    })?;

    Ok(SimulationResult { cycle, power, area })
}

/// Read a simulation log and extract its metrics
pub fn extract_results(log_path: &Path) -> Result<SimulationResult, ExtractError> {
    let text = fs::read_to_string(log_path).map_err(|source| ExtractError::LogRead {
        path: log_path.to_path_buf(),
        source,
    })?;
    extract_from_text(&text, log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const LOG: &str = "\
loading benchmark...
Cycle : 65029 cycles
Avg Power: 67.5946 mW
Total Area: 1094960.0 uM
done.
";

    #[test]
    fn test_extract_round_trip() {
        let result = extract_from_text(LOG, &PathBuf::from("stdout")).unwrap();
        assert_eq!(result.cycle, 65029);
        assert_eq!(result.power, 67.5946);
        assert_eq!(result.area, 1094960.0);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let log = format!("{LOG}Cycle : 1 cycles\nAvg Power: 0.1 mW\nTotal Area: 2.0 uM\n");
        let result = extract_from_text(&log, &PathBuf::from("stdout")).unwrap();
        assert_eq!(result.cycle, 65029);
        assert_eq!(result.power, 67.5946);
    }

    #[test]
    fn test_missing_metric() {
        let log = "Cycle : 100 cycles\nTotal Area: 5.0 uM\n";
        let err = extract_from_text(log, &PathBuf::from("stdout")).unwrap_err();
        match err {
            ExtractError::MissingMetric { metric, .. } => assert_eq!(metric, "power"),
            other => panic!("expected MissingMetric, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_value() {
        let log = "Cycle : 100 cycles\nAvg Power: n/a mW\nTotal Area: 5.0 uM\n";
        let err = extract_from_text(log, &PathBuf::from("stdout")).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed { metric: "power", .. }));
    }

    #[test]
    fn test_extract_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stdout");
        std::fs::write(&path, LOG).unwrap();
        let result = extract_results(&path).unwrap();
        assert_eq!(result.cycle, 65029);
    }

    #[test]
    fn test_missing_log_file() {
        let err = extract_results(&PathBuf::from("/nonexistent/stdout")).unwrap_err();
        assert!(matches!(err, ExtractError::LogRead { .. }));
    }
}
