//! Append-only results table.
//!
//! One delimited row per completed sample: the parameter columns in a
//! caller-fixed order, then `success, cycle, power, area`. The header is
//! written exactly once, guarded by the explicit write mode. Failed
//! samples still produce a row (with `0` sentinels), preserving the audit
//! trail of which parameter combinations could not be evaluated.
//!
//! No locking: callers must serialize writes when sharing one table.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::dispatch::Sample;

/// Fixed result columns appended after the parameter columns
pub const RESULT_COLUMNS: [&str; 4] = ["success", "cycle", "power", "area"];

const DELIMITER: char = ',';

/// Whether the first write of a batch replaces the table or extends it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and write the header row
    Overwrite,
    /// Extend an existing table; no header
    Append,
}

/// Incremental writer for one results table
pub struct ResultWriter {
    out: BufWriter<File>,
    param_columns: Vec<String>,
}

impl ResultWriter {
    /// Open a results table. `Overwrite` truncates and emits the header
    /// (parameter names followed by the fixed result columns); `Append`
    /// extends an existing table whose column schema matches, emitting the
    /// header only when the table does not exist yet, so appending never
    /// produces a headerless file.
    pub fn open(path: &Path, param_columns: &[String], mode: WriteMode) -> io::Result<ResultWriter> {
        let (file, need_header) = match mode {
            WriteMode::Overwrite => (File::create(path)?, true),
            WriteMode::Append => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                let empty = file.metadata()?.len() == 0;
                (file, empty)
            }
        };
        let mut writer = ResultWriter {
            out: BufWriter::new(file),
            param_columns: param_columns.to_vec(),
        };
        if need_header {
            writer.write_header()?;
        }
        Ok(writer)
    }

    fn write_header(&mut self) -> io::Result<()> {
        let mut columns: Vec<&str> = self.param_columns.iter().map(String::as_str).collect();
        columns.extend(RESULT_COLUMNS);
        writeln!(self.out, "{}", columns.join(&DELIMITER.to_string()))?;
        self.out.flush()
    }

    /// Append one sample row and flush, so partial batches survive a crash
    pub fn write_sample(&mut self, sample: &Sample) -> io::Result<()> {
        let mut fields = Vec::with_capacity(self.param_columns.len() + RESULT_COLUMNS.len());
        for column in &self.param_columns {
            fields.push(sample.params.get(column).copied().unwrap_or(0).to_string());
        }
        fields.push(if sample.success { "1" } else { "0" }.to_string());
        match &sample.result {
            Some(result) => {
                fields.push(result.cycle.to_string());
                fields.push(result.power.to_string());
                fields.push(result.area.to_string());
            }
            None => {
                fields.push("0".to_string());
                fields.push("0".to_string());
                fields.push("0".to_string());
            }
        }
        writeln!(self.out, "{}", fields.join(&DELIMITER.to_string()))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SimulationResult;
    use crate::params::ParameterSet;
    use std::fs;
    use tempfile::tempdir;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample(pairs: &[(&str, i64)], result: Option<SimulationResult>) -> Sample {
        let params: ParameterSet = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Sample {
            params,
            success: result.is_some(),
            error: result.is_none().then(|| "run script exited with status 1".to_string()),
            result,
        }
    }

    #[test]
    fn test_header_then_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let cols = columns(&["cache_size", "cycle_time"]);

        let mut writer = ResultWriter::open(&path, &cols, WriteMode::Overwrite).unwrap();
        writer
            .write_sample(&sample(
                &[("cache_size", 16384), ("cycle_time", 2)],
                Some(SimulationResult {
                    cycle: 65029,
                    power: 67.5946,
                    area: 1094960.0,
                }),
            ))
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "cache_size,cycle_time,success,cycle,power,area");
        assert_eq!(lines[1], "16384,2,1,65029,67.5946,1094960");
    }

    #[test]
    fn test_failed_sample_writes_sentinel_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let cols = columns(&["enable_l2"]);

        let mut writer = ResultWriter::open(&path, &cols, WriteMode::Overwrite).unwrap();
        writer.write_sample(&sample(&[("enable_l2", 1)], None)).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().nth(1).unwrap(), "1,0,0,0,0");
    }

    #[test]
    fn test_append_mode_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let cols = columns(&["enable_l2"]);

        {
            let mut writer = ResultWriter::open(&path, &cols, WriteMode::Overwrite).unwrap();
            writer.write_sample(&sample(&[("enable_l2", 0)], None)).unwrap();
        }
        {
            let mut writer = ResultWriter::open(&path, &cols, WriteMode::Append).unwrap();
            writer.write_sample(&sample(&[("enable_l2", 1)], None)).unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // One header, two rows
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "enable_l2,success,cycle,power,area");
    }

    #[test]
    fn test_append_to_missing_table_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let cols = columns(&["enable_l2"]);

        let mut writer = ResultWriter::open(&path, &cols, WriteMode::Append).unwrap();
        writer.write_sample(&sample(&[("enable_l2", 1)], None)).unwrap();
        drop(writer);

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "enable_l2,success,cycle,power,area");
    }

    #[test]
    fn test_overwrite_mode_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let cols = columns(&["enable_l2"]);

        for _ in 0..2 {
            let mut writer = ResultWriter::open(&path, &cols, WriteMode::Overwrite).unwrap();
            writer.write_sample(&sample(&[("enable_l2", 1)], None)).unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
