//! Benchmark selection in the shared listing file.
//!
//! The external sweep generator reads one plain-text listing in which each
//! non-header line declares a benchmark, commented out with `#` when
//! inactive. Selecting a benchmark rewrites the file so that exactly one
//! contiguous block is active and every other declaration is commented.
//!
//! The listing is a single shared mutable resource with no locking.
//! Concurrent selections for different benchmarks corrupt each other's
//! view; callers running more than one simulation at a time must give each
//! worker its own copy of the listing.

use std::fs;
use std::path::Path;

use crate::error::SelectorError;
use crate::io::atomic_write;

/// Leading header/import lines that are never toggled
pub const RESERVED_LINES: usize = 2;

const COMMENT_MARKER: char = '#';

/// Activate exactly one benchmark block in the listing file.
///
/// The block is delimited by the first and last non-header line containing
/// `name` as a substring; a single matching line is both first and last (a
/// one-line block). Zero matches fail with `BenchmarkNotFound` rather than
/// commenting the entire listing out.
///
/// The rewrite is atomic (temp file + rename), so an interrupted process
/// cannot leave the shared listing half-written. Selecting the same
/// benchmark twice yields a byte-identical file on the second call.
pub fn select_benchmark(listing_path: &Path, name: &str) -> Result<(), SelectorError> {
    let text = fs::read_to_string(listing_path).map_err(|source| SelectorError::Io {
        path: listing_path.to_path_buf(),
        source,
    })?;
    let had_trailing_newline = text.ends_with('\n');
    let lines: Vec<&str> = text.lines().collect();

    let mut first = None;
    let mut last = None;
    for (idx, line) in lines.iter().enumerate().skip(RESERVED_LINES) {
        if line.contains(name) {
            if first.is_none() {
                first = Some(idx);
            }
            last = Some(idx);
        }
    }

    let (first, last) = match (first, last) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(SelectorError::BenchmarkNotFound {
                name: name.to_string(),
                listing: listing_path.to_path_buf(),
            });
        }
    };

    let mut out = String::with_capacity(text.len() + lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if idx < RESERVED_LINES {
            out.push_str(line);
        } else if (first..=last).contains(&idx) {
            out.push_str(line.strip_prefix(COMMENT_MARKER).unwrap_or(line));
        } else if line.starts_with(COMMENT_MARKER) {
            out.push_str(line);
        } else {
            out.push(COMMENT_MARKER);
            out.push_str(line);
        }
        if idx + 1 < lines.len() || had_trailing_newline {
            out.push('\n');
        }
    }

    atomic_write(listing_path, &out).map_err(|source| SelectorError::Io {
        path: listing_path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const LISTING: &str = "\
from design_sweep_types import *
# benchmark declarations
#fft_transpose = Benchmark('fft_transpose')
#fft_transpose.set_kernels(['fft1D_512'])
#aes_aes = Benchmark('aes_aes')
stencil = Benchmark('stencil_3d')
";

    fn write_listing(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("benchmarks.py");
        fs::write(&path, LISTING).unwrap();
        path
    }

    #[test]
    fn test_select_activates_one_block() {
        let dir = tempdir().unwrap();
        let path = write_listing(dir.path());

        select_benchmark(&path, "fft_transpose").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // Header untouched
        assert_eq!(lines[0], "from design_sweep_types import *");
        assert_eq!(lines[1], "# benchmark declarations");
        // Block uncommented
        assert_eq!(lines[2], "fft_transpose = Benchmark('fft_transpose')");
        assert_eq!(lines[3], "fft_transpose.set_kernels(['fft1D_512'])");
        // Everything else commented
        assert_eq!(lines[4], "#aes_aes = Benchmark('aes_aes')");
        assert_eq!(lines[5], "#stencil = Benchmark('stencil_3d')");
    }

    #[test]
    fn test_select_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = write_listing(dir.path());

        select_benchmark(&path, "aes_aes").unwrap();
        let first_pass = fs::read(&path).unwrap();
        select_benchmark(&path, "aes_aes").unwrap();
        let second_pass = fs::read(&path).unwrap();

        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_single_match_is_a_one_line_block() {
        let dir = tempdir().unwrap();
        let path = write_listing(dir.path());

        select_benchmark(&path, "stencil").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5], "stencil = Benchmark('stencil_3d')");
        assert!(lines[2].starts_with('#'));
        assert!(lines[3].starts_with('#'));
        assert!(lines[4].starts_with('#'));
    }

    #[test]
    fn test_switching_benchmarks_swaps_active_block() {
        let dir = tempdir().unwrap();
        let path = write_listing(dir.path());

        select_benchmark(&path, "fft_transpose").unwrap();
        select_benchmark(&path, "aes_aes").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[2].starts_with('#'));
        assert!(lines[3].starts_with('#'));
        assert_eq!(lines[4], "aes_aes = Benchmark('aes_aes')");
    }

    #[test]
    fn test_unknown_benchmark_is_not_found() {
        let dir = tempdir().unwrap();
        let path = write_listing(dir.path());
        let before = fs::read(&path).unwrap();

        let err = select_benchmark(&path, "md_knn").unwrap_err();
        assert!(matches!(err, SelectorError::BenchmarkNotFound { .. }));

        // Listing untouched on failure
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_header_match_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("benchmarks.py");
        // "stencil" appears in the reserved header; only body matches count
        fs::write(
            &path,
            "# listing for stencil study\nimport sweeps\n#stencil = Benchmark('stencil_3d')\n",
        )
        .unwrap();

        select_benchmark(&path, "stencil").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# listing for stencil study");
        assert_eq!(lines[2], "stencil = Benchmark('stencil_3d')");
    }
}
