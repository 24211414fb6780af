//! Simulator configuration emission.
//!
//! A configuration is rendered from a template file carrying two
//! placeholders: `$OUTPUT_DIR`, replaced with the run's output directory,
//! and a marker line where one `set <param> <value>` assignment per
//! selected parameter is inserted.

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::params::{ParameterDomain, ParameterSet};

/// Token in the template replaced by the output-directory path
pub const OUTPUT_DIR_TOKEN: &str = "$OUTPUT_DIR";

/// Marker line in the template replaced by the parameter assignments
pub const PARAM_MARKER: &str = "# Insert here\n";

/// Render a configuration from template text.
///
/// Emits one `set` line for each key present in both `params` and the
/// domain table. Keys outside the table are dropped without error; the
/// original driver relied on this to pass oversized parameter dicts
/// through unchanged, so it is kept as load-bearing behavior. Line order
/// within the inserted block is unspecified.
pub fn render_config(
    params: &ParameterSet,
    domain: &ParameterDomain,
    output_dir: &Path,
    template: &str,
) -> String {
    let rendered = template.replace(OUTPUT_DIR_TOKEN, &output_dir.display().to_string());

    let mut assignments = String::new();
    for (key, value) in params {
        if domain.contains(key) {
            assignments.push_str(&format!("set {key} {value}\n"));
        }
    }

    rendered.replace(PARAM_MARKER, &assignments)
}

/// Render a configuration from a template file and write it to `dest`.
///
/// A missing or unreadable template is fatal; there are no retries.
pub fn emit_config(
    params: &ParameterSet,
    domain: &ParameterDomain,
    output_dir: &Path,
    template_path: &Path,
    dest: &Path,
) -> Result<(), ConfigError> {
    let template = fs::read_to_string(template_path).map_err(|source| {
        ConfigError::TemplateRead {
            path: template_path.to_path_buf(),
            source,
        }
    })?;

    if !template.contains(PARAM_MARKER) {
        return Err(ConfigError::MissingMarker {
            path: template_path.to_path_buf(),
            marker: "# Insert here",
        });
    }

    let rendered = render_config(params, domain, output_dir, &template);

    fs::write(dest, rendered).map_err(|source| ConfigError::ConfigWrite {
        path: dest.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TEMPLATE: &str = "output_dir $OUTPUT_DIR\n# Insert here\ngenerate configs\n";

    fn params(pairs: &[(&str, i64)]) -> ParameterSet {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_render_emits_one_set_line_per_known_key() {
        let params = params(&[("cache_size", 32768), ("cycle_time", 3)]);
        let out = render_config(
            &params,
            ParameterDomain::builtin(),
            &PathBuf::from("/tmp/sim_out"),
            TEMPLATE,
        );

        assert!(out.contains("output_dir /tmp/sim_out\n"));
        assert!(out.contains("set cache_size 32768\n"));
        assert!(out.contains("set cycle_time 3\n"));
        assert_eq!(out.matches("set ").count(), 2);
        assert!(!out.contains("# Insert here"));
    }

    #[test]
    fn test_render_drops_unknown_keys_silently() {
        let params = params(&[("cache_size", 16384), ("warp_count", 8)]);
        let out = render_config(
            &params,
            ParameterDomain::builtin(),
            &PathBuf::from("/out"),
            TEMPLATE,
        );

        assert!(out.contains("set cache_size 16384\n"));
        assert!(!out.contains("warp_count"));
    }

    #[test]
    fn test_emit_missing_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = emit_config(
            &params(&[]),
            ParameterDomain::builtin(),
            dir.path(),
            &dir.path().join("nonexistent.xe"),
            &dir.path().join("out.xe"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::TemplateRead { .. }));
    }

    #[test]
    fn test_emit_writes_rendered_config() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.xe");
        let dest = dir.path().join("t_config");
        std::fs::write(&template_path, TEMPLATE).unwrap();

        emit_config(
            &params(&[("enable_l2", 1)]),
            ParameterDomain::builtin(),
            &dir.path().join("out"),
            &template_path,
            &dest,
        )
        .unwrap();

        let written = std::fs::read_to_string(&dest).unwrap();
        assert!(written.contains("set enable_l2 1\n"));
    }

    #[test]
    fn test_emit_rejects_template_without_marker() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.xe");
        std::fs::write(&template_path, "output_dir $OUTPUT_DIR\n").unwrap();

        let err = emit_config(
            &params(&[]),
            ParameterDomain::builtin(),
            dir.path(),
            &template_path,
            &dir.path().join("out.xe"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingMarker { .. }));
    }
}
