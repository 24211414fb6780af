use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while rendering or writing a simulator configuration
#[derive(Debug)]
pub enum ConfigError {
    TemplateRead { path: PathBuf, source: io::Error },
    ConfigWrite { path: PathBuf, source: io::Error },
    MissingMarker { path: PathBuf, marker: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::TemplateRead { path, source } => {
                write!(f, "cannot read template {}: {source}", path.display())
            }
            ConfigError::ConfigWrite { path, source } => {
                write!(f, "cannot write config {}: {source}", path.display())
            }
            ConfigError::MissingMarker { path, marker } => {
                write!(f, "template {} lacks marker {marker:?}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::TemplateRead { source, .. } | ConfigError::ConfigWrite { source, .. } => {
                Some(source)
            }
            ConfigError::MissingMarker { .. } => None,
        }
    }
}

/// Errors raised while activating a benchmark in the shared listing file
#[derive(Debug)]
pub enum SelectorError {
    /// No line in the listing mentions the requested benchmark. Raised
    /// instead of silently commenting every benchmark out.
    BenchmarkNotFound { name: String, listing: PathBuf },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::BenchmarkNotFound { name, listing } => {
                write!(f, "benchmark {name:?} not found in {}", listing.display())
            }
            SelectorError::Io { path, source } => {
                write!(f, "listing I/O error on {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SelectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectorError::Io { source, .. } => Some(source),
            SelectorError::BenchmarkNotFound { .. } => None,
        }
    }
}

/// Errors raised by the external sweep-generation and run tools
#[derive(Debug)]
pub enum ProcessError {
    Spawn {
        tool: String,
        source: io::Error,
    },
    /// The tool exited nonzero (or was killed). The original driver never
    /// checked exit statuses and let a missing log masquerade as a parse
    /// failure; here the true cause surfaces directly.
    NonZeroExit {
        tool: String,
        code: Option<i32>,
    },
    /// Sweep generation finished but did not materialize the expected
    /// benchmark run directory.
    RunDirMissing {
        path: PathBuf,
    },
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Spawn { tool, source } => {
                write!(f, "failed to spawn {tool}: {source}")
            }
            ProcessError::NonZeroExit { tool, code } => match code {
                Some(code) => write!(f, "{tool} exited with status {code}"),
                None => write!(f, "{tool} terminated by signal"),
            },
            ProcessError::RunDirMissing { path } => {
                write!(f, "run directory {} was not generated", path.display())
            }
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised while recovering metrics from the simulation log
#[derive(Debug)]
pub enum ExtractError {
    LogRead {
        path: PathBuf,
        source: io::Error,
    },
    /// The log contained zero occurrences of the metric's pattern.
    MissingMetric {
        metric: &'static str,
        path: PathBuf,
    },
    /// The pattern matched but the captured text did not parse as a number.
    Malformed {
        metric: &'static str,
        text: String,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::LogRead { path, source } => {
                write!(f, "cannot read log {}: {source}", path.display())
            }
            ExtractError::MissingMetric { metric, path } => {
                write!(f, "log {} lacks a {metric} line", path.display())
            }
            ExtractError::Malformed { metric, text } => {
                write!(f, "unparseable {metric} value {text:?}")
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::LogRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Error raised when a target-profile name cannot be parsed.
///
/// Profile selection is a caller-time configuration mistake, so this is
/// fatal to the caller rather than downgraded to a failed sample.
#[derive(Debug, Clone)]
pub struct InvalidProfile(pub String);

impl fmt::Display for InvalidProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized target profile {:?}", self.0)
    }
}

impl std::error::Error for InvalidProfile {}

/// Error raised when a sample dimension names a parameter outside the
/// domain table.
#[derive(Debug, Clone)]
pub struct UnknownParameter(pub String);

impl fmt::Display for UnknownParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown accelerator parameter {:?}", self.0)
    }
}

impl std::error::Error for UnknownParameter {}

/// Any failure inside one sample's simulation pipeline.
///
/// The dispatcher catches this at the sample boundary and converts it into
/// a `success = false` row; it never aborts the batch.
#[derive(Debug)]
pub enum SimulationError {
    Config(ConfigError),
    Selector(SelectorError),
    Process(ProcessError),
    Extract(ExtractError),
    Io { path: PathBuf, source: io::Error },
    MissingEnv { var: &'static str },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "{e}"),
            SimulationError::Selector(e) => write!(f, "{e}"),
            SimulationError::Process(e) => write!(f, "{e}"),
            SimulationError::Extract(e) => write!(f, "{e}"),
            SimulationError::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            SimulationError::MissingEnv { var } => {
                write!(f, "environment variable {var} is not set")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Selector(e) => Some(e),
            SimulationError::Process(e) => Some(e),
            SimulationError::Extract(e) => Some(e),
            SimulationError::Io { source, .. } => Some(source),
            SimulationError::MissingEnv { .. } => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<SelectorError> for SimulationError {
    fn from(e: SelectorError) -> Self {
        SimulationError::Selector(e)
    }
}

impl From<ProcessError> for SimulationError {
    fn from(e: ProcessError) -> Self {
        SimulationError::Process(e)
    }
}

impl From<ExtractError> for SimulationError {
    fn from(e: ExtractError) -> Self {
        SimulationError::Extract(e)
    }
}
