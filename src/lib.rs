//! Workspace umbrella crate for the open-source identification core (OSSID).
//!
//! This crate stitches the winnowing fingerprinter and the BOM curator together
//! with the pieces that touch the outside world: reading files, classifying
//! binaries, loading scan configuration and reporting metrics.

pub mod config;
pub mod metrics;

pub use curation::{
    CurationError, CurationSummary, Curator, LineRange, MatchDetail, MatchResult, RemoveRule,
    ReplaceRule, Rule, RuleSet, RuleTarget, curate, parse_results, results_to_value,
};
pub use winnowing::{
    FingerprintRecord, ObfuscationMap, SnippetLine, Winnowing, WinnowingConfig, WinnowingError,
    hpsm, winnow,
};

pub use crate::config::{ConfigLoadError, ScanConfig};
pub use crate::metrics::{FingerprintMetrics, set_fingerprint_metrics};

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

use crate::metrics::MetricsSpan;

/// How many leading bytes [`NulByteClassifier`] inspects.
pub const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Errors that can occur while fingerprinting files or curating results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    InvalidInput(String),
    FileAccess { path: String, reason: String },
    Winnowing(WinnowingError),
    Curation(CurationError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            PipelineError::FileAccess { path, reason } => {
                write!(f, "cannot read '{path}': {reason}")
            }
            PipelineError::Winnowing(err) => write!(f, "fingerprinting failed: {err}"),
            PipelineError::Curation(err) => write!(f, "curation failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Winnowing(err) => Some(err),
            PipelineError::Curation(err) => Some(err),
            PipelineError::InvalidInput(_) | PipelineError::FileAccess { .. } => None,
        }
    }
}

impl From<WinnowingError> for PipelineError {
    fn from(value: WinnowingError) -> Self {
        PipelineError::Winnowing(value)
    }
}

impl From<CurationError> for PipelineError {
    fn from(value: CurationError) -> Self {
        PipelineError::Curation(value)
    }
}

/// Decides whether a file is binary, and therefore gets a header-only record.
pub trait BinaryClassifier: Send + Sync {
    fn is_binary(&self, path: &Path, contents: &[u8]) -> bool;
}

/// Treats any file with a NUL byte in its first [`BINARY_SNIFF_LEN`] bytes
/// as binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NulByteClassifier;

impl BinaryClassifier for NulByteClassifier {
    fn is_binary(&self, _path: &Path, contents: &[u8]) -> bool {
        contents.iter().take(BINARY_SNIFF_LEN).any(|&b| b == 0)
    }
}

/// Fingerprint bytes that are already in memory.
pub fn fingerprint_contents(
    path: &str,
    contents: &[u8],
    engine: &Winnowing,
    classifier: &dyn BinaryClassifier,
) -> FingerprintRecord {
    let is_binary = classifier.is_binary(Path::new(path), contents);
    engine.fingerprint(path, is_binary, contents)
}

/// Read `path` and fingerprint it.
///
/// The path is rendered into the record exactly as given. Empty paths,
/// missing files, directories and unreadable files are reported as errors
/// and leave the engine untouched for later calls.
pub fn fingerprint_file(
    path: impl AsRef<Path>,
    engine: &Winnowing,
    classifier: &dyn BinaryClassifier,
) -> Result<FingerprintRecord, PipelineError> {
    let path = path.as_ref();
    let span = MetricsSpan::start();

    match read_file(path) {
        Ok(contents) => {
            let display = path.to_string_lossy();
            let record = fingerprint_contents(&display, &contents, engine, classifier);
            if let Some(span) = span {
                span.record_fingerprint(record.token_count(), Ok(()));
            }
            Ok(record)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "fingerprint_file_failure");
            if let Some(span) = span {
                span.record_fingerprint(0, Err(err.clone()));
            }
            Err(err)
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, PipelineError> {
    if path.as_os_str().is_empty() {
        return Err(PipelineError::InvalidInput("path must not be empty".into()));
    }
    let access = |reason: String| PipelineError::FileAccess {
        path: path.display().to_string(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|err| access(err.to_string()))?;
    if !metadata.is_file() {
        return Err(access("not a regular file".into()));
    }
    fs::read(path).map_err(|err| access(err.to_string()))
}

/// Curate `results` with `rules`, reporting the pass to the metrics recorder.
pub fn curate_results(
    results: Option<&[MatchResult]>,
    rules: Option<&RuleSet>,
) -> Result<Vec<MatchResult>, PipelineError> {
    let span = MetricsSpan::start();
    let outcome = curate(results, rules).map_err(PipelineError::from);
    if let Some(span) = span {
        match &outcome {
            Ok(kept) => span.record_curation(kept.len(), Ok(())),
            Err(err) => span.record_curation(0, Err(err.clone())),
        }
    }
    outcome
}

/// Curate a result document as returned by the knowledge base and render it
/// back into the same JSON shape.
pub fn curate_document(results_json: &str, rules: &RuleSet) -> Result<Value, PipelineError> {
    let results = parse_results(results_json)?;
    let curated = curate_results(Some(results.as_slice()), Some(rules))?;
    Ok(results_to_value(&curated)?)
}
