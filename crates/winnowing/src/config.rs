//! Configuration and error types for WFP generation.
//!
//! The configuration only toggles which parts of the record are produced. The
//! gram and window sizes are fixed because the remote knowledge base was built
//! with them; changing either would make every token unmatchable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Switches controlling how a [`crate::Winnowing`] engine builds records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WinnowingConfig {
    /// Never emit snippet lines; every record is header-only.
    pub skip_snippets: bool,
    /// Bypass the skip policy (extension, size and markup heuristics).
    pub all_extensions: bool,
    /// Attach the per-line HPSM signature to snippet-bearing records.
    pub hpsm: bool,
    /// Replace file paths with pseudonymous identifiers in the header.
    pub obfuscate: bool,
    /// Stop adding snippet lines once this many have been emitted.
    pub max_snippet_lines: Option<usize>,
}

impl WinnowingConfig {
    /// Create a new configuration with every option off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_snippets(mut self, skip_snippets: bool) -> Self {
        self.skip_snippets = skip_snippets;
        self
    }

    pub fn with_all_extensions(mut self, all_extensions: bool) -> Self {
        self.all_extensions = all_extensions;
        self
    }

    pub fn with_hpsm(mut self, hpsm: bool) -> Self {
        self.hpsm = hpsm;
        self
    }

    pub fn with_obfuscation(mut self, obfuscate: bool) -> Self {
        self.obfuscate = obfuscate;
        self
    }

    /// Cap the number of snippet lines per record. `None` means unlimited.
    pub fn with_max_snippet_lines(mut self, limit: Option<usize>) -> Self {
        self.max_snippet_lines = limit;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), WinnowingError> {
        if self.max_snippet_lines == Some(0) {
            return Err(WinnowingError::InvalidConfig(
                "max_snippet_lines must be >= 1 when set".into(),
            ));
        }
        Ok(())
    }
}

/// Errors returned while constructing a winnowing engine.
///
/// Fingerprinting itself is infallible for any byte input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WinnowingError {
    #[error("invalid winnowing config: {0}")]
    InvalidConfig(String),
}
