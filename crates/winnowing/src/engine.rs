//! Streaming gram/window winnowing and the [`Winnowing`] engine.
//!
//! Each content byte extends a 30-byte gram. Once the gram is full its CRC32C
//! goes into a 64-entry window and the gram shifts left by one byte, so every
//! further content byte yields a new gram hash. Whenever the window is full its
//! minimum is taken; a minimum different from the last one selected is
//! re-hashed into a WFP token and attributed to the current source line.
//!
//! The pass is a fold over the input with all accumulators in
//! [`WinnowState`], so concurrent calls share nothing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use md5::{Digest, Md5};
use tracing::debug;

use crate::config::{WinnowingConfig, WinnowingError};
use crate::crc::{crc32c, crc32c_of_hash};
use crate::hpsm::hpsm;
use crate::normalize::normalize;
use crate::obfuscate::ObfuscationMap;
use crate::record::{FingerprintRecord, SnippetLine, WFP_VERSION};
use crate::skip::should_skip_snippets;

/// Gram length in normalized bytes.
pub const GRAM: usize = 30;
/// Window length in gram hashes.
pub const WINDOW: usize = 64;
/// Larger than any CRC32 value, so the first window minimum always emits.
const MAX_CRC32: u64 = 1 << 32;

/// Accumulators for one winnowing pass.
#[derive(Debug)]
struct WinnowState {
    gram: Vec<u8>,
    window: VecDeque<u32>,
    line: u32,
    last_hash: u64,
    pending: Option<SnippetLine>,
    lines: Vec<SnippetLine>,
    max_lines: Option<usize>,
}

impl WinnowState {
    fn new(max_lines: Option<usize>) -> Self {
        Self {
            gram: Vec::with_capacity(GRAM),
            window: VecDeque::with_capacity(WINDOW),
            line: 1,
            last_hash: MAX_CRC32,
            pending: None,
            lines: Vec::new(),
            max_lines,
        }
    }

    fn step(mut self, byte: u8) -> Self {
        let normalized = if byte == b'\n' {
            self.line += 1;
            None
        } else {
            normalize(byte)
        };
        let Some(c) = normalized else {
            return self;
        };

        self.gram.push(c);
        if self.gram.len() < GRAM {
            return self;
        }

        self.window.push_back(crc32c(&self.gram));
        if self.window.len() >= WINDOW {
            if let Some(&min_hash) = self.window.iter().min() {
                if u64::from(min_hash) != self.last_hash {
                    self.emit(crc32c_of_hash(min_hash));
                    self.last_hash = u64::from(min_hash);
                }
            }
            self.window.pop_front();
        }
        self.gram.remove(0);
        self
    }

    fn emit(&mut self, token: u32) {
        match self.pending.as_mut() {
            Some(pending) if pending.line_number == self.line => pending.hashes.push(token),
            _ => {
                self.flush();
                self.pending = Some(SnippetLine {
                    line_number: self.line,
                    hashes: vec![token],
                });
            }
        }
    }

    fn flush(&mut self) {
        if let Some(line) = self.pending.take() {
            if self.max_lines.map_or(true, |max| self.lines.len() < max) {
                self.lines.push(line);
            }
        }
    }

    fn finish(mut self) -> Vec<SnippetLine> {
        self.flush();
        self.lines
    }
}

/// Snippet lines for `contents`, without any header or skip policy.
///
/// `max_lines` caps how many lines are kept; `None` keeps them all.
pub fn winnow(contents: &[u8], max_lines: Option<usize>) -> Vec<SnippetLine> {
    contents
        .iter()
        .fold(WinnowState::new(max_lines), |state, &byte| state.step(byte))
        .finish()
}

/// Lowercase hex MD5 of `contents`.
pub fn content_md5(contents: &[u8]) -> String {
    hex::encode(Md5::digest(contents))
}

/// Fingerprinting engine holding the configuration and, when obfuscation is
/// on, a handle to the shared [`ObfuscationMap`].
///
/// The engine holds no per-call state; one instance can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Winnowing {
    config: WinnowingConfig,
    obfuscation: Option<Arc<ObfuscationMap>>,
}

impl Winnowing {
    /// Build an engine. A private obfuscation map is created when the
    /// configuration asks for obfuscation.
    pub fn new(config: WinnowingConfig) -> Result<Self, WinnowingError> {
        config.validate()?;
        let obfuscation = config
            .obfuscate
            .then(|| Arc::new(ObfuscationMap::new()));
        Ok(Self {
            config,
            obfuscation,
        })
    }

    /// Use `map` for path obfuscation and turn obfuscation on.
    pub fn with_obfuscation_map(mut self, map: Arc<ObfuscationMap>) -> Self {
        self.config.obfuscate = true;
        self.obfuscation = Some(map);
        self
    }

    pub fn config(&self) -> &WinnowingConfig {
        &self.config
    }

    pub fn obfuscation_map(&self) -> Option<&Arc<ObfuscationMap>> {
        self.obfuscation.as_ref()
    }

    /// Whether `path`/`contents` would get snippet lines under this config.
    pub fn wants_snippets(&self, path: &str, is_binary: bool, contents: &[u8]) -> bool {
        if is_binary || self.config.skip_snippets {
            return false;
        }
        self.config.all_extensions || !should_skip_snippets(path, contents)
    }

    /// Fingerprint one file's bytes.
    ///
    /// `is_binary` comes from the caller's content classifier; binary files
    /// only get the `file=` header.
    pub fn fingerprint(&self, path: &str, is_binary: bool, contents: &[u8]) -> FingerprintRecord {
        let start = Instant::now();
        let header_path = match &self.obfuscation {
            Some(map) => map.obfuscate(path),
            None => path.to_string(),
        };

        let mut record = FingerprintRecord {
            wfp_version: WFP_VERSION,
            content_hash: content_md5(contents),
            byte_length: contents.len() as u64,
            path: header_path,
            hpsm: None,
            snippet_lines: Vec::new(),
        };

        let snippets = self.wants_snippets(path, is_binary, contents);
        if snippets {
            if self.config.hpsm {
                record.hpsm = Some(hpsm(contents)).filter(|sig| !sig.is_empty());
            }
            record.snippet_lines = winnow(contents, self.config.max_snippet_lines);
        }

        debug!(
            path = %record.path,
            byte_length = record.byte_length,
            snippet_lines = record.snippet_lines.len(),
            skipped = !snippets,
            elapsed_micros = start.elapsed().as_micros(),
            "fingerprint_success"
        );
        record
    }
}
