//! WFP record types and their text rendering.
//!
//! The rendered form is what the match service consumes:
//!
//! ```text
//! file=<md5-hex>,<byte-length>,<path>
//! hpsm=<hex>                       (optional)
//! <line>=<token>[,<token>...]
//! ```
//!
//! Every line, including the last, ends with `\n`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens emitted for one source line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnippetLine {
    /// 1-based line on which the tokens were selected.
    pub line_number: u32,
    /// Token values in first-observed order.
    pub hashes: Vec<u32>,
}

impl SnippetLine {
    /// Tokens as zero-padded 8-digit lowercase hex.
    pub fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.hashes.iter().map(|h| format!("{h:08x}"))
    }
}

impl fmt::Display for SnippetLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.line_number)?;
        for (i, hash) in self.hashes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{hash:08x}")?;
        }
        Ok(())
    }
}

/// WFP format version stamped into every record.
pub const WFP_VERSION: u16 = 1;

fn default_wfp_version() -> u16 {
    WFP_VERSION
}

/// Fingerprint of a single file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintRecord {
    /// Format version the record was produced with; not part of the text form.
    #[serde(default = "default_wfp_version")]
    pub wfp_version: u16,
    /// MD5 of the raw bytes, lowercase hex.
    pub content_hash: String,
    /// Raw content length in bytes.
    pub byte_length: u64,
    /// Path as it appears in the header (obfuscated when configured).
    pub path: String,
    /// HPSM line signature, when requested and non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hpsm: Option<String>,
    /// Snippet lines with strictly increasing line numbers.
    #[serde(default)]
    pub snippet_lines: Vec<SnippetLine>,
}

impl FingerprintRecord {
    /// The mandatory `file=` header line, without a trailing newline.
    pub fn header(&self) -> String {
        format!(
            "file={},{},{}",
            self.content_hash, self.byte_length, self.path
        )
    }

    pub fn is_header_only(&self) -> bool {
        self.snippet_lines.is_empty() && self.hpsm.is_none()
    }

    /// Total number of tokens across all snippet lines.
    pub fn token_count(&self) -> usize {
        self.snippet_lines.iter().map(|l| l.hashes.len()).sum()
    }

    /// Render the WFP text block for this record.
    pub fn to_wfp(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FingerprintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        if let Some(hpsm) = &self.hpsm {
            writeln!(f, "hpsm={hpsm}")?;
        }
        for line in &self.snippet_lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
