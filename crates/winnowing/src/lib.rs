//! # OSSID Winnowing
//!
//! This crate turns the bytes of one file into a WFP record: a compact,
//! order-sensitive fingerprint the remote knowledge base uses to find
//! open-source files and snippets the file was derived from.
//!
//! ## Contract
//!
//! - Input is the raw file bytes plus a binary/text verdict from the caller's
//!   classifier. No I/O happens here.
//! - For the same bytes, path and [`WinnowingConfig`], the rendered record is
//!   byte-for-byte identical. Tokens must match the knowledge base exactly, so
//!   the gram size, window size and hash functions are fixed constants.
//!
//! ## Pipeline
//!
//! 1.  **Header**: MD5 of the raw bytes, byte length and (possibly obfuscated)
//!     path, rendered as `file=<md5>,<len>,<path>`.
//! 2.  **Skip policy**: binaries, denylisted extensions, files of 256 bytes or
//!     less and files starting with `{` or `<` stop at the header.
//! 3.  **Winnowing**: ASCII letters and digits are lowercased into 30-byte
//!     grams; the CRC32C of each gram enters a 64-hash window and each new
//!     window minimum is re-hashed with CRC32C into an 8-hex-digit token,
//!     grouped by source line.
//! 4.  **HPSM** (optional): one CRC8 byte per source line, carried as an extra
//!     `hpsm=` line for high-precision snippet matching.
//!
//! ## Example Usage
//!
//! ```
//! use winnowing::{Winnowing, WinnowingConfig};
//!
//! let engine = Winnowing::new(WinnowingConfig::default()).unwrap();
//! let source = "sample c code with lots of code that we should analyse\n".repeat(10);
//! let record = engine.fingerprint("src/sample.c", false, source.as_bytes());
//!
//! assert!(record.to_wfp().starts_with("file="));
//! assert!(!record.snippet_lines.is_empty());
//! ```
//!
pub mod config;
pub mod crc;
pub mod engine;
pub mod hpsm;
pub mod normalize;
pub mod obfuscate;
pub mod record;
pub mod skip;

pub use crate::config::{WinnowingConfig, WinnowingError};
pub use crate::engine::{content_md5, winnow, Winnowing, GRAM, WINDOW};
pub use crate::hpsm::{hpsm, hpsm_bytes};
pub use crate::normalize::normalize;
pub use crate::obfuscate::ObfuscationMap;
pub use crate::record::{FingerprintRecord, SnippetLine, WFP_VERSION};
pub use crate::skip::{should_skip_snippets, MIN_FILE_SIZE, SKIP_SNIPPET_EXT};
