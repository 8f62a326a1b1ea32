//! High-Precision Snippet Matching (HPSM) line signatures.
//!
//! One byte per source line: the CRC8/MAXIM of the line's normalized content,
//! `0xFF` for a line that is completely empty, or `0x00` for a line holding
//! only non-content bytes (whitespace, punctuation). Bytes after the final
//! newline do not form a line.

use crate::crc::crc8_maxim;
use crate::normalize::normalize;

const EMPTY_LINE: u8 = 0xFF;
const BLANK_LINE: u8 = 0x00;

/// Per-line signature bytes for `contents`.
pub fn hpsm_bytes(contents: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut line = Vec::new();
    // Byte offset of the previous newline.
    let mut last_newline = 0usize;

    for (i, &byte) in contents.iter().enumerate() {
        if byte == b'\n' {
            if !line.is_empty() {
                out.push(crc8_maxim(&line));
                line.clear();
            } else if last_newline + 1 == i {
                out.push(EMPTY_LINE);
            } else if i > last_newline + 1 {
                out.push(BLANK_LINE);
            }
            last_newline = i;
        } else if let Some(c) = normalize(byte) {
            line.push(c);
        }
    }
    out
}

/// HPSM signature of `contents` as lowercase hex.
pub fn hpsm(contents: &[u8]) -> String {
    hex::encode(hpsm_bytes(contents))
}
