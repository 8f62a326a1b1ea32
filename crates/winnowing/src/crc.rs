//! Checksums used by the fingerprint formats.
//!
//! - CRC32C (Castagnoli) hashes grams and re-hashes the selected window
//!   minimum into the public WFP token.
//! - CRC8/MAXIM-DOW hashes each normalized source line for HPSM.

const CRC8_MAXIM_DOW_POLYNOMIAL: u8 = 0x8C;
const CRC8_MAXIM_DOW_INITIAL: u8 = 0x00;
const CRC8_MAXIM_DOW_FINAL: u8 = 0x00;

static CRC8_MAXIM_DOW_TABLE: [u8; 256] = crc8_table();

const fn crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            let carry = crc & 0x01 != 0;
            crc >>= 1;
            if carry {
                crc ^= CRC8_MAXIM_DOW_POLYNOMIAL;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC32C over `bytes`.
#[inline]
pub fn crc32c(bytes: &[u8]) -> u32 {
    ::crc32c::crc32c(bytes)
}

/// CRC32C of the little-endian encoding of `hash`.
///
/// This is how a selected window minimum becomes a WFP token.
#[inline]
pub fn crc32c_of_hash(hash: u32) -> u32 {
    crc32c(&hash.to_le_bytes())
}

/// CRC8/MAXIM-DOW over `bytes` (reflected polynomial `0x8C`, init `0x00`,
/// no final xor).
pub fn crc8_maxim(bytes: &[u8]) -> u8 {
    let crc = bytes.iter().fold(CRC8_MAXIM_DOW_INITIAL, |crc, &b| {
        CRC8_MAXIM_DOW_TABLE[usize::from(b ^ crc)]
    });
    crc ^ CRC8_MAXIM_DOW_FINAL
}
