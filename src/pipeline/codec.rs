use crate::error::{Result, ZetPkgError};
use tracing::warn;

/// Base6x alphabet: JSON-safe and URL-safe, no padding character
pub const ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Encoding tag recorded in container metadata for this codec
pub const ENCODING_TAG: &str = "base6x-json-safe";

const INVALID: u8 = 0xFF;

/// Reverse lookup: byte -> 6-bit symbol value, INVALID for non-alphabet bytes
const DECODE_TABLE: [u8; 256] = build_decode_table();

const fn build_decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// How the decoder treats characters outside the alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Reject the input with [`ZetPkgError::InvalidSymbol`]
    #[default]
    Strict,
    /// Skip the character and keep decoding (legacy behaviour)
    Lenient,
}

/// Encode bytes into base6x text
/// Bits are packed MSB first, 6 per symbol; a trailing partial group is
/// left-aligned into one final symbol.
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 4 + 2) / 3);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;

        while bits >= 6 {
            bits -= 6;
            out.push(ALPHABET[((acc >> bits) & 0x3F) as usize] as char);
        }
        acc &= (1 << bits) - 1;
    }

    if bits > 0 {
        out.push(ALPHABET[((acc << (6 - bits)) & 0x3F) as usize] as char);
    }

    out
}

/// Decode base6x text back into bytes.
///
/// Leftover bits that never fill a whole byte are discarded. In strict mode
/// they must be zero and may not span a whole symbol, so every byte string
/// has exactly one accepted encoding.
pub fn decode(text: &str, mode: DecodeMode) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() * 3 / 4);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut skipped = 0usize;
    let mut last = None;

    for (position, ch) in text.chars().enumerate() {
        let value = if ch.is_ascii() {
            DECODE_TABLE[ch as usize]
        } else {
            INVALID
        };

        if value == INVALID {
            match mode {
                DecodeMode::Strict => {
                    return Err(ZetPkgError::InvalidSymbol {
                        position,
                        symbol: ch,
                    })
                }
                DecodeMode::Lenient => {
                    skipped += 1;
                    continue;
                }
            }
        }

        last = Some((position, ch));
        acc = (acc << 6) | u32::from(value);
        bits += 6;

        if bits >= 8 {
            bits -= 8;
            out.push(((acc >> bits) & 0xFF) as u8);
            acc &= (1 << bits) - 1;
        }
    }

    if mode == DecodeMode::Strict && (bits >= 6 || acc != 0) {
        if let Some((position, symbol)) = last {
            return Err(ZetPkgError::InvalidSymbol { position, symbol });
        }
    }

    if skipped > 0 {
        warn!(skipped, "lenient base6x decode ignored non-alphabet characters");
    }

    Ok(out)
}
