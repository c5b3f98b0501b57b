//! A standalone LZW coder with a dictionary that grows from a 256-entry
//! single-byte alphabet, 16-bit little-endian codes. Independent of the
//! DEFLATE critical path.
//!
//! The decode side indexes the dictionary with a `Vec<Vec<u8>>` arena, since
//! codes are assigned sequentially and a vector indexed by code is a
//! drop-in replacement for a map; the encode side looks candidate strings up
//! by value, so it uses a `HashMap<Vec<u8>, u16>` instead.

use std::collections::HashMap;

use crate::error::{DeflateError, Result};

const INITIAL_DICT_SIZE: usize = 256;

/// Encodes `data` into a sequence of 16-bit little-endian codes. Empty
/// input encodes to an empty byte sequence.
pub fn compress(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut dictionary: HashMap<Vec<u8>, u16> = (0..INITIAL_DICT_SIZE as u16)
        .map(|code| (vec![code as u8], code))
        .collect();
    let mut next_code: u16 = INITIAL_DICT_SIZE as u16;

    let mut out = Vec::new();
    let mut window: Vec<u8> = vec![data[0]];

    for &byte in &data[1..] {
        let mut candidate = window.clone();
        candidate.push(byte);

        if dictionary.contains_key(&candidate) {
            window = candidate;
            continue;
        }

        let code = dictionary[&window];
        out.extend_from_slice(&code.to_le_bytes());

        if next_code != u16::MAX {
            dictionary.insert(candidate, next_code);
            next_code += 1;
        }
        window = vec![byte];
    }

    let code = dictionary[&window];
    out.extend_from_slice(&code.to_le_bytes());
    out
}

/// Decodes a sequence of 16-bit little-endian codes produced by
/// [`compress`] back into the original bytes. Handles the classic KwKwK
/// case (a code that references the entry about to be created) by
/// reconstructing it from the previous string plus its own first byte.
pub fn decompress(encoded: &[u8]) -> Result<Vec<u8>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    if encoded.len() % 2 != 0 {
        return Err(DeflateError::UnexpectedEnd);
    }

    let mut dictionary: Vec<Vec<u8>> = (0..INITIAL_DICT_SIZE as u16).map(|c| vec![c as u8]).collect();

    let mut out = Vec::new();
    let mut previous: Option<Vec<u8>> = None;

    for chunk in encoded.chunks_exact(2) {
        let code = u16::from_le_bytes([chunk[0], chunk[1]]);

        let entry: Vec<u8> = if let Some(existing) = dictionary.get(code as usize) {
            existing.clone()
        } else if code as usize == dictionary.len() {
            // KwKwK: the encoder emitted a code for the entry it was about
            // to add in the same step. Reconstruct it as prev + prev[0].
            let prev = previous.as_ref().ok_or(DeflateError::InvalidSymbol(code))?;
            let mut rebuilt = prev.clone();
            rebuilt.push(prev[0]);
            rebuilt
        } else {
            return Err(DeflateError::InvalidSymbol(code));
        };

        out.extend_from_slice(&entry);

        if let Some(prev) = &previous {
            let mut new_entry = prev.clone();
            new_entry.push(entry[0]);
            dictionary.push(new_entry);
        }

        previous = Some(entry);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_text() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT";
        let encoded = compress(data);
        let decoded = decompress(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn round_trips_kwkwk_case() {
        // "ABABABA": after dictionary learns AB and ABA, the final segment
        // re-triggers the entry-not-yet-created special case.
        let data = b"ABABABA";
        let encoded = compress(data);
        let decoded = decompress(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn round_trips_single_byte() {
        let data = b"x";
        let encoded = compress(data);
        let decoded = decompress(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(decompress(&compress(b"")).unwrap(), b"");
    }

    #[test]
    fn odd_length_stream_is_rejected() {
        assert!(decompress(&[0x01]).is_err());
    }
}
