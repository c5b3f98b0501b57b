use crate::error::{DeflateError, Result};

/// One canonical code decoded from a code-length vector: which symbol it
/// stands for and how many bits the code itself takes (not counting any
/// extra bits a higher layer may attach to that symbol).
#[derive(Clone, Copy, Default)]
struct Entry {
    symbol: u16,
    /// 0 means "no code of this bit pattern exists" (a table hole).
    length: u8,
}

/// Builds and decodes one canonical prefix code (RFC 1951 §3.2.2 / Peter
/// Deutsch's algorithm). Used for the literal/length alphabet, the distance
/// alphabet, and the 19-symbol code-length alphabet alike — this type knows
/// nothing about what the symbols *mean*; `Translator` and `BlockDecoder`
/// layer DEFLATE-specific interpretation on top.
///
/// Decoding uses a single flat table of size `2^max_len` rather than a
/// two-level fast-table/subtable split: `max_len` is at most 15 in standard
/// DEFLATE, so the table never exceeds 32768 entries, cheap enough that the
/// extra indirection of a two-level scheme isn't worth it here.
///
/// Codes are stored **bit-reversed** in the table so they can be matched
/// directly against a reader whose peek word is LSB-first (see
/// `bitreader.rs`'s module docs for why).
pub struct CanonicalCoder {
    table: Vec<Entry>,
    max_len: u32,
}

impl CanonicalCoder {
    /// `code_lengths[i]` is the bit length of symbol `i`'s code, or 0 if
    /// symbol `i` does not appear in this alphabet.
    pub fn build(code_lengths: &[u8]) -> Result<Self> {
        let (codes, max_len) = generate_canonical_codes(code_lengths)?;

        if max_len == 0 {
            // Degenerate alphabet (e.g. an empty distance table): any
            // decode attempt is necessarily invalid input.
            return Ok(Self {
                table: vec![Entry::default(); 1],
                max_len: 0,
            });
        }

        let table_size = 1usize << max_len;
        let mut table = vec![Entry::default(); table_size];

        for (symbol, (&len, &code)) in code_lengths.iter().zip(codes.iter()).enumerate() {
            if len == 0 {
                continue;
            }
            let len = len as u32;
            let reversed = reverse_bits(code, len) as usize;
            let step = 1usize << len;
            let mut idx = reversed;
            while idx < table_size {
                table[idx] = Entry {
                    symbol: symbol as u16,
                    length: len as u8,
                };
                idx += step;
            }
        }

        Ok(Self { table, max_len })
    }

    /// Matches a canonical code against the low bits of `peek` (which must
    /// already have at least `self.max_len` valid bits, guaranteed by the
    /// caller via `BitReader::ensure`). Returns the decoded symbol and how
    /// many bits the code itself consumed.
    pub fn decode(&self, peek: u64) -> Result<(u16, u32)> {
        if self.max_len == 0 {
            return Err(DeflateError::InvalidPrefixCode);
        }
        let idx = (peek & ((1u64 << self.max_len) - 1)) as usize;
        let entry = self.table[idx];
        if entry.length == 0 {
            return Err(DeflateError::InvalidPrefixCode);
        }
        Ok((entry.symbol, entry.length as u32))
    }
}

/// Peter Deutsch's canonical-code assignment algorithm (RFC 1951 §3.2.2):
/// codes are MSB-first values, assigned in ascending symbol order within
/// each length, shorter lengths numerically preceding longer ones. Returns
/// `(code_per_symbol, max_len)`.
fn generate_canonical_codes(code_lengths: &[u8]) -> Result<(Vec<u32>, u32)> {
    let max_len = code_lengths.iter().copied().max().unwrap_or(0) as u32;
    if max_len > 15 {
        return Err(DeflateError::InvalidPrefixCode);
    }
    if max_len == 0 {
        return Ok((vec![0; code_lengths.len()], 0));
    }

    let mut bl_count = vec![0u32; max_len as usize + 1];
    for &len in code_lengths {
        if len > 0 {
            bl_count[len as usize] += 1;
        }
    }

    let mut next_code = vec![0u32; max_len as usize + 1];
    let mut code = 0u32;
    bl_count[0] = 0;
    for bits in 1..=max_len as usize {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }

    let mut codes = vec![0u32; code_lengths.len()];
    for (i, &len) in code_lengths.iter().enumerate() {
        if len == 0 {
            continue;
        }
        let len = len as usize;
        let assigned = next_code[len];
        if assigned >= (1u32 << len) {
            // Over-subscribed code: more symbols of this length than the
            // Kraft inequality allows.
            return Err(DeflateError::InvalidPrefixCode);
        }
        codes[i] = assigned;
        next_code[len] += 1;
    }

    Ok((codes, max_len))
}

fn reverse_bits(mut value: u32, len: u32) -> u32 {
    let mut result = 0u32;
    for _ in 0..len {
        result = (result << 1) | (value & 1);
        value >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RFC 1951's own fixed-code example values, reproduced bit-for-bit with
    /// codes left-justified in a 32-bit word.
    #[test]
    fn fixed_litlen_codes_match_rfc_1951() {
        let lens = crate::tables::fixed_litlen_lengths();
        let (codes, _max_len) = generate_canonical_codes(&lens).unwrap();

        let check = |symbol: usize, len: u8, expected_msb32: u32| {
            let code = codes[symbol];
            let left_justified = code << (32 - len as u32);
            assert_eq!(
                left_justified, expected_msb32,
                "symbol {symbol} code mismatch"
            );
        };

        check(0, 8, 0x30000000);
        check(143, 8, 0xBF000000);
        check(144, 9, 0xC8000000);
        check(255, 9, 0xFF800000);
        check(256, 7, 0x00000000);
        check(279, 7, 0x2E000000);
        check(280, 8, 0xC0000000);
        check(287, 8, 0xC7000000);
    }

    #[test]
    fn prefix_free_table_round_trips_every_symbol() {
        let lens: Vec<u8> = vec![3, 3, 3, 3, 3, 2, 4, 4];
        let coder = CanonicalCoder::build(&lens).unwrap();
        let (codes, _) = generate_canonical_codes(&lens).unwrap();

        for (symbol, &len) in lens.iter().enumerate() {
            let reversed = reverse_bits(codes[symbol], len as u32) as u64;
            let (decoded_symbol, decoded_len) = coder.decode(reversed).unwrap();
            assert_eq!(decoded_symbol as usize, symbol);
            assert_eq!(decoded_len, len as u32);
        }
    }

    #[test]
    fn over_subscribed_lengths_are_rejected() {
        // Four symbols all claiming a 1-bit code: violates Kraft's
        // inequality (sum of 2^-1 over 4 symbols is 2).
        let lens = vec![1, 1, 1, 1];
        assert!(CanonicalCoder::build(&lens).is_err());
    }
}
