use crate::canonical::CanonicalCoder;
use crate::error::{DeflateError, Result};
use crate::tables::{self, END_OF_BLOCK};

/// The maximum number of bits a single symbol decode can consume: a 15-bit
/// lit/len code, its up-to-5 length extra bits, a 15-bit distance code, and
/// its up-to-13 distance extra bits. `BlockDecoder` ensures this many bits
/// are buffered before every call to [`Translator::decode_symbol`].
pub const MAX_SYMBOL_BITS: usize = 15 + 5 + 15 + 13;

/// The result of decoding one lit/len(+distance) symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Literal(u8),
    EndOfBlock,
    Match { length: u16, distance: u16 },
}

/// Two coupled canonical coders — literal/length and distance — plus the
/// fixed length/distance base-and-extra-bits tables needed to turn a raw
/// symbol index into a usable length or distance. Built from any pair of
/// code-length vectors, so the same type serves both fixed-Huffman blocks
/// (constant lengths) and dynamic-Huffman blocks (lengths read per block).
pub struct Translator {
    litlen: CanonicalCoder,
    distance: CanonicalCoder,
}

impl Translator {
    pub fn new(litlen_lengths: &[u8], distance_lengths: &[u8]) -> Result<Self> {
        Ok(Self {
            litlen: CanonicalCoder::build(litlen_lengths)?,
            distance: CanonicalCoder::build(distance_lengths)?,
        })
    }

    /// Decodes one symbol starting at `peek`'s bit 0. Returns the symbol and
    /// the total number of bits consumed (code plus any extra bits), so the
    /// caller can advance its `BitReader` by exactly that much.
    pub fn decode_symbol(&self, peek: u64) -> Result<(Symbol, u32)> {
        let (code, code_bits) = self.litlen.decode(peek)?;

        if code < END_OF_BLOCK {
            return Ok((Symbol::Literal(code as u8), code_bits));
        }
        if code == END_OF_BLOCK {
            return Ok((Symbol::EndOfBlock, code_bits));
        }

        let len_idx = (code - 257) as usize;
        let &(base_len, len_extra_bits) = tables::LENGTH_TABLE
            .get(len_idx)
            .ok_or(DeflateError::InvalidSymbol(code))?;

        let mut consumed = code_bits;
        let len_extra = extract_bits(peek, consumed, len_extra_bits as u32);
        consumed += len_extra_bits as u32;
        let length = base_len + len_extra as u16;

        let (dcode, dcode_bits) = self.distance.decode(peek >> consumed)?;
        consumed += dcode_bits;

        let &(base_dist, dist_extra_bits) = tables::DISTANCE_TABLE
            .get(dcode as usize)
            .ok_or(DeflateError::InvalidSymbol(dcode))?;
        let dist_extra = extract_bits(peek, consumed, dist_extra_bits as u32);
        consumed += dist_extra_bits as u32;
        let distance = base_dist + dist_extra as u16;

        Ok((Symbol::Match { length, distance }, consumed))
    }
}

/// Reads `n` bits starting at bit `offset` of `peek` as a plain (non-code)
/// LSB-first integer — the natural representation for extra-bits fields,
/// which need no bit reversal (unlike Huffman codes; see `bitreader.rs`).
fn extract_bits(peek: u64, offset: u32, n: u32) -> u32 {
    if n == 0 {
        0
    } else {
        ((peek >> offset) & ((1u64 << n) - 1)) as u32
    }
}
