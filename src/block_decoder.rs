use std::io::{Read, Write};

use log::trace;

use crate::bitreader::BitReader;
use crate::canonical::CanonicalCoder;
use crate::error::{DeflateError, Result};
use crate::sliding_writer::SlidingWriter;
use crate::tables::{self, fixed_distance_lengths, fixed_litlen_lengths};
use crate::translator::{Symbol, Translator, MAX_SYMBOL_BITS};

/// Maximum codeword length allowed for the 19-symbol code-length alphabet
/// (a 3-bit field in the stream, RFC 1951 §3.2.7).
const MAX_PRECODE_CODEWORD_LEN: usize = 7;

/// State machine over DEFLATE block types. Owns the fixed-Huffman decode
/// tables so repeated fixed blocks (common in short or degenerate streams)
/// don't rebuild them; dynamic blocks always rebuild their tables since
/// they are in general different every time.
pub struct BlockDecoder {
    fixed_translator: Option<Translator>,
}

impl BlockDecoder {
    pub fn new() -> Self {
        Self {
            fixed_translator: None,
        }
    }

    /// Decodes a full DEFLATE stream (all blocks through the one whose
    /// BFINAL bit is set) from `input` into `output`.
    pub fn decode_stream<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut SlidingWriter<W>,
    ) -> Result<()> {
        loop {
            let bfinal = input.read_bits(1)? != 0;
            let btype = input.read_bits(2)?;

            match btype {
                tables_block::STORED => {
                    trace!("deflate block: stored");
                    self.decode_stored_block(input, output)?;
                }
                tables_block::FIXED => {
                    trace!("deflate block: fixed huffman");
                    self.decode_fixed_block(input, output)?;
                }
                tables_block::DYNAMIC => {
                    trace!("deflate block: dynamic huffman");
                    self.decode_dynamic_block(input, output)?;
                }
                _ => return Err(DeflateError::ReservedBlockType),
            }

            if bfinal {
                break;
            }
        }
        Ok(())
    }

    fn decode_stored_block<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut SlidingWriter<W>,
    ) -> Result<()> {
        input.align();
        let len = input.read_aligned_u16()?;
        let nlen = input.read_aligned_u16()?;
        if len != !nlen {
            return Err(DeflateError::StoredLengthMismatch { len, nlen });
        }

        let mut chunk = vec![0u8; len as usize];
        input.read_aligned_bytes(&mut chunk)?;
        output.write_aligned(&chunk)
    }

    fn decode_fixed_block<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut SlidingWriter<W>,
    ) -> Result<()> {
        if self.fixed_translator.is_none() {
            self.fixed_translator = Some(Translator::new(
                &fixed_litlen_lengths(),
                &fixed_distance_lengths(),
            )?);
        }
        let translator = self.fixed_translator.as_ref().unwrap();
        run_translator(input, output, translator)
    }

    fn decode_dynamic_block<R: Read, W: Write>(
        &mut self,
        input: &mut BitReader<R>,
        output: &mut SlidingWriter<W>,
    ) -> Result<()> {
        let translator = decode_dynamic_huffman_header(input)?;
        run_translator(input, output, &translator)
    }
}

impl Default for BlockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

mod tables_block {
    pub const STORED: u32 = 0;
    pub const FIXED: u32 = 1;
    pub const DYNAMIC: u32 = 2;
}

/// Decodes the HLIT/HDIST/HCLEN header and the run-length-encoded code
/// lengths of a dynamic-Huffman block (RFC 1951 §3.2.7), then builds the
/// block's `Translator`.
fn decode_dynamic_huffman_header<R: Read>(input: &mut BitReader<R>) -> Result<Translator> {
    let hlit = input.read_bits(5)? as usize + 257;
    let hdist = input.read_bits(5)? as usize + 1;
    let hclen = input.read_bits(4)? as usize + 4;

    let mut precode_lens = [0u8; tables::NUM_PRECODE_SYMS];
    for i in 0..hclen {
        precode_lens[tables::PRECODE_LENGTH_ORDER[i]] = input.read_bits(3)? as u8;
    }
    let precode_coder = CanonicalCoder::build(&precode_lens)?;

    let total = hlit + hdist;
    let mut lens: Vec<u8> = Vec::with_capacity(total);

    while lens.len() < total {
        input.ensure(MAX_PRECODE_CODEWORD_LEN)?;
        let peek = input.peek();
        let (sym, bits) = precode_coder.decode(peek)?;
        input.advance(bits as usize)?;

        match sym {
            0..=15 => lens.push(sym as u8),
            16 => {
                let rep_val = *lens.last().ok_or(DeflateError::InvalidSymbol(sym))?;
                let count = 3 + input.read_bits(2)? as usize;
                push_run(&mut lens, rep_val, count, total, sym)?;
            }
            17 => {
                let count = 3 + input.read_bits(3)? as usize;
                push_run(&mut lens, 0, count, total, sym)?;
            }
            18 => {
                let count = 11 + input.read_bits(7)? as usize;
                push_run(&mut lens, 0, count, total, sym)?;
            }
            _ => return Err(DeflateError::InvalidSymbol(sym)),
        }
    }

    let (litlen_lens, distance_lens) = lens.split_at(hlit);
    Translator::new(litlen_lens, distance_lens)
}

fn push_run(lens: &mut Vec<u8>, value: u8, count: usize, total: usize, sym: u16) -> Result<()> {
    if lens.len() + count > total {
        return Err(DeflateError::InvalidSymbol(sym));
    }
    lens.extend(std::iter::repeat(value).take(count));
    Ok(())
}

/// Decodes symbols with `translator` until `EndOfBlock`, applying literals
/// and matches to `output`. Shared by fixed and dynamic blocks.
fn run_translator<R: Read, W: Write>(
    input: &mut BitReader<R>,
    output: &mut SlidingWriter<W>,
    translator: &Translator,
) -> Result<()> {
    loop {
        input.ensure(MAX_SYMBOL_BITS)?;
        let peek = input.peek();
        let (symbol, bits) = translator.decode_symbol(peek)?;
        input.advance(bits as usize)?;

        match symbol {
            Symbol::Literal(byte) => output.write_byte(byte)?,
            Symbol::EndOfBlock => break,
            Symbol::Match { length, distance } => {
                output.repeat(length as usize, distance as usize)?
            }
        }
    }
    Ok(())
}
