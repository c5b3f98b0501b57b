use std::io::{Read, Write};

use log::debug;

use crate::bitreader::BitReader;
use crate::block_decoder::BlockDecoder;
use crate::error::{DeflateError, Result};
use crate::sliding_writer::SlidingWriter;

const MAGIC: [u8; 2] = [0x1f, 0x8b];
const METHOD_DEFLATE: u8 = 8;

const FLAG_FTEXT: u8 = 1 << 0;
const FLAG_FHCRC: u8 = 1 << 1;
const FLAG_FEXTRA: u8 = 1 << 2;
const FLAG_FNAME: u8 = 1 << 3;
const FLAG_FCOMMENT: u8 = 1 << 4;
/// Bits 5-7 of the flag byte are reserved and must be zero (RFC 1952
/// §2.3.1); a compliant encoder never sets them.
const FLAG_RESERVED: u8 = 0b1110_0000;

/// No-compression block size limit observed by [`write_stored`], matching
/// the 16-bit LEN field a single stored DEFLATE block can carry.
const MAX_STORED_BLOCK_SIZE: usize = 0xFFFF;

/// Header fields surfaced to callers that want more than "it decoded
/// successfully" — timestamp, OS byte, and the optional metadata RFC 1952
/// allows. Excludes the compressed-data/trailer fields, which belong to the
/// decode path rather than the header itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GzipHeader {
    pub modification_time: u32,
    pub extra_flags: u8,
    pub operating_system: u8,
    pub extra_field: Option<Vec<u8>>,
    pub original_filename: Option<String>,
    pub file_comment: Option<String>,
}

/// Outcome of a full gzip decode: the header fields present in the
/// envelope, plus the verified trailer values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipResult {
    pub header: GzipHeader,
    pub crc32: u32,
    pub isize: u32,
}

/// Parses the gzip envelope (RFC 1952 §2.3.1) from `input`, decodes the
/// DEFLATE payload into `output`, and verifies the trailer's CRC-32 and
/// ISIZE against what was actually produced.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<GzipResult> {
    let mut reader = BitReader::new(input);
    let header = read_header(&mut reader)?;

    let mut writer = SlidingWriter::new(output);
    BlockDecoder::new().decode_stream(&mut reader, &mut writer)?;
    let (total_written, computed_crc) = writer.finish()?;

    reader.align();
    let expected_crc = reader.read_aligned_u32()?;
    let expected_isize = reader.read_aligned_u32()?;

    if expected_crc != computed_crc {
        return Err(DeflateError::ChecksumMismatch {
            expected: expected_crc,
            actual: computed_crc,
        });
    }
    let actual_isize = (total_written & 0xFFFF_FFFF) as u32;
    if expected_isize != actual_isize {
        return Err(DeflateError::SizeMismatch {
            expected: expected_isize,
            actual: actual_isize,
        });
    }

    debug!(
        "gzip decode complete: {} bytes, crc32 {:#010x}",
        total_written, computed_crc
    );
    Ok(GzipResult {
        header,
        crc32: computed_crc,
        isize: expected_isize,
    })
}

fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<GzipHeader> {
    reader.align();
    let magic0 = reader.read_aligned_u8()?;
    let magic1 = reader.read_aligned_u8()?;
    if [magic0, magic1] != MAGIC {
        return Err(DeflateError::InvalidMagic);
    }

    let method = reader.read_aligned_u8()?;
    if method != METHOD_DEFLATE {
        return Err(DeflateError::UnsupportedMethod(method));
    }

    let flags = reader.read_aligned_u8()?;
    if flags & FLAG_RESERVED != 0 {
        return Err(DeflateError::ReservedGzipFlags(flags));
    }
    let modification_time = reader.read_aligned_u32()?;
    let extra_flags = reader.read_aligned_u8()?;
    let operating_system = reader.read_aligned_u8()?;

    let extra_field = if flags & FLAG_FEXTRA != 0 {
        let xlen = reader.read_aligned_u16()? as usize;
        let mut buf = vec![0u8; xlen];
        reader.read_aligned_bytes(&mut buf)?;
        Some(buf)
    } else {
        None
    };

    let original_filename = if flags & FLAG_FNAME != 0 {
        Some(read_nul_terminated(reader)?)
    } else {
        None
    };

    let file_comment = if flags & FLAG_FCOMMENT != 0 {
        Some(read_nul_terminated(reader)?)
    } else {
        None
    };

    if flags & FLAG_FHCRC != 0 {
        reader.read_aligned_u16()?;
    }

    if flags & FLAG_FTEXT != 0 {
        debug!("gzip header declares FTEXT (cosmetic, no decode effect)");
    }

    Ok(GzipHeader {
        modification_time,
        extra_flags,
        operating_system,
        extra_field,
        original_filename,
        file_comment,
    })
}

fn read_nul_terminated<R: Read>(reader: &mut BitReader<R>) -> Result<String> {
    let mut bytes = Vec::new();
    loop {
        let b = reader.read_aligned_u8()?;
        if b == 0 {
            break;
        }
        bytes.push(b);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes `data` as a minimal gzip stream containing a single DEFLATE
/// stored (no-compression) block: gzip header with no optional fields,
/// OS byte 255 (unknown), DEFLATE header byte `0x01`, LEN/NLEN, the raw
/// bytes, then the CRC-32/ISIZE trailer.
pub fn write_stored<W: Write>(mut output: W, data: &[u8]) -> Result<()> {
    if data.len() > MAX_STORED_BLOCK_SIZE {
        return Err(DeflateError::InputTooLarge(data.len()));
    }

    let mut header = [0u8; 10];
    header[0] = MAGIC[0];
    header[1] = MAGIC[1];
    header[2] = METHOD_DEFLATE;
    header[3] = 0; // flags
                   // bytes 4..8 (MTIME) left as 0: a deterministic timestamp keeps output
                   // reproducible, unlike the reference encoder's wall-clock stamp.
    header[8] = 0; // extra flags
    header[9] = 255; // OS: unknown
    output.write_all(&header)?;

    let len = data.len() as u16;
    let deflate_header = [0x01u8]; // BFINAL=1, BTYPE=00, rest padding
    output.write_all(&deflate_header)?;
    output.write_all(&len.to_le_bytes())?;
    output.write_all(&(!len).to_le_bytes())?;
    output.write_all(data)?;

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    let crc = hasher.finalize();
    output.write_all(&crc.to_le_bytes())?;
    output.write_all(&(data.len() as u32).to_le_bytes())?;

    Ok(())
}
