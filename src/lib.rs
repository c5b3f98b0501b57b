//! A streaming DEFLATE (RFC 1951) and gzip (RFC 1952) decoder, with Huffman
//! and LZW as independent auxiliary codecs.
//!
//! The DEFLATE/gzip path is the focus: [`gzip::decompress`] parses a gzip
//! envelope, drives [`block_decoder::BlockDecoder`] over its payload, and
//! verifies the trailer. [`huffman`] and [`lzw`] are simpler, unrelated
//! codecs kept for comparison; neither shares state with the DEFLATE core.

pub mod bitreader;
pub mod block_decoder;
pub mod canonical;
pub mod error;
pub mod gzip;
pub mod huffman;
pub mod lzw;
pub mod sliding_writer;
pub mod tables;
pub mod translator;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use error::{DeflateError, Result};
pub use gzip::{GzipHeader, GzipResult};

/// Decompresses a raw DEFLATE stream (no gzip envelope) from `input` into
/// `output`. Convenience wrapper over [`block_decoder::BlockDecoder`] for
/// callers that already have a bare DEFLATE payload, e.g. zlib members
/// framed elsewhere.
pub fn decompress_deflate<R: Read, W: Write>(input: R, output: W) -> Result<u64> {
    let mut reader = bitreader::BitReader::new(input);
    let mut writer = sliding_writer::SlidingWriter::new(output);
    block_decoder::BlockDecoder::new().decode_stream(&mut reader, &mut writer)?;
    let (total_written, _crc) = writer.finish()?;
    Ok(total_written)
}

/// Decompresses a gzip stream from `input` into `output`, verifying the
/// trailer. See [`gzip::decompress`] for the full result type.
pub fn decompress_gzip<R: Read, W: Write>(input: R, output: W) -> Result<GzipResult> {
    gzip::decompress(input, output)
}

/// Decompresses the gzip file at `input` into the file at `output`,
/// buffering both sides. The CLI driver's only real dependency on this
/// crate beyond the codec itself.
pub fn decompress_gzip_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<GzipResult> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    decompress_gzip(reader, writer)
}

/// Reads the file at `input` whole and writes it to `output` as a
/// single-stored-block gzip stream via [`gzip::write_stored`]. Backs the
/// `gzipd encode-stored` subcommand.
pub fn encode_stored_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    let mut data = Vec::new();
    File::open(input)?.read_to_end(&mut data)?;
    let writer = BufWriter::new(File::create(output)?);
    gzip::write_stored(writer, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn decompress_deflate_handles_a_stored_block() {
        let mut data = vec![0x01u8];
        data.extend_from_slice(&3u16.to_le_bytes());
        data.extend_from_slice(&(!3u16).to_le_bytes());
        data.extend_from_slice(b"abc");

        let mut out = Vec::new();
        let n = decompress_deflate(Cursor::new(data), &mut out).unwrap();
        assert_eq!(out, b"abc");
        assert_eq!(n, 3);
    }

    #[test]
    fn decompress_gzip_round_trips_the_stored_writer() {
        let mut gz = Vec::new();
        gzip::write_stored(&mut gz, b"round trip").unwrap();

        let mut out = Vec::new();
        let result = decompress_gzip(Cursor::new(gz), &mut out).unwrap();
        assert_eq!(out, b"round trip");
        assert_eq!(result.isize, 10);
    }
}
