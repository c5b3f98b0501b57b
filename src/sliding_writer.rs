use crate::error::{DeflateError, Result};
use crc32fast::Hasher;
use std::io::Write;

/// Size of the DEFLATE sliding window: the maximum distance a back-reference
/// may reach, and the number of trailing bytes kept available after a flush.
pub const BASE: usize = 32768;

/// A ring-like output buffer of capacity `3 * BASE`, sized so that a flush
/// can always preserve the last `BASE` bytes for future back-references.
/// Back-reference copies run byte-by-byte so that `distance < length`
/// self-overlap (RLE) is visible to later bytes within the same call, as
/// RFC 1951 requires. Generic over any `std::io::Write` sink, and keeps a
/// running CRC-32 so the gzip trailer can be verified without buffering the
/// whole output.
pub struct SlidingWriter<W> {
    writer: W,
    buf: Vec<u8>,
    /// Append position within `buf`. Reset backward by `BASE` on rotation.
    local_w: usize,
    /// Total bytes ever appended, never reduced by rotation. This is both
    /// the logical sliding-window position used to validate back-reference
    /// distances and the running count used for the gzip ISIZE trailer.
    total_w: u64,
    crc: Hasher,
}

impl<W: Write> SlidingWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: vec![0u8; BASE * 3],
            local_w: 0,
            total_w: 0,
            crc: Hasher::new(),
        }
    }

    /// Appends one literal byte.
    pub fn write_byte(&mut self, b: u8) -> Result<()> {
        self.rotate_if_needed()?;
        self.buf[self.local_w] = b;
        self.local_w += 1;
        self.total_w += 1;
        Ok(())
    }

    /// Bulk-appends bytes, used for stored blocks.
    pub fn write_aligned(&mut self, bytes: &[u8]) -> Result<()> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Copies `length` bytes starting `distance` bytes before the current
    /// position. `distance` must be in `[1, min(BASE, total_w)]`; shorter
    /// distances than `length` are expected and correctly produce RLE runs.
    pub fn repeat(&mut self, length: usize, distance: usize) -> Result<()> {
        if distance == 0 || distance as u64 > self.total_w || distance > BASE {
            return Err(DeflateError::InvalidDistance {
                distance,
                written: self.total_w as usize,
            });
        }
        self.rotate_if_needed()?;
        for _ in 0..length {
            self.buf[self.local_w] = self.buf[self.local_w - distance];
            self.local_w += 1;
        }
        self.total_w += length as u64;
        Ok(())
    }

    /// Emits the first `BASE` bytes downstream and shifts the remaining
    /// `2 * BASE` bytes left by `BASE`, whenever the append position has
    /// moved past `2 * BASE`. The back-reference invariant (`distance <=
    /// BASE`) survives because the preserved tail is always exactly `BASE`
    /// bytes.
    fn rotate_if_needed(&mut self) -> Result<()> {
        if self.local_w > BASE * 2 {
            self.crc.update(&self.buf[..BASE]);
            self.writer.write_all(&self.buf[..BASE])?;
            self.buf.copy_within(BASE..BASE * 3, 0);
            self.local_w -= BASE;
        }
        Ok(())
    }

    /// Writes all buffered, unemitted bytes to the downstream sink.
    pub fn flush(&mut self) -> Result<()> {
        self.crc.update(&self.buf[..self.local_w]);
        self.writer.write_all(&self.buf[..self.local_w])?;
        self.local_w = 0;
        Ok(())
    }

    /// Flushes any remaining bytes and returns the total byte count and
    /// CRC-32 over the whole stream, for gzip trailer verification.
    pub fn finish(mut self) -> Result<(u64, u32)> {
        self.flush()?;
        Ok((self.total_w, self.crc.finalize()))
    }
}
