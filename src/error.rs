use thiserror::Error;

/// Everything that can go wrong while decoding a DEFLATE stream or its gzip
/// envelope. All variants are non-retryable: once one is returned, decoding
/// of that stream is aborted and any bytes already handed to the sink are
/// not rolled back.
#[derive(Error, Debug)]
pub enum DeflateError {
    #[error("input exhausted mid-block")]
    UnexpectedEnd,

    #[error("gzip magic bytes do not match 0x1f 0x8b")]
    InvalidMagic,

    #[error("gzip compression method {0} is not supported (only 8 = deflate)")]
    UnsupportedMethod(u8),

    #[error("gzip header flag byte {0:#04x} sets a reserved bit (5-7)")]
    ReservedGzipFlags(u8),

    #[error("DEFLATE block type 3 (reserved) encountered")]
    ReservedBlockType,

    #[error("stored block LEN ({len}) does not match the one's complement of NLEN ({nlen})")]
    StoredLengthMismatch { len: u16, nlen: u16 },

    #[error("no canonical code matches the next bits of input")]
    InvalidPrefixCode,

    #[error("back-reference distance {distance} exceeds {written} bytes written so far")]
    InvalidDistance { distance: usize, written: usize },

    #[error("reserved or out-of-range symbol {0} decoded")]
    InvalidSymbol(u16),

    #[error("gzip trailer CRC-32 mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("gzip trailer ISIZE mismatch: expected {expected}, decompressed {actual}")]
    SizeMismatch { expected: u32, actual: u32 },

    #[error("input larger than the stored-block encoder supports: {0} bytes")]
    InputTooLarge(usize),

    #[error(transparent)]
    IoFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeflateError>;
