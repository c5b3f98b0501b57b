use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};
use streaming_deflate_rs::{decompress_gzip_file, encode_stored_file};
use structopt::StructOpt;

#[derive(StructOpt)]
enum GzipCommand {
    /// Decompress a gzip file.
    Decompress {
        /// Gzip file to decompress.
        input: PathBuf,
        /// Destination for the decompressed bytes. Defaults to `input`
        /// with its extension stripped, mirroring gzip(1).
        output: Option<PathBuf>,
    },
    /// Wrap a file in a gzip stream using only a stored (no-compression)
    /// block, e.g. for producing test fixtures.
    EncodeStored {
        /// File to wrap.
        input: PathBuf,
        /// Destination for the gzip stream. Defaults to `input` with
        /// `.gz` appended.
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    match GzipCommand::from_args() {
        GzipCommand::Decompress { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension(""));
            match decompress_gzip_file(&input, &output) {
                Ok(result) => {
                    info!(
                        "decompressed {} -> {} ({} bytes, crc32 {:#010x})",
                        input.display(),
                        output.display(),
                        result.isize,
                        result.crc32
                    );
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!("failed to decompress {}: {}", input.display(), err);
                    ExitCode::FAILURE
                }
            }
        }
        GzipCommand::EncodeStored { input, output } => {
            let output = output.unwrap_or_else(|| {
                let mut p = input.clone().into_os_string();
                p.push(".gz");
                PathBuf::from(p)
            });
            match encode_stored_file(&input, &output) {
                Ok(()) => {
                    info!("encoded {} -> {}", input.display(), output.display());
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!("failed to encode {}: {}", input.display(), err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
