//! Configuration for the `nitf-band` command-line tool.
//!
//! Options come from command-line arguments via clap, with an environment
//! variable fallback (`NITF_` prefix) and defaults for everything optional.
//!
//! # Subcommands
//!
//! - `extract` - Read a band and write its bytes to a file or stdout
//! - `size` - Print how many bytes a band can deliver
//!
//! # Environment Variables
//!
//! - `NITF_START` - Offset of the band's first byte (default: 0)
//! - `NITF_BYTES_PER_PIXEL` - Pixel width in bytes (default: 0)
//! - `NITF_PIXEL_SKIP` - Pixels skipped after each delivered pixel (default: 0)
//! - `NITF_BACKEND` - `handle`, `stream` or `memory` (default: handle)
//! - `NITF_S3_REGION` - AWS region (default: us-east-1)
//! - `NITF_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `NITF_CHUNK_SIZE` - Bytes requested per read when extracting (default: 64KB)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::io::parse_s3_uri;
use crate::util::base_name;

// =============================================================================
// Default Values
// =============================================================================

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default number of bytes requested from the band per read call.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Largest accepted chunk size.
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Extension stripped from the input name when naming output files.
pub const NITF_EXTENSION: &str = ".ntf";

// =============================================================================
// CLI Structure
// =============================================================================

/// nitf-band - read single bands out of NITF image data.
#[derive(Parser, Debug, Clone)]
#[command(name = "nitf-band")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Read a band and write its bytes out
    Extract(ExtractConfig),

    /// Print the number of bytes a band can deliver
    Size(SizeConfig),
}

/// Which band source reads the input.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// OS file handle
    Handle,
    /// Byte stream (a file stream locally, an S3 stream for s3:// inputs)
    Stream,
    /// Whole input loaded into memory first
    Memory,
}

/// Where the band lives and how it is laid out.
#[derive(Args, Debug, Clone)]
pub struct BandArgs {
    /// Local path or s3://bucket/key of the image data.
    pub input: String,

    /// Offset of the band's first byte.
    #[arg(long, default_value_t = 0, env = "NITF_START")]
    pub start: u64,

    /// Pixel width in bytes. Ignored for contiguous bands.
    #[arg(long, default_value_t = 0, env = "NITF_BYTES_PER_PIXEL")]
    pub bytes_per_pixel: usize,

    /// Pixels to skip after each delivered pixel (0 = contiguous band).
    #[arg(long, default_value_t = 0, env = "NITF_PIXEL_SKIP")]
    pub pixel_skip: usize,

    /// Band source backend.
    #[arg(long, value_enum, default_value_t = Backend::Handle, env = "NITF_BACKEND")]
    pub backend: Backend,

    /// AWS region for s3:// inputs.
    #[arg(long, default_value = DEFAULT_REGION, env = "NITF_S3_REGION")]
    pub s3_region: String,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    #[arg(long, env = "NITF_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl BandArgs {
    /// Validate the band description and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.is_empty() {
            return Err("An input path or s3:// URI is required".to_string());
        }

        if self.input.starts_with("s3://") {
            if parse_s3_uri(&self.input).is_none() {
                return Err(format!(
                    "Invalid S3 URI '{}'. Expected s3://bucket/key",
                    self.input
                ));
            }
            if self.backend != Backend::Stream {
                return Err("s3:// inputs can only be read with --backend stream".to_string());
            }
        }

        if self.pixel_skip > 0 && self.bytes_per_pixel == 0 {
            return Err("--pixel-skip requires a non-zero --bytes-per-pixel".to_string());
        }

        Ok(())
    }

    /// Bucket and key if the input is an S3 object.
    pub fn s3_location(&self) -> Option<(&str, &str)> {
        parse_s3_uri(&self.input)
    }
}

/// Configuration for the `extract` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ExtractConfig {
    #[command(flatten)]
    pub band: BandArgs,

    /// Number of band bytes to extract. Defaults to the whole band.
    #[arg(long)]
    pub length: Option<u64>,

    /// Output file or directory. Writes to stdout when omitted or "-".
    ///
    /// For a directory, the file is named after the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Bytes requested from the band per read call.
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "NITF_CHUNK_SIZE")]
    pub chunk_size: usize,
}

impl ExtractConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.band.validate()?;

        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!(
                "chunk_size must be between 1 and {} bytes",
                MAX_CHUNK_SIZE
            ));
        }

        Ok(())
    }

    /// True when the band goes to stdout.
    pub fn writes_to_stdout(&self) -> bool {
        match &self.output {
            None => true,
            Some(path) => path.as_os_str() == "-",
        }
    }

    /// File name used when the output is a directory, e.g. `i_3001a.band0`
    /// for the band starting at offset 0 of `/data/i_3001a.ntf`.
    pub fn default_output_name(&self) -> String {
        format!(
            "{}.band{}",
            base_name(&self.band.input, NITF_EXTENSION),
            self.band.start
        )
    }
}

/// Configuration for the `size` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SizeConfig {
    #[command(flatten)]
    pub band: BandArgs,
}

impl SizeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.band.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
