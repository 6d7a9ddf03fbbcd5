//! # nitf-bandio
//!
//! Band-level I/O for NITF image data.
//!
//! This library reads the bytes of a single image band out of wherever the
//! image data lives, whether that is a buffer in memory, a local file or a
//! remote object, and whether the band is stored contiguously or interleaved
//! by pixel with other bands. It does not parse headers or decompress pixel
//! data: the caller says where a band starts and how it is strided.
//!
//! ## Architecture
//!
//! The library is organized into a few modules:
//!
//! - [`io`] - The [`ByteStream`] capability and its file, buffer and S3 backends
//! - [`band`] - The [`BandSource`] trait and its memory, handle and stream sources
//! - [`registry`] - [`ParseInfo`], a store for validated values between parsing passes
//! - [`error`] - The [`Error`] type shared by everything above
//! - [`config`] - CLI configuration for the `nitf-band` tool
//! - [`util`] - String helpers for header fields and file names
//!
//! Everything is synchronous and blocking. Nothing here is safe to call
//! concurrently on the same instance; use one source per reader.
//!
//! ## Example
//!
//! ```rust
//! use nitf_bandio::{BandSource, BufferStream, StreamSource};
//!
//! // Three one-byte bands interleaved by pixel: R G B R G B ...
//! let mut stream = BufferStream::from(b"RGBRGBRGB".to_vec());
//! let mut green = StreamSource::new(&mut stream, 1, 1, 2).unwrap();
//!
//! assert_eq!(green.size().unwrap(), 3);
//! assert_eq!(green.read_vec(3).unwrap(), b"GGG");
//! ```

pub mod band;
pub mod config;
pub mod error;
pub mod io;
pub mod registry;
pub mod util;

// Re-export commonly used types
pub use band::{BandSource, HandleSource, MemorySource, Stride, StreamSource};
pub use config::{Backend, BandArgs, Cli, Command, ExtractConfig, SizeConfig};
pub use error::{Error, ErrorKind, Result};
pub use io::{
    create_s3_client, parse_s3_uri, AccessMode, BufferStream, ByteStream, FileStream, S3Stream,
    Whence,
};
pub use registry::{HashTable, ParseInfo, DEFAULT_BUCKET_COUNT};
