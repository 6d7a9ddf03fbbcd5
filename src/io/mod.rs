//! Byte-stream capability and its backends.
//!
//! [`ByteStream`] is the contract every I/O backend implements: blocking
//! read, write, seek, tell, size and close. Releasing a backend is dropping
//! it. Three backends ship with the crate:
//!
//! - [`FileStream`] - a file on the local filesystem
//! - [`BufferStream`] - a growable in-memory buffer
//! - [`S3Stream`] - an object in S3 or S3-compatible storage, read with
//!   HTTP range requests on a caller-supplied tokio runtime
//!
//! Band sources never own the stream they read from. A stream can be lent to
//! one source with `&mut`, or to several at once through a `&RefCell<_>`.

mod buffer_stream;
mod byte_stream;
mod file_stream;
mod s3_stream;

pub use buffer_stream::BufferStream;
pub use byte_stream::{ByteStream, Whence};
pub use file_stream::{AccessMode, FileStream};
pub use s3_stream::{create_s3_client, parse_s3_uri, S3Stream};
