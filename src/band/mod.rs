//! Band sources: strided readers over memory, files and byte streams.
//!
//! A band source delivers the bytes of one band of an image, stepping over
//! the bytes of other bands when the image is interleaved by pixel. Each
//! source is built over a store it does not own:
//!
//! ```text
//!                    ┌────────────────────┐
//!                    │  BandSource trait  │
//!                    └─────────┬──────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        ▼                     ▼                     ▼
//! ┌──────────────┐    ┌─────────────────┐    ┌──────────────────┐
//! │ MemorySource │    │  HandleSource   │    │   StreamSource   │
//! │   (&[u8])    │    │ (std::fs::File) │    │  (ByteStream)    │
//! └──────────────┘    └─────────────────┘    └──────────────────┘
//! ```
//!
//! All three share one stride engine; they differ only in how raw bytes are
//! fetched. Dropping a source releases only its own state.
//!
//! # Example
//!
//! ```
//! use nitf_bandio::band::{BandSource, MemorySource};
//!
//! let pixels = b"ABCDEFGHIJKL";
//! // Two-byte pixels, every other pixel belongs to this band.
//! let mut band = MemorySource::new(pixels, 0, 2, 1).unwrap();
//!
//! let mut buf = [0u8; 2];
//! band.read(&mut buf).unwrap();
//! assert_eq!(&buf, b"AB");
//! band.read(&mut buf).unwrap();
//! assert_eq!(&buf, b"EF");
//! ```

mod handle;
mod memory;
mod stream;
mod stride;

pub use handle::HandleSource;
pub use memory::MemorySource;
pub use stream::StreamSource;
pub use stride::Stride;

use crate::error::{Error, Result};

/// Sequential reader for the bytes of one band.
///
/// Not safe for concurrent use: each source carries its own cursor.
pub trait BandSource {
    /// Fill `buf` with the next `buf.len()` bytes of the band.
    ///
    /// A read that runs out of backing data fails with kind `Read`. Bytes
    /// copied before the failure are left in `buf`; the source should be
    /// discarded afterwards.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Total number of bytes the band can deliver from its start offset.
    fn size(&mut self) -> Result<u64>;

    /// Read the next `len` bytes into a new vector.
    ///
    /// Allocation failure is reported with kind `Memory`.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|e| Error::memory(format!("cannot allocate {} bytes: {}", len, e)))?;
        buf.resize(len, 0);
        self.read(&mut buf)?;
        Ok(buf)
    }
}

impl<T: BandSource + ?Sized> BandSource for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read(buf)
    }

    fn size(&mut self) -> Result<u64> {
        (**self).size()
    }
}
