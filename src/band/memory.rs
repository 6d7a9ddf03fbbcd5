use tracing::debug;

use super::stride::{Backing, Stride, StridedReader};
use super::BandSource;
use crate::error::{Error, Result};

/// Band source reading straight out of a byte slice.
///
/// The slice is borrowed, never copied, so this is the cheapest source for
/// data already in memory or memory-mapped. Every access is bounds-checked
/// against the slice.
#[derive(Debug)]
pub struct MemorySource<'a> {
    inner: StridedReader<SliceBacking<'a>>,
}

impl<'a> MemorySource<'a> {
    /// Create a source over `data`, starting `start` bytes in.
    ///
    /// # Arguments
    /// * `data` - The backing bytes; slice it to limit the readable size
    /// * `start` - Offset of the band's first byte within `data`
    /// * `bytes_per_pixel` - Pixel width (ignored when `pixel_skip` is 0)
    /// * `pixel_skip` - Pixels to step over after each delivered pixel
    pub fn new(
        data: &'a [u8],
        start: u64,
        bytes_per_pixel: usize,
        pixel_skip: usize,
    ) -> Result<Self> {
        let stride = Stride::new(bytes_per_pixel, pixel_skip)?;
        if start > data.len() as u64 {
            return Err(Error::invalid_argument(format!(
                "start offset {} is past the end of a {} byte buffer",
                start,
                data.len()
            )));
        }

        debug!(
            len = data.len(),
            start, bytes_per_pixel, pixel_skip, "created memory band source"
        );
        Ok(Self {
            inner: StridedReader::new(SliceBacking { data, cursor: 0 }, start, stride),
        })
    }

    pub fn start(&self) -> u64 {
        self.inner.start()
    }

    pub fn stride(&self) -> Stride {
        self.inner.stride()
    }

    /// Offset in the buffer where the next read begins.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }
}

impl BandSource for MemorySource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read(buf)
    }

    fn size(&mut self) -> Result<u64> {
        self.inner.size()
    }
}

#[derive(Debug)]
struct SliceBacking<'a> {
    data: &'a [u8],
    cursor: u64,
}

impl Backing for SliceBacking<'_> {
    fn reposition(&mut self, offset: u64) -> Result<()> {
        self.cursor = offset;
        Ok(())
    }

    fn fetch(&mut self, buf: &mut [u8]) -> Result<()> {
        let len = self.data.len() as u64;
        let end = self
            .cursor
            .checked_add(buf.len() as u64)
            .filter(|end| *end <= len)
            .ok_or_else(|| {
                Error::read(format!(
                    "requested {} bytes at offset {}, buffer holds {}",
                    buf.len(),
                    self.cursor,
                    len
                ))
            })?;

        buf.copy_from_slice(&self.data[self.cursor as usize..end as usize]);
        self.cursor = end;
        Ok(())
    }

    fn skip(&mut self, count: u64) -> Result<()> {
        self.cursor = self.cursor.saturating_add(count);
        Ok(())
    }

    fn total_len(&mut self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }
}
