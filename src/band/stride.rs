use tracing::trace;

use crate::error::{Error, Result};

/// Pixel layout of one band inside its backing store.
///
/// For every `bytes_per_pixel` bytes delivered, `pixel_skip * bytes_per_pixel`
/// further bytes are stepped over. A pixel skip of 0 is a contiguous band and
/// `bytes_per_pixel` is then ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stride {
    bytes_per_pixel: usize,
    pixel_skip: usize,
    skip_bytes: u64,
}

impl Stride {
    /// A contiguous band.
    pub const CONTIGUOUS: Stride = Stride {
        bytes_per_pixel: 0,
        pixel_skip: 0,
        skip_bytes: 0,
    };

    /// Validate and build a stride.
    ///
    /// Fails with kind `InvalidArgument` when a pixel skip is given without a
    /// pixel width, or when the step does not fit in 64 bits.
    pub fn new(bytes_per_pixel: usize, pixel_skip: usize) -> Result<Self> {
        if pixel_skip > 0 && bytes_per_pixel == 0 {
            return Err(Error::invalid_argument(format!(
                "pixel skip {} requires a non-zero bytes-per-pixel",
                pixel_skip
            )));
        }

        let skip_bytes = (pixel_skip as u64)
            .checked_mul(bytes_per_pixel as u64)
            .filter(|skip| skip.checked_add(bytes_per_pixel as u64).is_some())
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "stride of {} pixels x {} bytes overflows",
                    pixel_skip, bytes_per_pixel
                ))
            })?;

        Ok(Self {
            bytes_per_pixel,
            pixel_skip,
            skip_bytes,
        })
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub fn pixel_skip(&self) -> usize {
        self.pixel_skip
    }

    pub fn is_contiguous(&self) -> bool {
        self.pixel_skip == 0
    }

    /// Bytes stepped over after each delivered pixel.
    pub fn skip_bytes(&self) -> u64 {
        self.skip_bytes
    }

    /// Backing-store bytes consumed per pixel delivered.
    pub fn step(&self) -> u64 {
        self.bytes_per_pixel as u64 + self.skip_bytes
    }

    /// How many bytes can be delivered out of `available` backing bytes.
    pub fn delivered_len(&self, available: u64) -> u64 {
        if self.is_contiguous() {
            return available;
        }
        let step = self.step();
        let pixel = self.bytes_per_pixel as u64;
        (available / step) * pixel + (available % step).min(pixel)
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self::CONTIGUOUS
    }
}

/// Raw byte access a band source is built on.
///
/// A backing is positioned once per `read` call with `reposition`, then
/// alternates `fetch` and `skip` as the stride dictates.
pub(crate) trait Backing {
    /// Place the cursor at an absolute offset.
    fn reposition(&mut self, offset: u64) -> Result<()>;

    /// Fill `buf` from the cursor and advance past it.
    fn fetch(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Move the cursor forward by `count` bytes.
    fn skip(&mut self, count: u64) -> Result<()>;

    /// Total length of the backing store.
    fn total_len(&mut self) -> Result<u64>;
}

/// The stride engine shared by every band source.
#[derive(Debug)]
pub(crate) struct StridedReader<B> {
    backing: B,
    start: u64,
    position: u64,
    /// Bytes of the current pixel already delivered, always `< bytes_per_pixel`.
    pixel_offset: usize,
    stride: Stride,
}

impl<B: Backing> StridedReader<B> {
    pub(crate) fn new(backing: B, start: u64, stride: Stride) -> Self {
        Self {
            backing,
            start,
            position: start,
            pixel_offset: 0,
            stride,
        }
    }

    pub(crate) fn start(&self) -> u64 {
        self.start
    }

    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    pub(crate) fn stride(&self) -> Stride {
        self.stride
    }

    pub(crate) fn into_backing(self) -> B {
        self.backing
    }

    /// Fill `buf` with the next `buf.len()` delivered bytes.
    ///
    /// On failure the bytes already copied stay in `buf` and the logical
    /// position is no longer meaningful. Backing failures keep their kind and
    /// gain the offset and length of the band read that hit them.
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        let position = self.position;
        let len = buf.len();
        self.fill(buf).map_err(|e| {
            e.with_context(format_args!("band read of {} bytes at offset {}", len, position))
        })
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        trace!(
            position = self.position,
            len = buf.len(),
            bytes_per_pixel = self.stride.bytes_per_pixel,
            pixel_skip = self.stride.pixel_skip,
            "band read"
        );
        self.backing.reposition(self.position)?;

        if self.stride.is_contiguous() {
            self.backing.fetch(buf)?;
            self.position += buf.len() as u64;
            return Ok(());
        }

        let pixel = self.stride.bytes_per_pixel;
        let skip = self.stride.skip_bytes;
        let mut produced = 0;
        while produced < buf.len() {
            // The skip after the last pixel of a call is deferred to the
            // next call's reposition, so a band that ends exactly on a
            // pixel never steps past the end of its store. A chunk that
            // follows another in the same call always starts a new pixel.
            if produced > 0 {
                self.backing.skip(skip)?;
            }

            let chunk = (pixel - self.pixel_offset).min(buf.len() - produced);
            self.backing.fetch(&mut buf[produced..produced + chunk])?;
            self.position += chunk as u64;
            self.pixel_offset += chunk;
            if self.pixel_offset == pixel {
                self.position += skip;
                self.pixel_offset = 0;
            }
            produced += chunk;
        }

        Ok(())
    }

    /// Delivered bytes the band holds in total, counted from `start`.
    pub(crate) fn size(&mut self) -> Result<u64> {
        let total = self.backing.total_len()?;
        Ok(self.stride.delivered_len(total.saturating_sub(self.start)))
    }
}
