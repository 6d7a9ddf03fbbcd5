use tracing::debug;

use super::stride::{Backing, Stride, StridedReader};
use super::BandSource;
use crate::error::{Error, ErrorKind, Result};
use crate::io::{ByteStream, Whence};

/// Band source reading through a [`ByteStream`].
///
/// This is the source for backends the crate knows nothing about: anything
/// implementing the byte-stream capability works, including remote objects
/// ([`S3Stream`](crate::io::S3Stream)). The stream is lent, not owned; pass
/// `&mut stream`, or `&RefCell<_>` to share one stream between bands.
///
/// Backend failures are passed through with their kind. The one exception is
/// a seek past the end of the stream while stepping through the band, which
/// means the band is exhausted and is reported with kind `Read`.
#[derive(Debug)]
pub struct StreamSource<S> {
    inner: StridedReader<StreamBacking<S>>,
}

impl<S: ByteStream> StreamSource<S> {
    /// Create a source over `stream`. No I/O is performed until the first read.
    pub fn new(stream: S, start: u64, bytes_per_pixel: usize, pixel_skip: usize) -> Result<Self> {
        let stride = Stride::new(bytes_per_pixel, pixel_skip)?;
        i64::try_from(start).map_err(|_| {
            Error::invalid_argument(format!("start offset {} does not fit a stream offset", start))
        })?;
        debug!(start, bytes_per_pixel, pixel_skip, "created stream band source");
        Ok(Self {
            inner: StridedReader::new(StreamBacking { stream }, start, stride),
        })
    }

    pub fn start(&self) -> u64 {
        self.inner.start()
    }

    pub fn stride(&self) -> Stride {
        self.inner.stride()
    }

    /// Absolute stream offset where the next read begins.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Give back the stream.
    pub fn into_inner(self) -> S {
        self.inner.into_backing().stream
    }
}

impl<S: ByteStream> BandSource for StreamSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read(buf)
    }

    fn size(&mut self) -> Result<u64> {
        self.inner.size()
    }
}

#[derive(Debug)]
struct StreamBacking<S> {
    stream: S,
}

fn offset(value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| Error::seek(format!("offset {} does not fit a stream offset", value)))
}

/// A band that steps past the end of its stream has run out of data.
fn exhausted(err: Error) -> Error {
    if err.kind() == ErrorKind::Seek {
        Error::read(format!("band exhausted: {}", err.message()))
    } else {
        err
    }
}

impl<S: ByteStream> Backing for StreamBacking<S> {
    fn reposition(&mut self, position: u64) -> Result<()> {
        self.stream
            .seek(offset(position)?, Whence::Start)
            .map(|_| ())
            .map_err(exhausted)
    }

    fn fetch(&mut self, buf: &mut [u8]) -> Result<()> {
        self.stream.read(buf)
    }

    fn skip(&mut self, count: u64) -> Result<()> {
        self.stream
            .seek(offset(count)?, Whence::Current)
            .map(|_| ())
            .map_err(exhausted)
    }

    fn total_len(&mut self) -> Result<u64> {
        self.stream.size()
    }
}
