use std::borrow::Borrow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use super::stride::{Backing, Stride, StridedReader};
use super::BandSource;
use crate::error::{Error, ErrorKind, Result};

/// Band source reading from an OS file handle.
///
/// `F` is anything that lends a [`File`]: pass `&File` to read from a file
/// the caller keeps open (several sources can share it), or use
/// [`HandleSource::open`] to have the source own the file.
///
/// The file is repositioned at the start of every read, so sources sharing
/// one handle can be read in any interleaving.
#[derive(Debug)]
pub struct HandleSource<F> {
    inner: StridedReader<FileBacking<F>>,
}

impl<F: Borrow<File>> HandleSource<F> {
    /// Create a source over an open file handle.
    ///
    /// No I/O is performed until the first read.
    pub fn new(handle: F, start: u64, bytes_per_pixel: usize, pixel_skip: usize) -> Result<Self> {
        let stride = Stride::new(bytes_per_pixel, pixel_skip)?;
        debug!(start, bytes_per_pixel, pixel_skip, "created handle band source");
        Ok(Self {
            inner: StridedReader::new(FileBacking { handle }, start, stride),
        })
    }

    pub fn start(&self) -> u64 {
        self.inner.start()
    }

    pub fn stride(&self) -> Stride {
        self.inner.stride()
    }

    /// Absolute file offset where the next read begins.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Give back the handle.
    pub fn into_inner(self) -> F {
        self.inner.into_backing().handle
    }
}

impl HandleSource<File> {
    /// Open `path` read-only and create a source that owns the handle.
    ///
    /// The file is closed when the source is dropped.
    pub fn open(
        path: impl AsRef<Path>,
        start: u64,
        bytes_per_pixel: usize,
        pixel_skip: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        let stride = Stride::new(bytes_per_pixel, pixel_skip)?;
        let file = File::open(path).map_err(|e| {
            Error::from_io(ErrorKind::OpeningResource, &path.display().to_string(), e)
        })?;
        debug!(path = %path.display(), "opened file for band source");
        Self::new(file, start, stride.bytes_per_pixel(), stride.pixel_skip())
    }
}

impl<F: Borrow<File>> BandSource for HandleSource<F> {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner.read(buf)
    }

    fn size(&mut self) -> Result<u64> {
        self.inner.size()
    }
}

#[derive(Debug)]
struct FileBacking<F> {
    handle: F,
}

impl<F: Borrow<File>> FileBacking<F> {
    fn file(&self) -> &File {
        self.handle.borrow()
    }
}

impl<F: Borrow<File>> Backing for FileBacking<F> {
    fn reposition(&mut self, offset: u64) -> Result<()> {
        self.file()
            .seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|e| Error::from_io(ErrorKind::Seek, &format!("seek to {}", offset), e))
    }

    fn fetch(&mut self, buf: &mut [u8]) -> Result<()> {
        let len = buf.len();
        self.file()
            .read_exact(buf)
            .map_err(|e| Error::from_io(ErrorKind::Read, &format!("read of {} bytes", len), e))
    }

    fn skip(&mut self, count: u64) -> Result<()> {
        let count = i64::try_from(count)
            .map_err(|_| Error::seek(format!("skip of {} bytes is too large", count)))?;
        self.file()
            .seek(SeekFrom::Current(count))
            .map(|_| ())
            .map_err(|e| Error::from_io(ErrorKind::Seek, &format!("skip of {} bytes", count), e))
    }

    fn total_len(&mut self) -> Result<u64> {
        self.file()
            .metadata()
            .map(|m| m.len())
            .map_err(|e| Error::from_io(ErrorKind::Unknown, "file metadata", e))
    }
}
