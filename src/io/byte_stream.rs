use std::cell::{RefCell, RefMut};
use std::io::SeekFrom;

use crate::error::{Error, Result};

/// Reference point for [`ByteStream::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Offset is measured from the beginning of the stream
    Start,
    /// Offset is measured from the current position
    Current,
    /// Offset is measured from the end of the stream
    End,
}

impl Whence {
    /// Convert to a `std::io::SeekFrom`, rejecting negative absolute offsets.
    pub(crate) fn to_seek_from(self, offset: i64) -> Result<SeekFrom> {
        match self {
            Whence::Start => u64::try_from(offset)
                .map(SeekFrom::Start)
                .map_err(|_| Error::seek(format!("cannot seek to negative offset {}", offset))),
            Whence::Current => Ok(SeekFrom::Current(offset)),
            Whence::End => Ok(SeekFrom::End(offset)),
        }
    }
}

/// Blocking byte-stream capability over an opaque backend.
///
/// This is the seam between band sources and wherever the bytes actually
/// live. Implementations report every failure through [`Error`]; a failed
/// call must not move the position without saying so. The contract has no
/// timeouts: callers that need a deadline must impose it from outside.
///
/// `read` fills the whole buffer or fails. A short read is a failure of kind
/// `Read`, there is no partial-success signal.
pub trait ByteStream {
    /// Fill `buf` from the current position and advance past it.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Write all of `buf` at the current position and advance past it.
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    /// Move the position and return the new absolute position.
    ///
    /// Moving before 0, or past a bound the backend defines, fails with kind
    /// `Seek`.
    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64>;

    /// Current absolute position.
    fn tell(&mut self) -> Result<u64>;

    /// Total addressable length of the backend's data.
    fn size(&mut self) -> Result<u64>;

    /// End logical use of the stream. Closing twice is not an error.
    fn close(&mut self) -> Result<()>;
}

/// Compute the target of a seek on a backend whose bound is `len`.
pub(crate) fn resolve_seek(position: u64, len: u64, offset: i64, whence: Whence) -> Result<u64> {
    let base = match whence {
        Whence::Start => 0,
        Whence::Current => position,
        Whence::End => len,
    };
    let target = i128::from(base) + i128::from(offset);
    if target < 0 {
        return Err(Error::seek(format!(
            "seek to {} ({:?}{:+}) is before the start of the stream",
            target, whence, offset
        )));
    }
    if target > i128::from(len) {
        return Err(Error::seek(format!(
            "seek to {} ({:?}{:+}) is past the end of the stream ({} bytes)",
            target, whence, offset, len
        )));
    }
    Ok(target as u64)
}

impl<T: ByteStream + ?Sized> ByteStream for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        (**self).seek(offset, whence)
    }

    fn tell(&mut self) -> Result<u64> {
        (**self).tell()
    }

    fn size(&mut self) -> Result<u64> {
        (**self).size()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<T: ByteStream + ?Sized> ByteStream for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        (**self).seek(offset, whence)
    }

    fn tell(&mut self) -> Result<u64> {
        (**self).tell()
    }

    fn size(&mut self) -> Result<u64> {
        (**self).size()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Shared access: several band sources can hold `&RefCell<S>` to the same
/// stream. Each call borrows the stream for its own duration only.
impl<T: ByteStream + ?Sized> ByteStream for &RefCell<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        borrow(*self)?.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        borrow(*self)?.write(buf)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        borrow(*self)?.seek(offset, whence)
    }

    fn tell(&mut self) -> Result<u64> {
        borrow(*self)?.tell()
    }

    fn size(&mut self) -> Result<u64> {
        borrow(*self)?.size()
    }

    fn close(&mut self) -> Result<()> {
        borrow(*self)?.close()
    }
}

fn borrow<'a, T: ?Sized>(cell: &'a RefCell<T>) -> Result<RefMut<'a, T>> {
    cell.try_borrow_mut()
        .map_err(|_| Error::invalid_object("stream is already borrowed by another caller"))
}
