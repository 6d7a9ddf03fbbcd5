use bytes::Bytes;
use tracing::{trace, warn};

use super::byte_stream::{resolve_seek, ByteStream, Whence};
use crate::error::{Error, Result};

/// In-memory implementation of [`ByteStream`].
///
/// Reads are bounded by the buffer length. Writes overwrite from the current
/// position and grow the buffer when they run past its end. Seeking is
/// limited to `[0, len]`.
#[derive(Debug, Default, Clone)]
pub struct BufferStream {
    data: Vec<u8>,
    position: u64,
    closed: bool,
}

impl BufferStream {
    /// Create an empty buffer, typically as a write target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the underlying bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the stream and return its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::invalid_object("buffer stream is closed"));
        }
        Ok(())
    }
}

impl From<Vec<u8>> for BufferStream {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data,
            position: 0,
            closed: false,
        }
    }
}

impl From<Bytes> for BufferStream {
    fn from(data: Bytes) -> Self {
        Self::from(Vec::from(data))
    }
}

impl ByteStream for BufferStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure_open()?;
        let len = self.data.len() as u64;
        let end = self.position.checked_add(buf.len() as u64);
        match end {
            Some(end) if end <= len => {
                let start = self.position as usize;
                buf.copy_from_slice(&self.data[start..end as usize]);
                self.position = end;
                trace!(offset = start, len = buf.len(), "buffer read");
                Ok(())
            }
            _ => Err(Error::read(format!(
                "requested {} bytes at offset {}, buffer holds {}",
                buf.len(),
                self.position,
                len
            ))),
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.ensure_open()?;
        let start = self.position as usize;
        let end = start
            .checked_add(buf.len())
            .ok_or_else(|| Error::write("write would overflow the buffer"))?;

        if end > self.data.len() {
            self.data
                .try_reserve(end - self.data.len())
                .map_err(|e| Error::memory(format!("cannot grow buffer to {} bytes: {}", end, e)))?;
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(buf);
        self.position = end as u64;
        Ok(())
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.ensure_open()?;
        self.position = resolve_seek(self.position, self.data.len() as u64, offset, whence)?;
        Ok(self.position)
    }

    fn tell(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.position)
    }

    fn size(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.data.len() as u64)
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            warn!("buffer stream closed twice");
        }
        self.closed = true;
        Ok(())
    }
}
