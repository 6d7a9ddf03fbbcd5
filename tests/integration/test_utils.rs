//! Test utilities for integration tests.
//!
//! This module provides a byte stream that records every call made on it and
//! helpers for building interleaved band data on disk and in memory.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use nitf_bandio::{BufferStream, ByteStream, Error, ErrorKind, Result, Whence};

// =============================================================================
// Tracking Stream
// =============================================================================

/// One call made on a [`TrackingStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Read(usize),
    Write(usize),
    Seek(i64, Whence),
    Tell,
    Size,
    Close,
}

/// A buffer-backed stream that logs every call.
///
/// Clones share the call log, so a test can keep one clone while the other
/// is lent to a band source.
#[derive(Clone)]
pub struct TrackingStream {
    inner: Arc<Mutex<BufferStream>>,
    calls: Arc<Mutex<Vec<Call>>>,
    fail_reads_with: Option<ErrorKind>,
}

impl TrackingStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BufferStream::from(data))),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_reads_with: None,
        }
    }

    /// Every read fails with `kind` after being logged.
    pub fn failing_reads(data: Vec<u8>, kind: ErrorKind) -> Self {
        Self {
            fail_reads_with: Some(kind),
            ..Self::new(data)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Read(_)))
            .count()
    }

    pub fn reset_tracking(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ByteStream for TrackingStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.record(Call::Read(buf.len()));
        if let Some(kind) = self.fail_reads_with {
            return Err(Error::new(kind, "injected read failure"));
        }
        self.inner.lock().unwrap().read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.record(Call::Write(buf.len()));
        self.inner.lock().unwrap().write(buf)
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.record(Call::Seek(offset, whence));
        self.inner.lock().unwrap().seek(offset, whence)
    }

    fn tell(&mut self) -> Result<u64> {
        self.record(Call::Tell);
        self.inner.lock().unwrap().tell()
    }

    fn size(&mut self) -> Result<u64> {
        self.record(Call::Size);
        self.inner.lock().unwrap().size()
    }

    fn close(&mut self) -> Result<()> {
        self.record(Call::Close);
        self.inner.lock().unwrap().close()
    }
}

// =============================================================================
// Band Data Builders
// =============================================================================

/// Pixel-interleaved image data: `bands` bands of `pixels` pixels, each
/// pixel `bytes_per_pixel` wide.
///
/// Byte `j` of pixel `p` in band `b` is `b * 64 + (p * bytes_per_pixel + j) % 64`,
/// so every band has its own value range and any misplaced byte shows.
pub fn interleaved(bands: usize, pixels: usize, bytes_per_pixel: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(bands * pixels * bytes_per_pixel);
    for p in 0..pixels {
        for b in 0..bands {
            for j in 0..bytes_per_pixel {
                data.push((b * 64 + (p * bytes_per_pixel + j) % 64) as u8);
            }
        }
    }
    data
}

/// The bytes band `band` of [`interleaved`] data should deliver.
pub fn expected_band(band: usize, pixels: usize, bytes_per_pixel: usize) -> Vec<u8> {
    (0..pixels * bytes_per_pixel)
        .map(|i| (band * 64 + i % 64) as u8)
        .collect()
}

/// Write `data` to a fresh temporary file.
pub fn temp_file_with(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}
