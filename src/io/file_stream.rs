use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::byte_stream::{ByteStream, Whence};
use crate::error::{Error, ErrorKind, Result};

/// How a [`FileStream`] opens its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    ReadOnly,
    /// Existing file, opened for reading and writing
    ReadWrite,
    /// Create the file, truncating it if it exists
    Create,
}

/// Local-file implementation of [`ByteStream`].
///
/// Seeking past the end of the file is allowed, as it is for the OS; a read
/// from there fails with kind `Read`. After [`close`](ByteStream::close)
/// every operation fails with kind `InvalidObject`.
#[derive(Debug)]
pub struct FileStream {
    file: Option<File>,
    path: PathBuf,
}

impl FileStream {
    /// Open `path` with the given access mode.
    pub fn open(path: impl AsRef<Path>, mode: AccessMode) -> Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        match mode {
            AccessMode::ReadOnly => options.read(true),
            AccessMode::ReadWrite => options.read(true).write(true),
            AccessMode::Create => options.read(true).write(true).create(true).truncate(true),
        };

        let file = options.open(path).map_err(|e| {
            Error::from_io(ErrorKind::OpeningResource, &path.display().to_string(), e)
        })?;
        debug!(path = %path.display(), ?mode, "opened file stream");

        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    /// Wrap a file that is already open. `label` is used in error messages.
    pub fn from_file(file: File, label: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file),
            path: label.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or_else(|| {
            Error::invalid_object(format!("{} is closed", self.path.display()))
        })
    }
}

impl ByteStream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        let len = buf.len();
        let path = self.path.display().to_string();
        self.file()?.read_exact(buf).map_err(|e| {
            let context = format!("{} ({} bytes)", path, len);
            Error::from_io(ErrorKind::Read, &context, e)
        })?;
        trace!(path = %path, len, "file read");
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        let path = self.path.display().to_string();
        self.file()?
            .write_all(buf)
            .map_err(|e| Error::from_io(ErrorKind::Write, &path, e))
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let target = whence.to_seek_from(offset)?;
        let path = self.path.display().to_string();
        self.file()?
            .seek(target)
            .map_err(|e| Error::from_io(ErrorKind::Seek, &path, e))
    }

    fn tell(&mut self) -> Result<u64> {
        let path = self.path.display().to_string();
        self.file()?
            .stream_position()
            .map_err(|e| Error::from_io(ErrorKind::Seek, &path, e))
    }

    fn size(&mut self) -> Result<u64> {
        let path = self.path.display().to_string();
        self.file()?
            .metadata()
            .map(|m| m.len())
            .map_err(|e| Error::from_io(ErrorKind::Unknown, &path, e))
    }

    fn close(&mut self) -> Result<()> {
        match self.file.take() {
            Some(mut file) => {
                file.flush()
                    .map_err(|e| Error::from_io(ErrorKind::Write, &self.path.display().to_string(), e))?;
                debug!(path = %self.path.display(), "closed file stream");
            }
            None => warn!(path = %self.path.display(), "file stream closed twice"),
        }
        Ok(())
    }
}
