//! Byte-stream adapter over a file or an in-memory buffer
//!
//! Readers and writers in this crate work against any `Read + Seek`
//! source; [`MediaIo`] is the concrete adapter that owns the backing
//! store, tracks the open/closed lifecycle, and provides the atomic
//! `transfer` used to swap rewritten content into place.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A file- or memory-backed byte stream with an explicit open/close
/// lifecycle and atomic replacement of the backing store.
#[derive(Debug)]
pub enum MediaIo {
    /// Stream backed by a file on disk.
    File {
        path: PathBuf,
        file: Option<File>,
    },
    /// Stream backed by an owned in-memory buffer.
    Memory {
        data: Cursor<Vec<u8>>,
        open: bool,
    },
}

impl MediaIo {
    /// Create a file-backed stream. The file is not opened until [`open`].
    ///
    /// [`open`]: MediaIo::open
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        MediaIo::File {
            path: path.as_ref().to_path_buf(),
            file: None,
        }
    }

    /// Create a memory-backed stream over `data`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        MediaIo::Memory {
            data: Cursor::new(data),
            open: true,
        }
    }

    /// Open the stream and position it at byte 0.
    pub fn open(&mut self) -> Result<()> {
        match self {
            MediaIo::File { path, file } => {
                if file.is_none() {
                    let f = File::open(&*path).map_err(|e| {
                        Error::DataSourceOpenFailed(format!("{}: {}", path.display(), e))
                    })?;
                    *file = Some(f);
                }
                if let Some(f) = file {
                    f.seek(SeekFrom::Start(0))?;
                }
            }
            MediaIo::Memory { data, open } => {
                data.set_position(0);
                *open = true;
            }
        }
        Ok(())
    }

    /// Close the stream. Closing an already-closed stream is a no-op.
    pub fn close(&mut self) {
        match self {
            MediaIo::File { file, .. } => *file = None,
            MediaIo::Memory { open, .. } => *open = false,
        }
    }

    /// Whether the stream is currently open.
    pub fn is_open(&self) -> bool {
        match self {
            MediaIo::File { file, .. } => file.is_some(),
            MediaIo::Memory { open, .. } => *open,
        }
    }

    /// Total size of the backing store in bytes.
    pub fn size(&self) -> Result<u64> {
        match self {
            MediaIo::File { path, file } => {
                let meta = match file {
                    Some(f) => f.metadata()?,
                    None => std::fs::metadata(path)?,
                };
                Ok(meta.len())
            }
            MediaIo::Memory { data, .. } => Ok(data.get_ref().len() as u64),
        }
    }

    /// Current stream position.
    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.stream_position()?)
    }

    /// Whether the stream position is at or past the end of the store.
    pub fn eof(&mut self) -> Result<bool> {
        Ok(self.tell()? >= self.size()?)
    }

    /// Atomically replace the backing store with `data`.
    ///
    /// For file-backed streams the new content is staged to a temporary
    /// file in the destination directory, synced, and renamed into
    /// place, so the path holds either the old bytes or the new bytes,
    /// never a partial write. The stream is left closed afterwards.
    pub fn transfer(&mut self, data: &[u8]) -> Result<()> {
        match self {
            MediaIo::File { path, file } => {
                *file = None;
                let dir = path
                    .parent()
                    .filter(|d| !d.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let mut tmp =
                    tempfile::NamedTempFile::new_in(dir).map_err(|_| Error::ImageWriteFailed)?;
                tmp.write_all(data).map_err(|_| Error::ImageWriteFailed)?;
                tmp.as_file()
                    .sync_all()
                    .map_err(|_| Error::ImageWriteFailed)?;
                tmp.persist(&*path).map_err(|_| Error::ImageWriteFailed)?;
            }
            MediaIo::Memory { data: cursor, open } => {
                *cursor = Cursor::new(data.to_vec());
                *open = false;
            }
        }
        Ok(())
    }

    /// Borrow the bytes of a memory-backed stream.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            MediaIo::Memory { data, .. } => Some(data.get_ref()),
            MediaIo::File { .. } => None,
        }
    }

    /// Consume the stream, returning the bytes of a memory-backed store.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            MediaIo::Memory { data, .. } => Some(data.into_inner()),
            MediaIo::File { .. } => None,
        }
    }

    fn not_open() -> io::Error {
        io::Error::new(io::ErrorKind::NotConnected, "data source is not open")
    }
}

impl Read for MediaIo {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MediaIo::File { file: Some(f), .. } => f.read(buf),
            MediaIo::File { file: None, .. } => Err(Self::not_open()),
            MediaIo::Memory { data, open: true } => data.read(buf),
            MediaIo::Memory { open: false, .. } => Err(Self::not_open()),
        }
    }
}

impl Seek for MediaIo {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            MediaIo::File { file: Some(f), .. } => f.seek(pos),
            MediaIo::File { file: None, .. } => Err(Self::not_open()),
            MediaIo::Memory { data, open: true } => data.seek(pos),
            MediaIo::Memory { open: false, .. } => Err(Self::not_open()),
        }
    }
}

impl Write for MediaIo {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            MediaIo::File { file: Some(f), .. } => f.write(buf),
            MediaIo::File { file: None, .. } => Err(Self::not_open()),
            MediaIo::Memory { data, open: true } => data.write(buf),
            MediaIo::Memory { open: false, .. } => Err(Self::not_open()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            MediaIo::File { file: Some(f), .. } => f.flush(),
            MediaIo::File { file: None, .. } => Err(Self::not_open()),
            MediaIo::Memory { .. } => Ok(()),
        }
    }
}

/// Read exactly `buf.len()` bytes, distinguishing a short read from an
/// underlying I/O failure.
pub(crate) fn read_exact_or(source: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    source.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::InputDataReadFailed,
        _ => Error::FailedToReadImageData,
    })
}
