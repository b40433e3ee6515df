//! A text file that can be opened, closed and reopened between writes.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A file that text lines are appended to.
///
/// In blocking mode the handle stays open across writes. In non-blocking mode
/// the file is opened for each write and closed straight after, so no
/// descriptor is held between writes.
#[derive(Debug)]
pub struct WritableFile {
    path: PathBuf,
    blocking: bool,
    handle: Option<File>,
}

impl WritableFile {
    /// Creates the file wrapper. In blocking mode the file is opened right
    /// away (truncated unless `append`); otherwise opening is deferred to the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened.
    pub fn new(path: impl Into<PathBuf>, append: bool, blocking: bool) -> Result<Self> {
        let mut file = Self {
            path: path.into(),
            blocking,
            handle: None,
        };
        if blocking {
            file.open(append)?;
        }
        Ok(file)
    }

    /// Opens the file for writing. Without `append` any existing file is
    /// removed first; with it, writes go to the end of the existing content.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the old file cannot be removed or the new
    /// handle cannot be obtained.
    pub fn open(&mut self, append: bool) -> Result<()> {
        self.handle = Some(self.open_handle(append)?);
        Ok(())
    }

    /// Opens the file in append mode unless a handle is already held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the handle cannot be obtained.
    pub fn reopen(&mut self) -> Result<()> {
        self.acquire().map(|_| ())
    }

    /// Writes `text`, plus a trailing newline if requested. In non-blocking
    /// mode the handle is closed again afterwards, whether or not the write
    /// succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened, written or, in
    /// non-blocking mode, closed. A write failure wins over a close failure.
    pub fn write(&mut self, text: &str, newline: bool) -> Result<()> {
        let mut line = Vec::with_capacity(text.len() + usize::from(newline));
        line.extend_from_slice(text.as_bytes());
        if newline {
            line.push(b'\n');
        }

        let written = self
            .acquire()?
            .write_all(&line)
            .map_err(|source| Error::io("write to", &self.path, source));
        let closed = if self.blocking { Ok(()) } else { self.close() };
        written.and(closed)
    }

    /// Forces written bytes to stable storage. Does nothing without an open
    /// handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if syncing fails.
    pub fn flush(&self) -> Result<()> {
        if let Some(file) = self.handle.as_ref() {
            file.sync_all()
                .map_err(|source| Error::io("flush", &self.path, source))?;
        }
        Ok(())
    }

    /// Syncs and releases the handle if one is held. The handle is released
    /// even when syncing fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the final sync fails.
    pub fn close(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(file) => file
                .sync_all()
                .map_err(|source| Error::io("close", &self.path, source)),
            None => Ok(()),
        }
    }

    /// The path written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the handle is kept open between writes.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Whether a handle is currently held.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn acquire(&mut self) -> Result<&mut File> {
        let file = match self.handle.take() {
            Some(file) => file,
            None => self.open_handle(true)?,
        };
        Ok(self.handle.insert(file))
    }

    fn open_handle(&self, append: bool) -> Result<File> {
        if !append {
            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::io("remove", &self.path, e)),
            }
        }

        let operation = if append {
            "open for appending"
        } else {
            "open for writing"
        };
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| Error::io(operation, &self.path, source))?;

        if append {
            file.seek(SeekFrom::End(0))
                .map_err(|source| Error::io(operation, &self.path, source))?;
        }
        Ok(file)
    }
}
