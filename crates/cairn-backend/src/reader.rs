//! Bounded readers over closable byte sources.
//!
//! Backends frequently hand out a handle to a larger resource (a whole file,
//! a connection body) when the caller only wants `n` bytes of it.
//! [`BlobReader`] limits reads to `n` bytes and releases the resource as soon
//! as the limited stream reports end-of-data, so callers that read to the end
//! never have to close it themselves.

use std::fs::File;
use std::io::{self, Cursor, Read, Take};

use tracing::warn;

use crate::error::BackendError;

/// A byte source with an explicit release step.
pub trait ReadClose: Read {
    /// Release the resource. Called at most once by [`BlobReader`].
    fn close(&mut self) -> io::Result<()>;
}

impl ReadClose for File {
    // The descriptor itself is released when the value is dropped.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: AsRef<[u8]>> ReadClose for Cursor<T> {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<R: ReadClose + ?Sized> ReadClose for Box<R> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Reads at most a fixed number of bytes from an owned source, releasing the
/// source exactly once.
///
/// The source is released when:
/// - a read observes end-of-data (after the limit, or earlier if the source
///   runs dry),
/// - [`BlobReader::close`] is called, or
/// - the reader is dropped.
///
/// Reading after release fails with an error for which
/// [`is_closed_access`] returns `true`; it never reports a silent `Ok(0)`.
#[derive(Debug)]
pub struct BlobReader<R: ReadClose> {
    inner: Option<Take<R>>,
}

impl<R: ReadClose> BlobReader<R> {
    /// Wrap `source`, limiting reads to `limit` bytes.
    pub fn new(source: R, limit: u64) -> Self {
        Self {
            inner: Some(source.take(limit)),
        }
    }

    /// Whether the source has been released.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Bytes left before the limit is reached. Zero once released.
    pub fn remaining(&self) -> u64 {
        self.inner.as_ref().map_or(0, Take::limit)
    }

    /// Release the source. Only the releasing call can report a close error;
    /// later calls are no-ops.
    pub fn close(&mut self) -> io::Result<()> {
        match self.inner.take() {
            Some(limited) => limited.into_inner().close(),
            None => Ok(()),
        }
    }
}

impl<R: ReadClose> Read for BlobReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limited = self.inner.as_mut().ok_or_else(closed_access)?;
        if buf.is_empty() {
            return Ok(0);
        }
        let n = limited.read(buf)?;
        if n == 0 {
            self.close()?;
        }
        Ok(n)
    }
}

impl<R: ReadClose> Drop for BlobReader<R> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close abandoned blob reader");
        }
    }
}

/// Shorthand for [`BlobReader::new`].
pub fn limit_reader<R: ReadClose>(source: R, limit: u64) -> BlobReader<R> {
    BlobReader::new(source, limit)
}

/// Returns `true` if `err` came from reading a released [`BlobReader`].
pub fn is_closed_access(err: &io::Error) -> bool {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<BackendError>())
        .is_some_and(|inner| matches!(inner, BackendError::ClosedResourceAccess))
}

fn closed_access() -> io::Error {
    io::Error::other(BackendError::ClosedResourceAccess)
}
