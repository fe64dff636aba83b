//! Adapters between `std::io` and the byte capabilities.

use std::io::{ErrorKind, Read, Write};

use crate::{BoxError, ByteSink, ByteSource};

/// Byte source over any [`Read`].
///
/// Interrupted reads are retried. Every other `io::Error`, including
/// `UnexpectedEof`, is reported as a source fault; only `Ok(0)` ends the input.
///
/// ```
/// use bitflux_core::{IoSource, LeDecoder};
///
/// let file = std::io::Cursor::new(vec![0x0A, 0x00]);
/// let mut dec = LeDecoder::new(IoSource::new(file));
/// assert_eq!(dec.u16(), 10);
/// ```
#[derive(Debug, Default, Clone)]
pub struct IoSource<R> {
    inner: R,
}

impl<R> IoSource<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Borrow the reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Byte sink over any [`Write`].
///
/// Interrupted writes are retried; `Ok(0)` from the writer surfaces as
/// [`Error::NoProgress`](crate::Error::NoProgress) in the encoder.
#[derive(Debug, Default, Clone)]
pub struct IoSink<W> {
    inner: W,
}

impl<W> IoSink<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Borrow the writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    fn push(&mut self, buf: &[u8]) -> Result<usize, BoxError> {
        loop {
            match self.inner.write(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
