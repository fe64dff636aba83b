//! Opaque payload capabilities.
//!
//! The codec treats these values as unstructured byte blobs: it never looks
//! inside what [`Marshal`] produces or what [`Unmarshal`] consumes.

use alloc::vec::Vec;

use snafu::ensure;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::LengthMismatchSnafu;
use crate::{BoxError, ByteSink, ByteSource, Error};

const READ_CHUNK: usize = 256;

/// Serializes itself to an owned byte sequence.
pub trait Marshal {
    /// Failure reported by [`marshal`](Marshal::marshal).
    type Error: core::error::Error + Send + Sync + 'static;

    /// Produce the serialized form.
    fn marshal(&self) -> Result<Vec<u8>, Self::Error>;
}

/// Deserializes itself from a byte sequence.
pub trait Unmarshal {
    /// Failure reported on malformed input.
    type Error: core::error::Error + Send + Sync + 'static;

    /// Replace `self` with the value encoded in `bytes`.
    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Bulk-deserializes by pulling directly from a source.
///
/// The decoder counts the bytes pulled, so implementors only report failure.
pub trait ReadFrom {
    /// Pull as much as this value needs from `source`.
    fn read_from(&mut self, source: &mut dyn ByteSource) -> Result<(), BoxError>;
}

/// Bulk-serializes by pushing directly to a sink.
///
/// The encoder counts the bytes pushed, so implementors only report failure.
pub trait WriteTo {
    /// Push the serialized form into `sink`.
    fn write_to(&self, sink: &mut dyn ByteSink) -> Result<(), BoxError>;
}

/// Reads the source until it is exhausted.
impl ReadFrom for Vec<u8> {
    fn read_from(&mut self, source: &mut dyn ByteSource) -> Result<(), BoxError> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = source.pull(&mut chunk)?;
            if n == 0 {
                return Ok(());
            }
            self.extend_from_slice(&chunk[..n]);
        }
    }
}

impl WriteTo for [u8] {
    fn write_to(&self, sink: &mut dyn ByteSink) -> Result<(), BoxError> {
        sink.push_all(self).map_err(BoxError::from)
    }
}

impl WriteTo for Vec<u8> {
    fn write_to(&self, sink: &mut dyn ByteSink) -> Result<(), BoxError> {
        WriteTo::write_to(self.as_slice(), sink)
    }
}

/// Plain-old-data payload in native memory layout.
///
/// Any `zerocopy` type becomes an opaque payload of exactly
/// `size_of::<T>()` bytes. The layout is the host's, not a portable wire
/// format; use the typed encoder methods for that.
///
/// ```
/// use bitflux_core::{LeEncoder, Pod};
///
/// let mut enc = LeEncoder::buffer();
/// enc.marshal(&Pod([1u16, 2u16]));
/// assert_eq!(enc.position(), 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pod<T>(pub T);

impl<T> Pod<T> {
    /// Unwrap the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: IntoBytes + Immutable> Marshal for Pod<T> {
    type Error = core::convert::Infallible;

    fn marshal(&self) -> Result<Vec<u8>, Self::Error> {
        Ok(self.0.as_bytes().to_vec())
    }
}

impl<T: IntoBytes + Immutable> WriteTo for Pod<T> {
    fn write_to(&self, sink: &mut dyn ByteSink) -> Result<(), BoxError> {
        WriteTo::write_to(self.0.as_bytes(), sink)
    }
}

impl<T: FromBytes + KnownLayout> Unmarshal for Pod<T> {
    type Error = Error;

    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let expected = core::mem::size_of::<T>();
        ensure!(
            bytes.len() == expected,
            LengthMismatchSnafu {
                expected,
                actual: bytes.len(),
            }
        );
        self.0 = T::read_from_bytes(bytes).map_err(|_| Error::LengthMismatch {
            expected,
            actual: bytes.len(),
        })?;
        Ok(())
    }
}

/// Counts bytes moving through a borrowed source or sink.
pub(crate) struct Counted<'a, T: ?Sized> {
    inner: &'a mut T,
    count: usize,
}

impl<'a, T: ?Sized> Counted<'a, T> {
    pub(crate) fn new(inner: &'a mut T) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Counted<'_, S> {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        let n = self.inner.pull(buf)?;
        self.count += n;
        Ok(n)
    }
}

impl<K: ByteSink + ?Sized> ByteSink for Counted<'_, K> {
    fn push(&mut self, buf: &[u8]) -> Result<usize, BoxError> {
        let n = self.inner.push(buf)?;
        self.count += n;
        Ok(n)
    }
}
