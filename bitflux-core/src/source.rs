//! Byte source capability.

use crate::error::{BoxError, Error, Result, UnexpectedEofSnafu};

/// Supplies bytes to a [`Decoder`](crate::Decoder).
///
/// Implemented for `&[u8]` and for `&mut S` of any source. With the `std`
/// feature, wrap a [`std::io::Read`] in [`IoSource`](crate::IoSource).
pub trait ByteSource {
    /// Pull up to `buf.len()` bytes into `buf` and return how many arrived.
    ///
    /// `Ok(0)` for a non-empty `buf` means the source is exhausted.
    fn pull(&mut self, buf: &mut [u8]) -> core::result::Result<usize, BoxError>;

    /// Fill `buf` completely, retrying short pulls.
    ///
    /// Fails with [`Error::UnexpectedEof`] when the source ends early and
    /// with [`Error::Source`] on any other fault.
    fn pull_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        fill(self, buf, &mut filled)
    }
}

/// Fill-fully loop. `filled` counts bytes obtained, including on failure.
pub(crate) fn fill<S: ByteSource + ?Sized>(
    source: &mut S,
    buf: &mut [u8],
    filled: &mut usize,
) -> Result<()> {
    while *filled < buf.len() {
        match source.pull(&mut buf[*filled..]) {
            Ok(0) => {
                return UnexpectedEofSnafu {
                    needed: buf.len(),
                    available: *filled,
                }
                .fail();
            }
            Ok(n) => *filled += n.min(buf.len() - *filled),
            Err(source) => return Err(Error::Source { source }),
        }
    }
    Ok(())
}

impl ByteSource for &[u8] {
    #[inline]
    fn pull(&mut self, buf: &mut [u8]) -> core::result::Result<usize, BoxError> {
        let n = buf.len().min(self.len());
        let (head, tail) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = tail;
        Ok(n)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn pull(&mut self, buf: &mut [u8]) -> core::result::Result<usize, BoxError> {
        (**self).pull(buf)
    }
}
