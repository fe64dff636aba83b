//! Byte sink capability.

use alloc::vec::Vec;

use crate::error::{BoxError, Error, NoProgressSnafu, Result};

/// Accepts bytes from an [`Encoder`](crate::Encoder).
///
/// Implemented for `Vec<u8>` and for `&mut K` of any sink. With the `std`
/// feature, wrap a [`std::io::Write`] in [`IoSink`](crate::IoSink).
pub trait ByteSink {
    /// Offer `buf` and return how many bytes were accepted.
    ///
    /// Accepting fewer than offered is allowed; the encoder retries the rest.
    fn push(&mut self, buf: &[u8]) -> core::result::Result<usize, BoxError>;

    /// Push all of `buf`, looping over partial writes.
    ///
    /// A push that accepts nothing without an error fails with
    /// [`Error::NoProgress`] instead of spinning.
    fn push_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;
        drain(self, buf, &mut written)
    }
}

/// Push-fully loop. `written` counts accepted bytes, including on failure.
pub(crate) fn drain<K: ByteSink + ?Sized>(
    sink: &mut K,
    buf: &[u8],
    written: &mut usize,
) -> Result<()> {
    while *written < buf.len() {
        match sink.push(&buf[*written..]) {
            Ok(0) => {
                return NoProgressSnafu {
                    remaining: buf.len() - *written,
                }
                .fail();
            }
            Ok(n) => *written += n.min(buf.len() - *written),
            Err(source) => return Err(Error::Sink { source }),
        }
    }
    Ok(())
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn push(&mut self, buf: &[u8]) -> core::result::Result<usize, BoxError> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }
}

impl<K: ByteSink + ?Sized> ByteSink for &mut K {
    #[inline]
    fn push(&mut self, buf: &[u8]) -> core::result::Result<usize, BoxError> {
        (**self).push(buf)
    }
}
