//! Sequential decoder with a sticky error.

use alloc::{boxed::Box, vec, vec::Vec};
use core::marker::PhantomData;

use crate::order::{BigEndian, ByteOrder, LittleEndian, Primitive};
use crate::payload::Counted;
use crate::source::{self, ByteSource};
use crate::{Error, Latch, ReadFrom, Unmarshal};

/// Scratch window used by [`Decoder::skip`].
pub const SKIP_CHUNK: usize = 64;

/// Reads primitives from a byte source in byte order `O`.
///
/// The first failure is latched: every later call returns the zero value
/// without touching the source. Check [`error`](Decoder::error) (or call
/// [`finish`](Decoder::finish)) once after a batch of reads, since a
/// returned zero is indistinguishable from decoded zero data.
///
/// # Example
///
/// ```
/// use bitflux_core::LeDecoder;
///
/// let data = [0x0A, 0x00, 0x39, 0x30, 0x00, 0x00];
/// let mut dec = LeDecoder::new(&data[..]);
/// assert_eq!(dec.u16(), 10);
/// assert_eq!(dec.u32(), 12345);
/// assert_eq!(dec.u8(), 0); // past the end
/// assert!(dec.error().unwrap().is_eof());
/// assert_eq!(dec.position(), 6);
/// ```
#[derive(Debug)]
pub struct Decoder<S, O> {
    source: S,
    latch: Latch,
    _order: PhantomData<O>,
}

/// Little-endian decoder.
pub type LeDecoder<S> = Decoder<S, LittleEndian>;

/// Big-endian decoder.
pub type BeDecoder<S> = Decoder<S, BigEndian>;

impl<S, O: ByteOrder> Decoder<S, O> {
    /// Create a decoder over `source`.
    ///
    /// Pass `&mut source` to keep ownership with the caller.
    pub fn new(source: S) -> Self {
        Self {
            source,
            latch: Latch::new("decoder"),
            _order: PhantomData,
        }
    }

    /// Bytes consumed so far, including partial reads before a failure.
    #[inline]
    pub fn position(&self) -> u64 {
        self.latch.position()
    }

    /// First error encountered, if any.
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.latch.error()
    }

    /// Returns `true` while no error is latched.
    #[inline]
    pub fn is_ok(&self) -> bool {
        !self.latch.is_latched()
    }

    /// Bytes consumed, or the latched error.
    #[inline]
    pub fn result(&self) -> Result<u64, &Error> {
        self.latch.result()
    }

    /// Consume the decoder, yielding bytes consumed or the latched error.
    #[inline]
    pub fn finish(self) -> Result<u64, Error> {
        self.latch.into_result()
    }

    /// Borrow the source.
    #[inline]
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the source.
    #[inline]
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwrap the source.
    #[inline]
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource, O: ByteOrder> Decoder<S, O> {
    // Fill `buf` from the source. False when latched, before or during.
    fn pull(&mut self, buf: &mut [u8]) -> bool {
        if self.latch.is_latched() {
            return false;
        }
        let mut filled = 0;
        let result = source::fill(&mut self.source, buf, &mut filled);
        self.latch.advance(filled);
        match result {
            Ok(()) => true,
            Err(err) => {
                self.latch.set(err);
                false
            }
        }
    }

    /// Decode one primitive of any supported type.
    #[inline]
    pub fn read_value<T: Primitive>(&mut self) -> T {
        let mut window = T::Bytes::default();
        if self.pull(window.as_mut()) {
            O::decode(window)
        } else {
            T::default()
        }
    }

    /// Decode a `u8`.
    #[inline]
    pub fn u8(&mut self) -> u8 {
        self.read_value()
    }

    /// Decode a `u16`.
    #[inline]
    pub fn u16(&mut self) -> u16 {
        self.read_value()
    }

    /// Decode a `u32`.
    #[inline]
    pub fn u32(&mut self) -> u32 {
        self.read_value()
    }

    /// Decode a `u64`.
    #[inline]
    pub fn u64(&mut self) -> u64 {
        self.read_value()
    }

    /// Decode an `i8`.
    #[inline]
    pub fn i8(&mut self) -> i8 {
        self.read_value()
    }

    /// Decode an `i16`.
    #[inline]
    pub fn i16(&mut self) -> i16 {
        self.read_value()
    }

    /// Decode an `i32`.
    #[inline]
    pub fn i32(&mut self) -> i32 {
        self.read_value()
    }

    /// Decode an `i64`.
    #[inline]
    pub fn i64(&mut self) -> i64 {
        self.read_value()
    }

    /// Decode an `f32` from its IEEE-754 bits.
    #[inline]
    pub fn f32(&mut self) -> f32 {
        self.read_value()
    }

    /// Decode an `f64` from its IEEE-754 bits.
    #[inline]
    pub fn f64(&mut self) -> f64 {
        self.read_value()
    }

    /// Read exactly `n` bytes.
    ///
    /// Returns an empty vector for `n == 0`, when already latched, or when
    /// the read fails.
    pub fn bytes(&mut self, n: usize) -> Vec<u8> {
        if n == 0 || self.latch.is_latched() {
            return Vec::new();
        }
        let mut buf = vec![0u8; n];
        if self.pull(&mut buf) {
            buf
        } else {
            Vec::new()
        }
    }

    /// Discard `n` bytes through a fixed scratch window.
    pub fn skip(&mut self, mut n: usize) {
        let mut scratch = [0u8; SKIP_CHUNK];
        while n > 0 {
            let k = n.min(SKIP_CHUNK);
            if !self.pull(&mut scratch[..k]) {
                return;
            }
            n -= k;
        }
    }

    /// Let `target` pull what it needs straight from the source.
    ///
    /// Bytes it pulls count towards [`position`](Decoder::position); its
    /// failure is latched as [`Error::Payload`].
    pub fn read_into<T: ReadFrom + ?Sized>(&mut self, target: &mut T) {
        if self.latch.is_latched() {
            return;
        }
        let mut counted = Counted::new(&mut self.source);
        let result = target.read_from(&mut counted);
        let n = counted.count();
        self.latch.advance(n);

        #[cfg(feature = "tracing")]
        tracing::trace!(bytes = n, "decoder bulk read");

        if let Err(source) = result {
            self.latch.set(Error::Payload { source });
        }
    }

    /// Read `n` bytes and hand them to `target` to deserialize.
    ///
    /// If the read fails, `target` is left untouched.
    pub fn unmarshal<T: Unmarshal + ?Sized>(&mut self, target: &mut T, n: usize) {
        if self.latch.is_latched() {
            return;
        }
        let bytes = self.bytes(n);
        if self.latch.is_latched() {
            return;
        }
        if let Err(err) = target.unmarshal(&bytes) {
            self.latch.set(Error::Unmarshal {
                source: Box::new(err),
            });
        }
    }
}
