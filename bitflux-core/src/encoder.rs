//! Sequential encoder with a sticky error.

use alloc::{boxed::Box, vec::Vec};
use core::marker::PhantomData;

use crate::order::{BigEndian, ByteOrder, LittleEndian, Primitive};
use crate::payload::Counted;
use crate::sink::{self, ByteSink};
use crate::{Error, Latch, Marshal, WriteTo};

/// Writes primitives to a byte sink in byte order `O`.
///
/// The first failure is latched: every later call is a silent no-op that
/// leaves the sink and [`position`](Encoder::position) untouched.
///
/// # Example
///
/// ```
/// use bitflux_core::LeEncoder;
///
/// let mut enc = LeEncoder::buffer();
/// enc.u16(10);
/// enc.u32(12345);
/// assert_eq!(enc.position(), 6);
/// assert_eq!(enc.into_inner(), [0x0A, 0x00, 0x39, 0x30, 0x00, 0x00]);
/// ```
#[derive(Debug)]
pub struct Encoder<K, O> {
    sink: K,
    latch: Latch,
    _order: PhantomData<O>,
}

/// Little-endian encoder.
pub type LeEncoder<K> = Encoder<K, LittleEndian>;

/// Big-endian encoder.
pub type BeEncoder<K> = Encoder<K, BigEndian>;

impl<K, O: ByteOrder> Encoder<K, O> {
    /// Create an encoder over `sink`.
    ///
    /// Pass `&mut sink` to keep ownership with the caller.
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            latch: Latch::new("encoder"),
            _order: PhantomData,
        }
    }

    /// Bytes accepted by the sink so far, including partial writes before a failure.
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

    /// Bytes written, or the latched error.
    #[inline]
    pub fn result(&self) -> Result<u64, &Error> {
        self.latch.result()
    }

    /// Consume the encoder, yielding bytes written or the latched error.
    #[inline]
    pub fn finish(self) -> Result<u64, Error> {
        self.latch.into_result()
    }

    /// Borrow the sink.
    #[inline]
    pub fn get_ref(&self) -> &K {
        &self.sink
    }

    /// Mutably borrow the sink.
    #[inline]
    pub fn get_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Unwrap the sink.
    #[inline]
    pub fn into_inner(self) -> K {
        self.sink
    }
}

impl<O: ByteOrder> Encoder<Vec<u8>, O> {
    /// Encoder over a fresh in-memory buffer.
    pub fn buffer() -> Self {
        Self::new(Vec::new())
    }

    /// Encoder over an in-memory buffer with `capacity` bytes reserved.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    /// Encoder that appends after `existing`.
    pub fn from_bytes(existing: Vec<u8>) -> Self {
        Self::new(existing)
    }
}

impl<K: ByteSink, O: ByteOrder> Encoder<K, O> {
    fn push(&mut self, buf: &[u8]) {
        if self.latch.is_latched() || buf.is_empty() {
            return;
        }
        let mut written = 0;
        let result = sink::drain(&mut self.sink, buf, &mut written);
        self.latch.advance(written);
        if let Err(err) = result {
            self.latch.set(err);
        }
    }

    /// Encode one primitive of any supported type.
    #[inline]
    pub fn write_value<T: Primitive>(&mut self, value: T) {
        let window = O::encode(value);
        self.push(window.as_ref());
    }

    /// Encode a `u8`.
    #[inline]
    pub fn u8(&mut self, v: u8) {
        self.write_value(v);
    }

    /// Encode a `u16`.
    #[inline]
    pub fn u16(&mut self, v: u16) {
        self.write_value(v);
    }

    /// Encode a `u32`.
    #[inline]
    pub fn u32(&mut self, v: u32) {
        self.write_value(v);
    }

    /// Encode a `u64`.
    #[inline]
    pub fn u64(&mut self, v: u64) {
        self.write_value(v);
    }

    /// Encode an `i8`.
    #[inline]
    pub fn i8(&mut self, v: i8) {
        self.write_value(v);
    }

    /// Encode an `i16`.
    #[inline]
    pub fn i16(&mut self, v: i16) {
        self.write_value(v);
    }

    /// Encode an `i32`.
    #[inline]
    pub fn i32(&mut self, v: i32) {
        self.write_value(v);
    }

    /// Encode an `i64`.
    #[inline]
    pub fn i64(&mut self, v: i64) {
        self.write_value(v);
    }

    /// Encode an `f32` as its IEEE-754 bits.
    #[inline]
    pub fn f32(&mut self, v: f32) {
        self.write_value(v);
    }

    /// Encode an `f64` as its IEEE-754 bits.
    #[inline]
    pub fn f64(&mut self, v: f64) {
        self.write_value(v);
    }

    /// Write raw bytes. No framing, no length prefix.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        self.push(bytes);
    }

    /// Let `value` push its serialized form straight into the sink.
    ///
    /// Bytes it pushes count towards [`position`](Encoder::position); its
    /// failure is latched as [`Error::Payload`].
    pub fn write_from<T: WriteTo + ?Sized>(&mut self, value: &T) {
        if self.latch.is_latched() {
            return;
        }
        let mut counted = Counted::new(&mut self.sink);
        let result = value.write_to(&mut counted);
        let n = counted.count();
        self.latch.advance(n);

        #[cfg(feature = "tracing")]
        tracing::trace!(bytes = n, "encoder bulk write");

        if let Err(source) = result {
            self.latch.set(Error::Payload { source });
        }
    }

    /// Serialize `value` and write the result.
    ///
    /// If serialization fails nothing reaches the sink.
    pub fn marshal<T: Marshal + ?Sized>(&mut self, value: &T) {
        if self.latch.is_latched() {
            return;
        }
        match value.marshal() {
            Ok(bytes) => self.push(&bytes),
            Err(err) => self.latch.set(Error::Marshal {
                source: Box::new(err),
            }),
        }
    }
}
