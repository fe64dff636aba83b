//! In-memory buffer that reads and writes with a per-call byte order.

use alloc::{boxed::Box, vec::Vec};

use bitflux_core::{
    BoxError, ByteSink, ByteSource, Endian, Error, Latch, Marshal, Primitive, Unmarshal,
};

const FILL_CHUNK: usize = 256;

/// Growable byte container with a read cursor.
///
/// Writes append at the end, reads consume from the cursor. Unlike
/// [`Encoder`](crate::Encoder) and [`Decoder`](crate::Decoder) the byte
/// order is chosen on every call. The first failure is latched and turns
/// every later call, in either direction, into a no-op.
///
/// ```
/// use bitflux::{Buffer, Endian};
///
/// let mut buf = Buffer::from_bytes(vec![0x01, 0x02, 0x03]);
/// assert_eq!(buf.get_u16(Endian::Big), 0x0102);
/// assert_eq!(buf.get_u32(Endian::Big), 0); // one byte left
/// assert!(buf.error().unwrap().is_eof());
///
/// buf.put_u8(0xFF); // latched, ignored
/// assert_eq!(buf.as_bytes(), [0x03]);
/// ```
#[derive(Debug)]
pub struct Buffer {
    data: Vec<u8>,
    cursor: usize,
    latch: Latch,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self::from_parts(Vec::new())
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(Vec::with_capacity(capacity))
    }

    /// Create a buffer whose unread bytes are `data`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::from_parts(data)
    }

    const fn from_parts(data: Vec<u8>) -> Self {
        Self {
            data,
            cursor: 0,
            latch: Latch::new("buffer"),
        }
    }

    /// The latched error, if any.
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.latch.error()
    }

    /// Returns `true` while no error has been latched.
    #[inline]
    pub fn is_ok(&self) -> bool {
        !self.latch.is_latched()
    }

    /// Bytes moved in and out of the buffer so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.latch.position()
    }

    /// Unread bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[self.cursor..]
    }

    /// Number of unread bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Returns `true` when nothing is left to read.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes the backing storage can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Consume the buffer, returning the unread bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.drain(..self.cursor);
        self.data
    }

    // Mark `n` unread bytes as read. Storage is reset once everything is read.
    fn consume(&mut self, n: usize) {
        self.cursor += n;
        self.latch.advance(n);
        if self.cursor == self.data.len() {
            self.data.clear();
            self.cursor = 0;
        }
    }

    // Before appending, drop the read prefix once it outweighs the unread bytes.
    fn reclaim(&mut self) {
        if self.cursor > 0 && self.cursor >= self.len() {
            self.data.drain(..self.cursor);
            self.cursor = 0;
        }
    }

    // Copy up to `buf.len()` unread bytes out.
    fn read_unread(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.len());
        buf[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
        self.consume(n);
        n
    }

    // Writers

    /// Append `value` in byte order `endian`.
    pub fn put<T: Primitive>(&mut self, endian: Endian, value: T) {
        if self.latch.is_latched() {
            return;
        }
        self.reclaim();
        self.data.extend_from_slice(endian.encode(value).as_ref());
        self.latch.advance(T::WIDTH);
    }

    /// Append a `u8`.
    #[inline]
    pub fn put_u8(&mut self, v: u8) {
        self.put(Endian::Little, v);
    }

    /// Append an `i8`.
    #[inline]
    pub fn put_i8(&mut self, v: i8) {
        self.put(Endian::Little, v);
    }

    /// Append a `u16`.
    #[inline]
    pub fn put_u16(&mut self, endian: Endian, v: u16) {
        self.put(endian, v);
    }

    /// Append an `i16`.
    #[inline]
    pub fn put_i16(&mut self, endian: Endian, v: i16) {
        self.put(endian, v);
    }

    /// Append a `u32`.
    #[inline]
    pub fn put_u32(&mut self, endian: Endian, v: u32) {
        self.put(endian, v);
    }

    /// Append an `i32`.
    #[inline]
    pub fn put_i32(&mut self, endian: Endian, v: i32) {
        self.put(endian, v);
    }

    /// Append a `u64`.
    #[inline]
    pub fn put_u64(&mut self, endian: Endian, v: u64) {
        self.put(endian, v);
    }

    /// Append an `i64`.
    #[inline]
    pub fn put_i64(&mut self, endian: Endian, v: i64) {
        self.put(endian, v);
    }

    /// Append an `f32` by its IEEE-754 bit pattern.
    #[inline]
    pub fn put_f32(&mut self, endian: Endian, v: f32) {
        self.put(endian, v);
    }

    /// Append an `f64` by its IEEE-754 bit pattern.
    #[inline]
    pub fn put_f64(&mut self, endian: Endian, v: f64) {
        self.put(endian, v);
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        if self.latch.is_latched() {
            return;
        }
        self.reclaim();
        self.data.extend_from_slice(bytes);
        self.latch.advance(bytes.len());
    }

    /// Append the UTF-8 bytes of `s`, without a length prefix or terminator.
    #[inline]
    pub fn put_str(&mut self, s: &str) {
        self.put_bytes(s.as_bytes());
    }

    /// Serialize `value` and append the result.
    ///
    /// If serialization fails nothing is appended.
    pub fn put_marshal<T: Marshal + ?Sized>(&mut self, value: &T) {
        if self.latch.is_latched() {
            return;
        }
        match value.marshal() {
            Ok(bytes) => self.put_bytes(&bytes),
            Err(err) => self.latch.set(Error::Marshal {
                source: Box::new(err),
            }),
        }
    }

    // Readers

    /// Read a value in byte order `endian`.
    ///
    /// Returns the zero value once latched. A short read latches
    /// [`Error::UnexpectedEof`] and leaves the unread bytes in place.
    pub fn get<T: Primitive>(&mut self, endian: Endian) -> T {
        if self.latch.is_latched() {
            return T::default();
        }
        match endian.get::<T>(self.as_bytes()) {
            Ok((value, n)) => {
                self.consume(n);
                value
            }
            Err(err) => {
                self.latch.set(err);
                T::default()
            }
        }
    }

    /// Read a `u8`.
    #[inline]
    pub fn get_u8(&mut self) -> u8 {
        self.get(Endian::Little)
    }

    /// Read an `i8`.
    #[inline]
    pub fn get_i8(&mut self) -> i8 {
        self.get(Endian::Little)
    }

    /// Read a `u16`.
    #[inline]
    pub fn get_u16(&mut self, endian: Endian) -> u16 {
        self.get(endian)
    }

    /// Read an `i16`.
    #[inline]
    pub fn get_i16(&mut self, endian: Endian) -> i16 {
        self.get(endian)
    }

    /// Read a `u32`.
    #[inline]
    pub fn get_u32(&mut self, endian: Endian) -> u32 {
        self.get(endian)
    }

    /// Read an `i32`.
    #[inline]
    pub fn get_i32(&mut self, endian: Endian) -> i32 {
        self.get(endian)
    }

    /// Read a `u64`.
    #[inline]
    pub fn get_u64(&mut self, endian: Endian) -> u64 {
        self.get(endian)
    }

    /// Read an `i64`.
    #[inline]
    pub fn get_i64(&mut self, endian: Endian) -> i64 {
        self.get(endian)
    }

    /// Read an `f32` from its IEEE-754 bit pattern.
    #[inline]
    pub fn get_f32(&mut self, endian: Endian) -> f32 {
        self.get(endian)
    }

    /// Read an `f64` from its IEEE-754 bit pattern.
    #[inline]
    pub fn get_f64(&mut self, endian: Endian) -> f64 {
        self.get(endian)
    }

    /// Read exactly `n` bytes.
    ///
    /// Returns an empty vector for `n == 0`, when already latched, or when
    /// fewer than `n` bytes are left.
    pub fn get_bytes(&mut self, n: usize) -> Vec<u8> {
        if n == 0 || self.latch.is_latched() {
            return Vec::new();
        }
        let available = self.len();
        if available < n {
            self.latch.set(Error::UnexpectedEof {
                needed: n,
                available,
            });
            return Vec::new();
        }
        let out = self.data[self.cursor..self.cursor + n].to_vec();
        self.consume(n);
        out
    }

    /// Read `n` bytes and hand them to `target` to deserialize.
    ///
    /// If the read fails, `target` is left untouched.
    pub fn get_unmarshal<T: Unmarshal + ?Sized>(&mut self, target: &mut T, n: usize) {
        let bytes = self.get_bytes(n);
        if self.latch.is_latched() {
            return;
        }
        if let Err(err) = target.unmarshal(&bytes) {
            self.latch.set(Error::Unmarshal {
                source: Box::new(err),
            });
        }
    }

    // Transfers

    /// Append everything `source` yields until it reports end of input.
    ///
    /// A clean end is not a failure; a source fault latches
    /// [`Error::Source`]. Returns the bytes appended by this call.
    pub fn fill_from<S: ByteSource + ?Sized>(&mut self, source: &mut S) -> usize {
        if self.latch.is_latched() {
            return 0;
        }
        self.reclaim();
        let mut chunk = [0u8; FILL_CHUNK];
        let mut total = 0;
        loop {
            match source.pull(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    let n = n.min(FILL_CHUNK);
                    self.data.extend_from_slice(&chunk[..n]);
                    total += n;
                }
                Err(source) => {
                    self.latch.set(Error::Source { source });
                    break;
                }
            }
        }
        self.latch.advance(total);
        total
    }

    /// Push the unread bytes into `sink`, consuming what it accepts.
    ///
    /// Latches [`Error::Sink`] on a sink fault and [`Error::NoProgress`]
    /// when the sink stalls. Returns the bytes consumed by this call.
    pub fn drain_into<K: ByteSink + ?Sized>(&mut self, sink: &mut K) -> usize {
        if self.latch.is_latched() {
            return 0;
        }
        let mut moved = 0;
        while !self.is_empty() {
            let remaining = self.len();
            match sink.push(self.as_bytes()) {
                Ok(0) => {
                    self.latch.set(Error::NoProgress { remaining });
                    break;
                }
                Ok(n) => {
                    let n = n.min(remaining);
                    self.consume(n);
                    moved += n;
                }
                Err(source) => {
                    self.latch.set(Error::Sink { source });
                    break;
                }
            }
        }
        moved
    }
}

fn latched_error(err: &Error) -> BoxError {
    BoxError::from(alloc::format!("buffer latched: {err}"))
}

/// Pulls the unread bytes; `Ok(0)` once they run out.
impl ByteSource for Buffer {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        if let Some(err) = self.latch.error() {
            return Err(latched_error(err));
        }
        Ok(self.read_unread(buf))
    }
}

/// Appends everything pushed, like [`put_bytes`](Buffer::put_bytes).
impl ByteSink for Buffer {
    fn push(&mut self, buf: &[u8]) -> Result<usize, BoxError> {
        if let Some(err) = self.latch.error() {
            return Err(latched_error(err));
        }
        self.put_bytes(buf);
        Ok(buf.len())
    }
}

#[cfg(feature = "std")]
fn latched_io_error(err: &Error) -> std::io::Error {
    std::io::Error::other(alloc::format!("buffer latched: {err}"))
}

/// Reads consume unread bytes; `Ok(0)` at the end as usual for readers.
#[cfg(feature = "std")]
impl std::io::Read for Buffer {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if let Some(err) = self.latch.error() {
            return Err(latched_io_error(err));
        }
        Ok(self.read_unread(buf))
    }
}

#[cfg(feature = "std")]
impl std::io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Some(err) = self.latch.error() {
            return Err(latched_io_error(err));
        }
        self.put_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.latch.error() {
            Some(err) => Err(latched_io_error(err)),
            None => Ok(()),
        }
    }
}
