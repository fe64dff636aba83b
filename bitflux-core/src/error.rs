//! Error types for the sequential codec.

use alloc::boxed::Box;

use snafu::Snafu;

/// Boxed failure reported by a byte source, byte sink or payload capability.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

/// First failure observed by an encoder, decoder or buffer.
///
/// End of input is kept apart from every other fault so callers can tell a
/// clean stream end from a broken one.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    /// The source ran dry before the requested bytes were supplied.
    #[snafu(display(
        "unexpected end of input: needed {needed} bytes, only {available} available"
    ))]
    UnexpectedEof {
        /// Bytes needed.
        needed: usize,
        /// Bytes obtained before the end.
        available: usize,
    },

    /// Output slice too small for the encoded value.
    #[snafu(display("buffer too small: needed {needed} bytes, only {available} available"))]
    BufferTooSmall {
        /// Bytes needed.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// The byte source reported a fault.
    #[snafu(display("byte source failed: {source}"))]
    Source {
        /// Underlying fault.
        source: BoxError,
    },

    /// The byte sink reported a fault.
    #[snafu(display("byte sink failed: {source}"))]
    Sink {
        /// Underlying fault.
        source: BoxError,
    },

    /// The sink accepted nothing and reported no error.
    #[snafu(display("byte sink made no progress with {remaining} bytes left to write"))]
    NoProgress {
        /// Bytes still waiting to be written.
        remaining: usize,
    },

    /// A value failed to serialize itself.
    #[snafu(display("marshal failed: {source}"))]
    Marshal {
        /// Underlying fault.
        source: BoxError,
    },

    /// A value rejected the bytes it was asked to deserialize.
    #[snafu(display("unmarshal failed: {source}"))]
    Unmarshal {
        /// Underlying fault.
        source: BoxError,
    },

    /// A bulk payload transfer failed.
    #[snafu(display("payload transfer failed: {source}"))]
    Payload {
        /// Underlying fault.
        source: BoxError,
    },

    /// Opaque payload bytes do not match the size of the target.
    #[snafu(display("payload length mismatch: expected {expected} bytes, got {actual}"))]
    LengthMismatch {
        /// Size of the target.
        expected: usize,
        /// Size of the payload.
        actual: usize,
    },
}

impl Error {
    /// Returns `true` for a clean end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. })
    }

    /// Returns `true` for any failure other than a clean end of input.
    #[inline]
    pub fn is_fault(&self) -> bool {
        !self.is_eof()
    }
}

/// Result type for codec operations.
pub type Result<T> = core::result::Result<T, Error>;
