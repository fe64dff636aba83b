//! Core of bitflux: fixed-width binary encoding with sticky errors.
//!
//! [`Encoder`] and [`Decoder`] wrap a byte sink or source and convert
//! primitives in an explicit byte order. The first failure is latched and
//! every later call becomes a no-op, so a batch of operations is checked
//! once at the end instead of after every call.
//!
//! ```
//! use bitflux_core::{BeDecoder, BeEncoder};
//!
//! let mut enc = BeEncoder::buffer();
//! enc.u16(0xCAFE);
//! enc.f64(-0.0);
//! enc.i8(-1);
//! let bytes = enc.into_inner();
//!
//! let mut dec = BeDecoder::new(bytes.as_slice());
//! assert_eq!(dec.u16(), 0xCAFE);
//! assert_eq!(dec.f64().to_bits(), (-0.0f64).to_bits());
//! assert_eq!(dec.i8(), -1);
//! assert_eq!(dec.finish().unwrap(), 11);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod decoder;
mod encoder;
mod error;
#[cfg(feature = "std")]
mod io;
mod latch;
pub mod order;
mod payload;
mod sink;
mod source;

#[cfg(test)]
mod tests;

pub use decoder::{BeDecoder, Decoder, LeDecoder, SKIP_CHUNK};
pub use encoder::{BeEncoder, Encoder, LeEncoder};
pub use error::{BoxError, Error, Result};
#[cfg(feature = "std")]
pub use io::{IoSink, IoSource};
pub use latch::Latch;
pub use order::{BigEndian, ByteOrder, Endian, LittleEndian, Primitive};
pub use payload::{Marshal, Pod, ReadFrom, Unmarshal, WriteTo};
pub use sink::ByteSink;
pub use source::ByteSource;
