//! Fixed-width binary encoding with sticky-error encoders and decoders.
//!
//! Every primitive is written and read in an explicit byte order. The first
//! failure is latched and all later calls become no-ops, so a batch of
//! operations is checked once at the end.
//!
//! # Streaming
//!
//! ```
//! use bitflux::{LeDecoder, LeEncoder};
//!
//! let mut enc = LeEncoder::buffer();
//! enc.u16(10);
//! enc.u32(12345);
//! let bytes = enc.into_inner();
//! assert_eq!(bytes, [0x0A, 0x00, 0x39, 0x30, 0x00, 0x00]);
//!
//! let mut dec = LeDecoder::new(bytes.as_slice());
//! assert_eq!(dec.u16(), 10);
//! assert_eq!(dec.u32(), 12345);
//! assert!(dec.is_ok());
//! ```
//!
//! # In-memory buffer
//!
//! ```
//! use bitflux::{Buffer, Endian};
//!
//! let mut buf = Buffer::new();
//! buf.put_u16(Endian::Little, 10);
//! buf.put_u32(Endian::Big, 12345);
//! assert_eq!(buf.as_bytes(), [0x0A, 0x00, 0x00, 0x00, 0x30, 0x39]);
//!
//! assert_eq!(buf.get_u16(Endian::Little), 10);
//! assert_eq!(buf.get_u32(Endian::Big), 12345);
//! assert!(buf.is_empty());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod buffer;


pub use bitflux_core::order;

// Codec re-exports
pub use bitflux_core::{
    BeDecoder, BeEncoder, BigEndian, BoxError, ByteOrder, ByteSink, ByteSource, Decoder, Encoder,
    Endian, Error, Latch, LeDecoder, LeEncoder, LittleEndian, Marshal, Pod, Primitive, ReadFrom,
    Result, SKIP_CHUNK, Unmarshal, WriteTo,
};

#[cfg(feature = "std")]
pub use bitflux_core::{IoSink, IoSource};

// Facade re-exports
pub use buffer::Buffer;
