//! Byte-order codec.
//!
//! Stateless conversion between fixed-width primitives and their byte
//! windows. Byte orders are zero-sized tag types ([`LittleEndian`],
//! [`BigEndian`]) for compile-time selection, and [`Endian`] for callers that
//! pick the order per call.
//!
//! Signed integers reuse the unsigned encoding of the same width through a
//! two's-complement cast. Floats reuse it through their IEEE-754 bit pattern,
//! so NaN payloads, signed zeros and infinities survive bit for bit.
//!
//! # Example
//!
//! ```
//! use bitflux_core::order::{BigEndian, ByteOrder, Endian, LittleEndian};
//!
//! assert_eq!(LittleEndian::encode(1000u16), [0xE8, 0x03]);
//! assert_eq!(BigEndian::encode(1000u16), [0x03, 0xE8]);
//! assert_eq!(Endian::Big.decode::<u32>([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
//! ```

use core::fmt;

use snafu::ensure;

use crate::error::{BufferTooSmallSnafu, Result, UnexpectedEofSnafu};

mod private {
    pub trait Sealed {}
}

/// Byte order chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first.
    Big,
}

impl Endian {
    /// Byte order of the compilation target. Informational only.
    pub const NATIVE: Endian = if cfg!(target_endian = "little") {
        Endian::Little
    } else {
        Endian::Big
    };

    /// Encode `value` into its byte window.
    #[inline]
    pub fn encode<T: Primitive>(self, value: T) -> T::Bytes {
        match self {
            Endian::Little => LittleEndian::encode(value),
            Endian::Big => BigEndian::encode(value),
        }
    }

    /// Decode a value from its byte window.
    #[inline]
    pub fn decode<T: Primitive>(self, bytes: T::Bytes) -> T {
        match self {
            Endian::Little => LittleEndian::decode(bytes),
            Endian::Big => BigEndian::decode(bytes),
        }
    }

    /// Encode `value` into the front of `buf`. Returns bytes written.
    #[inline]
    pub fn put<T: Primitive>(self, buf: &mut [u8], value: T) -> Result<usize> {
        match self {
            Endian::Little => LittleEndian::put(buf, value),
            Endian::Big => BigEndian::put(buf, value),
        }
    }

    /// Decode a value from the front of `buf`. Returns the value and bytes consumed.
    #[inline]
    pub fn get<T: Primitive>(self, buf: &[u8]) -> Result<(T, usize)> {
        match self {
            Endian::Little => LittleEndian::get(buf),
            Endian::Big => BigEndian::get(buf),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endian::Little => f.write_str("little-endian"),
            Endian::Big => f.write_str("big-endian"),
        }
    }
}

/// Compile-time byte order.
///
/// Implemented only by [`LittleEndian`] and [`BigEndian`].
pub trait ByteOrder: private::Sealed + Copy + fmt::Debug + Send + Sync + 'static {
    /// Runtime counterpart of this order.
    const ENDIAN: Endian;

    /// Encode `value` into its byte window.
    #[inline]
    fn encode<T: Primitive>(value: T) -> T::Bytes {
        value.to_bytes::<Self>()
    }

    /// Decode a value from its byte window.
    #[inline]
    fn decode<T: Primitive>(bytes: T::Bytes) -> T {
        T::from_bytes::<Self>(bytes)
    }

    /// Encode `value` into the front of `buf`. Returns bytes written.
    fn put<T: Primitive>(buf: &mut [u8], value: T) -> Result<usize> {
        ensure!(
            buf.len() >= T::WIDTH,
            BufferTooSmallSnafu {
                needed: T::WIDTH,
                available: buf.len(),
            }
        );
        buf[..T::WIDTH].copy_from_slice(Self::encode(value).as_ref());
        Ok(T::WIDTH)
    }

    /// Decode a value from the front of `buf`. Returns the value and bytes consumed.
    fn get<T: Primitive>(buf: &[u8]) -> Result<(T, usize)> {
        ensure!(
            buf.len() >= T::WIDTH,
            UnexpectedEofSnafu {
                needed: T::WIDTH,
                available: buf.len(),
            }
        );
        let mut window = T::Bytes::default();
        window.as_mut().copy_from_slice(&buf[..T::WIDTH]);
        Ok((Self::decode(window), T::WIDTH))
    }
}

/// Least-significant byte first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LittleEndian;

/// Most-significant byte first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BigEndian;

impl private::Sealed for LittleEndian {}
impl private::Sealed for BigEndian {}

impl ByteOrder for LittleEndian {
    const ENDIAN: Endian = Endian::Little;
}

impl ByteOrder for BigEndian {
    const ENDIAN: Endian = Endian::Big;
}

/// Fixed-width value with an exact byte encoding.
///
/// Implemented for `u8`, `u16`, `u32`, `u64`, `i8`, `i16`, `i32`, `i64`,
/// `f32` and `f64`.
pub trait Primitive: private::Sealed + Copy + Default {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Stack window holding exactly `WIDTH` bytes.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default + Copy + fmt::Debug;

    /// Encode in byte order `O`.
    fn to_bytes<O: ByteOrder>(self) -> Self::Bytes;

    /// Decode from byte order `O`.
    fn from_bytes<O: ByteOrder>(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_unsigned {
    ($($ty:ty),+) => {
        $(
            impl private::Sealed for $ty {}

            impl Primitive for $ty {
                const WIDTH: usize = core::mem::size_of::<$ty>();
                type Bytes = [u8; core::mem::size_of::<$ty>()];

                #[inline]
                fn to_bytes<O: ByteOrder>(self) -> Self::Bytes {
                    match O::ENDIAN {
                        Endian::Little => self.to_le_bytes(),
                        Endian::Big => self.to_be_bytes(),
                    }
                }

                #[inline]
                fn from_bytes<O: ByteOrder>(bytes: Self::Bytes) -> Self {
                    match O::ENDIAN {
                        Endian::Little => <$ty>::from_le_bytes(bytes),
                        Endian::Big => <$ty>::from_be_bytes(bytes),
                    }
                }
            }
        )+
    };
}

// Two's-complement reinterpretation of the unsigned encoding.
macro_rules! impl_signed {
    ($($ty:ty => $unsigned:ty),+) => {
        $(
            impl private::Sealed for $ty {}

            impl Primitive for $ty {
                const WIDTH: usize = <$unsigned as Primitive>::WIDTH;
                type Bytes = <$unsigned as Primitive>::Bytes;

                #[inline]
                fn to_bytes<O: ByteOrder>(self) -> Self::Bytes {
                    <$unsigned as Primitive>::to_bytes::<O>(self as $unsigned)
                }

                #[inline]
                fn from_bytes<O: ByteOrder>(bytes: Self::Bytes) -> Self {
                    <$unsigned as Primitive>::from_bytes::<O>(bytes) as $ty
                }
            }
        )+
    };
}

// IEEE-754 bit pattern through the unsigned encoding.
macro_rules! impl_float {
    ($($ty:ty => $bits:ty),+) => {
        $(
            impl private::Sealed for $ty {}

            impl Primitive for $ty {
                const WIDTH: usize = <$bits as Primitive>::WIDTH;
                type Bytes = <$bits as Primitive>::Bytes;

                #[inline]
                fn to_bytes<O: ByteOrder>(self) -> Self::Bytes {
                    <$bits as Primitive>::to_bytes::<O>(self.to_bits())
                }

                #[inline]
                fn from_bytes<O: ByteOrder>(bytes: Self::Bytes) -> Self {
                    <$ty>::from_bits(<$bits as Primitive>::from_bytes::<O>(bytes))
                }
            }
        )+
    };
}

impl_unsigned!(u8, u16, u32, u64);
impl_signed!(i8 => u8, i16 => u16, i32 => u32, i64 => u64);
impl_float!(f32 => u32, f64 => u64);
