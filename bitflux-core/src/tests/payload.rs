use alloc::{boxed::Box, string::String, vec, vec::Vec};
use core::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::{Broken, FaultySink, Trickle};
use crate::{
    BeDecoder, BoxError, ByteSink, ByteSource, Error, LeDecoder, LeEncoder, Marshal, Pod,
    ReadFrom, Unmarshal, WriteTo,
};

/// Length-prefixed string, the shape a caller-defined payload usually has.
#[derive(Debug, Default, PartialEq)]
struct Label(String);

#[derive(Debug)]
struct BadLabel;

impl fmt::Display for BadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("malformed label")
    }
}

impl core::error::Error for BadLabel {}

impl Marshal for Label {
    type Error = BadLabel;

    fn marshal(&self) -> Result<Vec<u8>, BadLabel> {
        if self.0.len() > u8::MAX as usize {
            return Err(BadLabel);
        }
        let mut out = vec![self.0.len() as u8];
        out.extend_from_slice(self.0.as_bytes());
        Ok(out)
    }
}

impl Unmarshal for Label {
    type Error = BadLabel;

    fn unmarshal(&mut self, bytes: &[u8]) -> Result<(), BadLabel> {
        let (&len, rest) = bytes.split_first().ok_or(BadLabel)?;
        if rest.len() != len as usize {
            return Err(BadLabel);
        }
        let text = core::str::from_utf8(rest).map_err(|_| BadLabel)?;
        self.0 = String::from(text);
        Ok(())
    }
}

#[test]
fn marshal_then_unmarshal() {
    let mut enc = LeEncoder::buffer();
    enc.u8(0x7F);
    enc.marshal(&Label(String::from("hello")));
    enc.u16(0xBEEF);
    assert_eq!(enc.position(), 1 + 6 + 2);
    let bytes = enc.into_inner();

    let mut dec = LeDecoder::new(bytes.as_slice());
    assert_eq!(dec.u8(), 0x7F);
    let mut label = Label::default();
    dec.unmarshal(&mut label, 6);
    assert_eq!(label, Label(String::from("hello")));
    assert_eq!(dec.u16(), 0xBEEF);
    assert_eq!(dec.finish().unwrap(), 9);
}

#[test]
fn marshal_failure_writes_nothing() {
    let mut enc = LeEncoder::buffer();
    enc.u8(1);
    enc.marshal(&Label("x".repeat(300)));
    enc.u8(2);
    assert!(matches!(enc.error(), Some(Error::Marshal { .. })));
    assert_eq!(enc.position(), 1);
    assert_eq!(enc.into_inner(), [1]);
}

#[test]
fn unmarshal_failure_latches() {
    let data = [3, b'a', b'b'];
    let mut dec = LeDecoder::new(&data[..]);
    let mut label = Label::default();
    dec.unmarshal(&mut label, 2);
    assert!(matches!(dec.error(), Some(Error::Unmarshal { .. })));
    assert_eq!(dec.position(), 2);
    assert_eq!(label, Label::default());
}

#[test]
fn unmarshal_skipped_when_read_fails() {
    struct Spy(bool);

    impl Unmarshal for Spy {
        type Error = BadLabel;

        fn unmarshal(&mut self, _bytes: &[u8]) -> Result<(), BadLabel> {
            self.0 = true;
            Ok(())
        }
    }

    let data = [1, 2];
    let mut dec = BeDecoder::new(&data[..]);
    let mut spy = Spy(false);
    dec.unmarshal(&mut spy, 5);
    assert!(!spy.0);
    assert!(dec.error().unwrap().is_eof());
}

#[test]
fn read_into_counts_pulled_bytes() {
    let data: Vec<u8> = (1..=10).collect();
    let mut dec = LeDecoder::new(Trickle::new(&data));
    assert_eq!(dec.u16(), 0x0201);

    let mut rest = Vec::new();
    dec.read_into(&mut rest);
    assert!(dec.is_ok());
    assert_eq!(rest, (3..=10).collect::<Vec<u8>>());
    assert_eq!(dec.position(), 10);
}

#[test]
fn read_into_failure_latches_payload() {
    struct Greedy;

    impl ReadFrom for Greedy {
        fn read_from(&mut self, source: &mut dyn ByteSource) -> Result<(), BoxError> {
            let mut buf = [0u8; 4];
            source.pull_exact(&mut buf)?;
            Ok(())
        }
    }

    let data = [1, 2];
    let mut dec = LeDecoder::new(&data[..]);
    dec.read_into(&mut Greedy);
    assert!(matches!(dec.error(), Some(Error::Payload { .. })));
    assert_eq!(dec.position(), 2);

    dec.read_into(&mut Vec::<u8>::new());
    assert_eq!(dec.position(), 2);
}

#[test]
fn write_from_counts_pushed_bytes() {
    let mut enc = LeEncoder::buffer();
    enc.u8(0xAA);
    enc.write_from(&vec![1u8, 2, 3]);
    enc.write_from(&b"xy"[..]);
    assert!(enc.is_ok());
    assert_eq!(enc.position(), 6);
    assert_eq!(enc.into_inner(), [0xAA, 1, 2, 3, b'x', b'y']);
}

#[test]
fn write_from_failure_latches_payload() {
    let mut enc = LeEncoder::new(FaultySink::new(2));
    enc.write_from(&[9u8, 8, 7, 6][..]);
    assert!(matches!(enc.error(), Some(Error::Payload { .. })));
    assert_eq!(enc.position(), 2);
    assert_eq!(enc.get_ref().data, [9, 8]);
}

#[test]
fn write_to_reports_sink_errors() {
    struct Refuse;

    impl WriteTo for Refuse {
        fn write_to(&self, _sink: &mut dyn ByteSink) -> Result<(), BoxError> {
            Err(Box::new(Broken))
        }
    }

    let mut enc = LeEncoder::buffer();
    enc.write_from(&Refuse);
    enc.u8(1);
    assert_eq!(enc.position(), 0);
    let err = enc.finish().unwrap_err();
    assert_eq!(alloc::format!("{err}"), "payload transfer failed: broken pipe");
}

#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Debug, Default, PartialEq, Clone, Copy)]
#[repr(C)]
struct Sample {
    id: u32,
    flags: u16,
    kind: u16,
}

#[test]
fn pod_roundtrip_native_layout() {
    let sample = Sample {
        id: 0x0102_0304,
        flags: 0x0506,
        kind: 0x0708,
    };

    let mut enc = LeEncoder::buffer();
    enc.marshal(&Pod(sample));
    enc.write_from(&Pod(sample));
    assert_eq!(enc.position(), 16);
    let bytes = enc.into_inner();
    assert_eq!(&bytes[..4], &0x0102_0304u32.to_ne_bytes());

    let mut dec = LeDecoder::new(bytes.as_slice());
    let mut first = Pod(Sample::default());
    let mut second = Pod(Sample::default());
    dec.unmarshal(&mut first, 8);
    dec.unmarshal(&mut second, 8);
    assert!(dec.is_ok());
    assert_eq!(first.into_inner(), sample);
    assert_eq!(second.0, sample);
}

#[test]
fn pod_rejects_wrong_length() {
    let data = [0u8; 6];
    let mut dec = LeDecoder::new(&data[..]);
    let mut target = Pod(Sample::default());
    dec.unmarshal(&mut target, 6);
    match dec.error() {
        Some(Error::Unmarshal { source }) => {
            assert_eq!(
                alloc::format!("{source}"),
                "payload length mismatch: expected 8 bytes, got 6"
            );
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn pull_exact_and_push_all() {
    let mut source = Trickle::new(&[1, 2, 3]);
    let mut buf = [0u8; 2];
    source.pull_exact(&mut buf).unwrap();
    assert_eq!(buf, [1, 2]);
    let err = source.pull_exact(&mut buf).unwrap_err();
    assert!(matches!(
        err,
        Error::UnexpectedEof {
            needed: 2,
            available: 1
        }
    ));

    let mut sink = FaultySink::new(1);
    let err = sink.push_all(&[1, 2]).unwrap_err();
    assert!(matches!(err, Error::Sink { .. }));
}
