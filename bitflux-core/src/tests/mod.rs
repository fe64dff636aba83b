extern crate std;

mod payload;

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::{BoxError, ByteSink, ByteSource};

/// Source handing out at most one byte per pull.
pub(crate) struct Trickle {
    data: Vec<u8>,
    pos: usize,
    pub(crate) pulls: usize,
}

impl Trickle {
    pub(crate) fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            pulls: 0,
        }
    }
}

impl ByteSource for Trickle {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        self.pulls += 1;
        if buf.is_empty() || self.pos == self.data.len() {
            return Ok(0);
        }
        buf[0] = self.data[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

/// Sink accepting at most one byte per push.
#[derive(Default)]
pub(crate) struct TrickleSink {
    pub(crate) data: Vec<u8>,
    pub(crate) pushes: usize,
}

impl ByteSink for TrickleSink {
    fn push(&mut self, buf: &[u8]) -> Result<usize, BoxError> {
        self.pushes += 1;
        match buf.first() {
            Some(&b) => {
                self.data.push(b);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Sink that reports success while accepting nothing.
#[derive(Default)]
pub(crate) struct StallSink {
    pub(crate) pushes: usize,
}

impl ByteSink for StallSink {
    fn push(&mut self, _buf: &[u8]) -> Result<usize, BoxError> {
        self.pushes += 1;
        Ok(0)
    }
}

#[derive(Debug)]
pub(crate) struct Broken;

impl fmt::Display for Broken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("broken pipe")
    }
}

impl core::error::Error for Broken {}

/// Sink that accepts `budget` bytes, then faults.
pub(crate) struct FaultySink {
    pub(crate) data: Vec<u8>,
    budget: usize,
}

impl FaultySink {
    pub(crate) fn new(budget: usize) -> Self {
        Self {
            data: Vec::new(),
            budget,
        }
    }
}

impl ByteSink for FaultySink {
    fn push(&mut self, buf: &[u8]) -> Result<usize, BoxError> {
        if self.budget == 0 {
            return Err(Box::new(Broken));
        }
        let n = buf.len().min(self.budget);
        self.data.extend_from_slice(&buf[..n]);
        self.budget -= n;
        Ok(n)
    }
}

/// Source that yields its data, then faults instead of ending cleanly.
pub(crate) struct FaultySource {
    data: Vec<u8>,
    pos: usize,
}

impl FaultySource {
    pub(crate) fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
        }
    }
}

impl ByteSource for FaultySource {
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        if self.pos == self.data.len() {
            return Err(Box::new(Broken));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
