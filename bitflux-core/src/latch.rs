//! Sticky error state shared by encoders, decoders and buffers.

use crate::Error;

/// Running byte count plus the first error, once set never cleared.
///
/// [`Decoder`](crate::Decoder) and [`Encoder`](crate::Encoder) embed one;
/// it is public so facades built on the codec can keep the same discipline.
#[derive(Debug)]
pub struct Latch {
    #[cfg(feature = "tracing")]
    role: &'static str,
    position: u64,
    error: Option<Error>,
}

impl Latch {
    /// Create an empty latch. `role` names the owner in log events.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub const fn new(role: &'static str) -> Self {
        Self {
            #[cfg(feature = "tracing")]
            role,
            position: 0,
            error: None,
        }
    }

    /// Bytes processed so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The latched error, if any.
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns `true` once an error has been latched.
    #[inline]
    pub fn is_latched(&self) -> bool {
        self.error.is_some()
    }

    /// Add `n` processed bytes.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.position += n as u64;
    }

    /// Record `err` unless an earlier error is already latched.
    pub fn set(&mut self, err: Error) {
        if self.error.is_some() {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            role = self.role,
            position = self.position,
            error = %err,
            "latched first error"
        );

        self.error = Some(err);
    }

    /// Position on success, otherwise the latched error.
    #[inline]
    pub fn result(&self) -> Result<u64, &Error> {
        match &self.error {
            None => Ok(self.position),
            Some(err) => Err(err),
        }
    }

    /// Consume the latch, yielding the position or the latched error.
    #[inline]
    pub fn into_result(self) -> Result<u64, Error> {
        match self.error {
            None => Ok(self.position),
            Some(err) => Err(err),
        }
    }
}
