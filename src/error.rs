//! Our error types for the 168xB PSUs.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError, RawLine};

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for BK Precision 168xB PSU communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Could not encode command: {0}")]
    EncodeError(#[from] EncodeError),
    #[error("Could not decode response: {0}")]
    DecodeError(#[from] DecodeError),
    #[error("Communication timeout")]
    Timeout,
    #[error("Expected OK confirmation, got {0:?}")]
    ConfirmationMismatch(RawLine),
    #[error("Name is longer than the identity can hold")]
    NameTooLong,
    #[error("Interface has been closed")]
    Closed,
}

impl<I: embedded_io::Error> Error<I> {
    /// True for the failures a polling caller would usually just retry on the next cycle.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Error::Timeout | Error::ConfirmationMismatch(_) | Error::DecodeError(_)
        )
    }
}
