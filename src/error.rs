use std::io;

use derive_more::{Display, Error};

/// Errors raised by the terminal primitives.
#[derive(Debug, Display, Error)]
pub enum GlitterError {
    /// A caller supplied a value outside the accepted domain.
    #[display("invalid argument: {_0}")]
    InvalidArgument(#[error(not(source))] String),

    /// The user interrupted a blocking read (Ctrl+C).
    #[display("interrupted")]
    Interrupted,

    /// The input stream ended before an answer was accepted.
    #[display("input stream closed")]
    InputClosed,

    #[display("terminal i/o failed: {_0}")]
    Io(io::Error),
}

impl GlitterError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<io::Error> for GlitterError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, GlitterError>;
