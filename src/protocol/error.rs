//! SSH wire error types

use thiserror::Error;

/// Errors produced by the SSH wire codecs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// mpint value serializes to zero bytes
    #[error("cannot encode empty mpint")]
    EmptyValue,

    /// Buffer too short for the declared or required data
    #[error("buffer too short: need {needed} bytes, got {got}")]
    ShortBuffer {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// name-list body is not valid UTF-8
    #[error("invalid UTF-8 in name-list: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Packet length exceeds the configured maximum
    #[error("packet too large: {size} bytes (max {max})")]
    PacketTooLarge {
        /// Declared packet length
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Padding does not fit the length-counted region
    #[error("invalid padding length {padding_length} for packet length {packet_length}")]
    InvalidPadding {
        /// Padding length byte (or requested padding size)
        padding_length: usize,
        /// Packet length field
        packet_length: usize,
    },
}

impl Error {
    /// Whether the caller can recover by retrying with a larger buffer.
    #[must_use]
    pub const fn is_short_buffer(&self) -> bool {
        matches!(self, Self::ShortBuffer { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
