use std::fmt;
use std::io;

/// Convenient alias for results produced by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can be produced while encoding or decoding wire values.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The stream ran out of bytes before a value was complete.
    #[error("unexpected end of stream")]
    EndOfStream,

    /// A varint did not terminate within its maximum byte count.
    #[error("malformed varint: no terminating byte within {max_len} bytes")]
    MalformedVarint {
        /// Maximum number of bytes allowed for the target width.
        max_len: usize,
    },

    /// A tag byte or flags word carried a value outside its enumeration.
    #[error("unsupported {what} discriminant: {value:#x}")]
    UnsupportedDiscriminant {
        /// Name of the tagged field (e.g. `"timestamp kind"`).
        what: &'static str,
        /// The offending raw value.
        value: u64,
    },

    /// A length exceeded the configured or representable maximum.
    #[error("length {len} exceeds limit of {limit} bytes")]
    SizeExceedsLimit {
        /// Requested length.
        len: u64,
        /// Maximum permitted length.
        limit: u64,
    },

    /// An embedded stream copy moved a different number of bytes than planned.
    #[error("short copy: expected {expected} bytes, copied {copied}")]
    ShortCopy {
        /// Byte count computed before the copy began.
        expected: u64,
        /// Byte count actually moved.
        copied: u64,
    },

    /// A decoded string contained unpaired UTF-16 surrogates.
    #[error("string payload is not valid UTF-16")]
    InvalidUtf16,

    /// A tick count fell outside the representable range, or could not be shifted
    /// between local time and UTC.
    #[error("timestamp ticks {0} out of range")]
    TimestampOutOfRange(i64),

    /// A configuration value was rejected.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// Textual input (GUID text, slot layouts) could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// A dynamic value did not match the slot it was written to.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind declared by the slot.
        expected: &'static str,
        /// Kind of the supplied value.
        found: &'static str,
    },

    /// Any other I/O failure reported by the underlying stream.
    #[error("i/o error: {0}")]
    Io(#[source] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::EndOfStream
        } else {
            Self::Io(err)
        }
    }
}

impl Error {
    pub(crate) fn discriminant(what: &'static str, value: impl Into<u64>) -> Self {
        Self::UnsupportedDiscriminant {
            what,
            value: value.into(),
        }
    }

    pub(crate) fn parse<T: fmt::Display>(msg: T) -> Self {
        Self::Parse(msg.to_string())
    }

    pub(crate) fn invalid_option<T: fmt::Display>(msg: T) -> Self {
        Self::InvalidOption(msg.to_string())
    }

    /// Returns `true` for failures caused by corrupt or adversarial input rather than
    /// by the transport or the caller.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::MalformedVarint { .. }
                | Self::UnsupportedDiscriminant { .. }
                | Self::InvalidUtf16
                | Self::SizeExceedsLimit { .. }
        )
    }
}
