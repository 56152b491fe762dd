use std::fmt;

/// A decode failure from this library.
///
/// Each variant is one way an incoming DNS message can be malformed. All
/// offsets are absolute byte offsets from the start of the message.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A read ran past the end of the message buffer.
    Incomplete {
        /// Offset at which the read started.
        offset: usize,
        /// Number of bytes the read asked for.
        needed: usize,
    },

    /// Bytes remain after all declared sections were decoded.
    TrailingGarbage {
        /// Number of surplus bytes.
        remaining: usize,
    },

    /// A label length octet uses one of the reserved top-bit patterns
    /// `01` or `10`.
    InvalidLabelType {
        /// Offset of the offending octet.
        offset: usize,
        /// The octet itself.
        octet: u8,
    },

    /// A compression pointer targets an offset where no label was decoded.
    UnresolvedPointer {
        /// Offset of the pointer octet.
        offset: usize,
        /// The 14-bit target offset it carries.
        target: usize,
    },

    /// A name exceeds 255 bytes in uncompressed wire form.
    NameTooLong {
        /// The accumulated wire length.
        len: usize,
    },

    /// A literal label is longer than 63 bytes.
    LabelTooLong {
        /// The declared label length.
        len: usize,
    },

    /// A label is not valid UTF-8.
    InvalidLabel {
        /// Offset of the label's length octet.
        offset: usize,
    },

    /// A resource record's payload consumed a different number of bytes
    /// than its declared RDLENGTH.
    RdataLengthMismatch {
        /// The record type code.
        ty: u16,
        /// The RDLENGTH declared on the wire.
        declared: usize,
        /// The bytes actually consumed by the payload decoders.
        consumed: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Incomplete { offset, needed } => {
                write!(f, "message ended early: {} byte(s) at offset {}", needed, offset)
            }
            Error::TrailingGarbage { remaining } => {
                write!(f, "{} byte(s) left after the last record", remaining)
            }
            Error::InvalidLabelType { offset, octet } => {
                write!(f, "invalid label type 0x{:x} at offset {}", octet, offset)
            }
            Error::UnresolvedPointer { offset, target } => {
                write!(
                    f,
                    "compression pointer at offset {} targets {} where no label starts",
                    offset, target
                )
            }
            Error::NameTooLong { len } => {
                write!(f, "name of {} wire bytes exceeds the 255 byte limit", len)
            }
            Error::LabelTooLong { len } => {
                write!(f, "label of {} bytes exceeds the 63 byte limit", len)
            }
            Error::InvalidLabel { offset } => {
                write!(f, "label at offset {} is not valid UTF-8", offset)
            }
            Error::RdataLengthMismatch { ty, declared, consumed } => {
                write!(
                    f,
                    "rdata of type {} record declared {} byte(s) but consumed {}",
                    ty, declared, consumed
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// One and only `Result` type from this library crate.
pub type Result<T> = core::result::Result<T, Error>;
