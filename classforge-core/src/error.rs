//! Error types for classforge core operations.

use thiserror::Error;

/// Core error type for class-file encoding and decoding.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer is too short for the requested operation.
    #[error("buffer too short: required {required} bytes, available {available} bytes")]
    BufferTooShort {
        /// Required buffer size in bytes.
        required: usize,
        /// Available buffer size in bytes.
        available: usize,
    },

    /// The input does not start with the class-file magic number.
    #[error("invalid magic number: 0x{found:08X}")]
    InvalidMagic {
        /// Value found at offset 0.
        found: u32,
    },

    /// The constant pool cannot hold another entry.
    #[error("constant pool overflow: more than {max} entries")]
    ConstantPoolOverflow {
        /// Maximum number of entries.
        max: usize,
    },

    /// A constant pool index is out of range or points at the wrong kind of entry.
    #[error("invalid constant pool index {index}: {reason}")]
    InvalidConstant {
        /// Offending index.
        index: u16,
        /// What was expected at that index.
        reason: &'static str,
    },

    /// Constant pool tag the reader does not understand.
    #[error("unsupported constant pool tag {tag} at index {index}")]
    UnsupportedConstant {
        /// Tag byte.
        tag: u8,
        /// Pool index.
        index: u16,
    },

    /// A string does not fit in a single `CONSTANT_Utf8` entry.
    #[error("string of {length} encoded bytes exceeds the constant pool limit of 65535")]
    StringTooLong {
        /// Encoded length in bytes.
        length: usize,
    },

    /// Invalid modified UTF-8 in a `CONSTANT_Utf8` entry.
    #[error("invalid modified UTF-8 at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where the invalid sequence starts.
        offset: usize,
    },

    /// Method body exceeds the 64 KiB code limit.
    #[error("method code of {length} bytes exceeds the maximum of 65535")]
    CodeTooLarge {
        /// Code length in bytes.
        length: usize,
    },

    /// Branch target is further away than a 16-bit offset can express.
    #[error("branch offset {offset} out of range")]
    BranchOutOfRange {
        /// Computed offset.
        offset: i64,
    },

    /// A label was referenced by a branch but never bound.
    #[error("label {label} was never bound")]
    UnboundLabel {
        /// Label id.
        label: usize,
    },

    /// Two different stack map frames were declared at the same offset.
    #[error("conflicting stack map frames at offset {offset}")]
    ConflictingFrames {
        /// Bytecode offset.
        offset: usize,
    },

    /// An instruction popped more operands than the stack held.
    #[error("operand stack underflow at offset {offset}")]
    StackUnderflow {
        /// Bytecode offset of the instruction.
        offset: usize,
    },

    /// A table or count exceeds the width of its length field.
    #[error("too many {kind}: {count}")]
    TooMany {
        /// What was being counted.
        kind: &'static str,
        /// Actual count.
        count: usize,
    },

    /// Malformed class-file structure.
    #[error("malformed class file: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },
}

impl Error {
    /// Creates a malformed class-file error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Result type alias for classforge core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Converts a length to a `u16` count, failing with [`Error::TooMany`].
pub(crate) fn u16_count(count: usize, kind: &'static str) -> Result<u16> {
    u16::try_from(count).map_err(|_| Error::TooMany { kind, count })
}
