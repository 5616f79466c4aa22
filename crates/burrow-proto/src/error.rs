//! Codec error types.
//!
//! Every way a wire message can be unparseable is a variant here. The
//! resolver only needs one distinction — [`Error::is_malformed`] — because a
//! malformed response is dropped wholesale while everything already decoded
//! from it survives.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// DNS wire format errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Buffer errors
    // =========================================================================
    /// Buffer is too short to contain the expected data.
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Expected minimum size.
        expected: usize,
        /// Actual buffer size.
        actual: usize,
    },

    /// Unexpected end of data while parsing.
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof {
        /// Byte offset where EOF was encountered.
        offset: usize,
    },

    /// Invalid data encountered during parsing.
    #[error("invalid data at offset {offset}: {message}")]
    InvalidData {
        /// Byte offset of the invalid data.
        offset: usize,
        /// Description of the error.
        message: String,
    },

    // =========================================================================
    // Domain name errors
    // =========================================================================
    /// Label exceeds the maximum length of 63 bytes.
    #[error("label too long: {length} bytes exceeds maximum of 63")]
    LabelTooLong {
        /// Actual label length.
        length: usize,
    },

    /// Domain name exceeds the maximum wire length of 255 bytes.
    #[error("name too long: {length} bytes exceeds maximum of 255")]
    NameTooLong {
        /// Actual name length in wire format.
        length: usize,
    },

    /// Invalid label character.
    #[error("invalid character '{character}' in label at position {position}")]
    InvalidLabelChar {
        /// The invalid character.
        character: char,
        /// Position in the label.
        position: usize,
    },

    /// Compression pointer referring to itself or forward in the message.
    #[error("invalid compression pointer at offset {offset}: points to {target}")]
    InvalidCompressionPointer {
        /// Offset of the pointer.
        offset: usize,
        /// Target offset the pointer references.
        target: usize,
    },

    /// Too many compression pointer jumps in a single name.
    #[error("too many compression pointer jumps (>{max_jumps})")]
    TooManyCompressionJumps {
        /// Maximum allowed jumps.
        max_jumps: usize,
    },

    // =========================================================================
    // Record errors
    // =========================================================================
    /// RDLENGTH points past the end of the message.
    #[error("RDATA overrun at offset {offset}: {rdlength} bytes declared, {available} available")]
    RdataOverrun {
        /// Offset where RDATA begins.
        offset: usize,
        /// Declared RDLENGTH.
        rdlength: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// RDATA length does not match the fixed size of the record type.
    #[error("RDATA length mismatch for {rtype}: expected {expected}, got {actual}")]
    RdataLengthMismatch {
        /// Record type name.
        rtype: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    // =========================================================================
    // Message errors
    // =========================================================================
    /// Message header shorter than the fixed 12 bytes.
    #[error("truncated header: {length} bytes")]
    TruncatedHeader {
        /// Actual buffer length.
        length: usize,
    },

    /// Encoded message exceeds the UDP datagram limit.
    #[error("message too large: {size} bytes exceeds maximum of {max_size}")]
    MessageTooLarge {
        /// Actual message size.
        size: usize,
        /// Maximum allowed size.
        max_size: usize,
    },
}

impl Error {
    /// Creates a new `BufferTooShort` error.
    #[inline]
    pub fn buffer_too_short(expected: usize, actual: usize) -> Self {
        Self::BufferTooShort { expected, actual }
    }

    /// Creates a new `UnexpectedEof` error.
    #[inline]
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::UnexpectedEof { offset }
    }

    /// Creates a new `InvalidData` error.
    #[inline]
    pub fn invalid_data(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidData {
            offset,
            message: message.into(),
        }
    }

    /// Creates a new `RdataOverrun` error.
    #[inline]
    pub fn rdata_overrun(offset: usize, rdlength: usize, available: usize) -> Self {
        Self::RdataOverrun {
            offset,
            rdlength,
            available,
        }
    }

    /// Creates a new `RdataLengthMismatch` error.
    #[inline]
    pub fn rdata_length_mismatch(rtype: &'static str, expected: usize, actual: usize) -> Self {
        Self::RdataLengthMismatch {
            rtype,
            expected,
            actual,
        }
    }

    /// Returns true if this error means the containing message is malformed
    /// and decoding cannot continue past it.
    #[inline]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::BufferTooShort { .. }
                | Self::UnexpectedEof { .. }
                | Self::InvalidData { .. }
                | Self::NameTooLong { .. }
                | Self::InvalidCompressionPointer { .. }
                | Self::TooManyCompressionJumps { .. }
                | Self::RdataOverrun { .. }
                | Self::RdataLengthMismatch { .. }
                | Self::TruncatedHeader { .. }
        )
    }
}
