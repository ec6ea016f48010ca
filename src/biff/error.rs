//! Error types for BIFF record stream decoding and encoding.
use thiserror::Error;

/// Errors raised by the record stream codec.
///
/// Every variant carries enough position information to locate the
/// offending bytes in the input; the codec never retries or skips past
/// a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BiffError {
    /// Fewer bytes are available than an envelope or field declares.
    #[error("Truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        /// Absolute offset at which the read was attempted
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
        /// Number of bytes left in the buffer
        available: usize,
    },

    /// A record payload violates the layout its decoder expects.
    #[error("Malformed record 0x{sid:04X} at offset {offset}: {reason}")]
    MalformedRecord {
        /// Record type identifier
        sid: u16,
        /// Absolute offset of the record header, or of the field for accessors
        offset: usize,
        /// Error description
        reason: String,
    },

    /// A value supplied by the caller cannot be represented in the record.
    ///
    /// Raised while building or editing records, never while decoding, so it
    /// carries no stream offset.
    #[error("Invalid value for record 0x{sid:04X}: {reason}")]
    InvalidValue {
        /// Record type identifier
        sid: u16,
        /// Error description
        reason: String,
    },

    /// A logical payload cannot be framed within the configured limits.
    #[error("Payload of record 0x{sid:04X} is too large to frame: {size} bytes (limit {limit})")]
    OversizedPayload {
        /// Record type identifier
        sid: u16,
        /// Logical payload size in bytes
        size: usize,
        /// Largest payload the encoder accepts under the current options
        limit: usize,
    },
}

impl BiffError {
    /// Build a [`BiffError::MalformedRecord`].
    pub(crate) fn malformed(sid: u16, offset: usize, reason: impl Into<String>) -> Self {
        BiffError::MalformedRecord {
            sid,
            offset,
            reason: reason.into(),
        }
    }

    /// Absolute stream offset associated with the error, if any.
    ///
    /// Encode-time errors have no input position and return `None`.
    pub fn offset(&self) -> Option<usize> {
        match self {
            BiffError::Truncated { offset, .. } | BiffError::MalformedRecord { offset, .. } => {
                Some(*offset)
            },
            BiffError::InvalidValue { .. } | BiffError::OversizedPayload { .. } => None,
        }
    }

    /// Record type identifier associated with the error, if known.
    pub fn sid(&self) -> Option<u16> {
        match self {
            BiffError::Truncated { .. } => None,
            BiffError::MalformedRecord { sid, .. }
            | BiffError::InvalidValue { sid, .. }
            | BiffError::OversizedPayload { sid, .. } => Some(*sid),
        }
    }

    /// Attach a record identifier to a truncation raised while decoding a
    /// payload. Reads inside a payload that run out of bytes mean the payload
    /// is malformed, not that the stream itself is truncated.
    pub(crate) fn within_record(self, sid: u16, record_offset: usize) -> Self {
        match self {
            BiffError::Truncated {
                offset,
                needed,
                available,
            } => BiffError::MalformedRecord {
                sid,
                offset: record_offset,
                reason: format!(
                    "field at offset {} needs {} bytes, payload has {} left",
                    offset, needed, available
                ),
            },
            other => other,
        }
    }
}

impl From<crate::common::binary::BinaryError> for BiffError {
    fn from(err: crate::common::binary::BinaryError) -> Self {
        match err {
            crate::common::binary::BinaryError::InsufficientData {
                offset,
                expected,
                available,
            } => BiffError::Truncated {
                offset,
                needed: expected,
                available,
            },
        }
    }
}

/// Result type for BIFF codec operations.
pub type BiffResult<T> = std::result::Result<T, BiffError>;
