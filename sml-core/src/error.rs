use thiserror::Error;

/// Main error type for SML decoding, encoding and framing
#[derive(Error, Debug)]
pub enum SmlError {
    /// The TLV type on the wire differs from the one the field requires
    #[error("Type mismatch: expected {expected}, found TL byte 0x{found:02X}")]
    TypeMismatch { expected: &'static str, found: u8 },

    /// A declared element count or byte length differs from the expected one
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// A read would cross the end of the buffer
    #[error("Buffer exhausted: needed {needed} bytes, {available} available")]
    BufferExhausted { needed: usize, available: usize },

    /// An escape sequence was followed by an unexpected byte
    #[error("Unrecognized escape sequence: 0x1B1B1B1B followed by 0x{0:02X}")]
    UnrecognizedFraming(u8),

    /// CRC16 verification failed for a frame or a message
    #[error("Checksum mismatch: expected 0x{expected:04X}, computed 0x{computed:04X}")]
    ChecksumMismatch { expected: u16, computed: u16 },

    /// A message body tag is not part of the dispatch table
    #[error("Unknown message tag: 0x{0:08X}")]
    UnknownMessageTag(u32),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Clone for SmlError {
    fn clone(&self) -> Self {
        match self {
            SmlError::TypeMismatch { expected, found } => SmlError::TypeMismatch {
                expected,
                found: *found,
            },
            SmlError::LengthMismatch { expected, found } => SmlError::LengthMismatch {
                expected: *expected,
                found: *found,
            },
            SmlError::BufferExhausted { needed, available } => SmlError::BufferExhausted {
                needed: *needed,
                available: *available,
            },
            SmlError::UnrecognizedFraming(byte) => SmlError::UnrecognizedFraming(*byte),
            SmlError::ChecksumMismatch { expected, computed } => SmlError::ChecksumMismatch {
                expected: *expected,
                computed: *computed,
            },
            SmlError::UnknownMessageTag(tag) => SmlError::UnknownMessageTag(*tag),
            SmlError::InvalidData(msg) => SmlError::InvalidData(msg.clone()),
            // io::Error is not Clone; keep kind and message
            SmlError::Io(e) => SmlError::Io(std::io::Error::new(e.kind(), e.to_string())),
        }
    }
}

/// Result type alias for SML operations
pub type SmlResult<T> = Result<T, SmlError>;
