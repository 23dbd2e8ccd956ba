/// Errors from value header encoding and decoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// The value cannot hold a timestamp header.
    #[error("value too short for timestamp header: {len} bytes, need at least {min}")]
    ValueTooShort { len: usize, min: usize },
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
