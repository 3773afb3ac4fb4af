use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Capacity exceeded: need {required} bits, carrier has {available}")]
    CapacityExceeded { required: u64, available: u64 },

    #[error("Invalid cover format: {0}")]
    InvalidCoverFormat(String),

    #[error("Invalid signature: no hidden data found in this image")]
    InvalidSignature,

    #[error("Invalid hidden data length: {0}")]
    InvalidLength(u64),

    #[error("Truncated payload: image ended before hidden data was complete")]
    TruncatedPayload,

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

impl From<image::ImageError> for StegError {
    fn from(e: image::ImageError) -> Self {
        StegError::InvalidCoverFormat(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StegError>;
