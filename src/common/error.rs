use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    #[error("unsupported character {0:?}: not encodable in numeric, alphanumeric, byte or kanji mode")]
    UnsupportedCharacter(char),

    #[error("data too long: exceeds the capacity of version 40 at the requested error correction level")]
    DataTooLong,

    #[error("capacity exceeded: data doesn't fit in the requested version and error correction level")]
    CapacityExceeded,

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

pub type QRResult<T> = Result<T, QRError>;
