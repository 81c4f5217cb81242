//! Error types for Chorus Crisp

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CcError {
    #[error("Unknown segment: {0}")]
    UnknownSegment(u64),

    #[error("Segment {0} is not an audio segment")]
    NotAudio(u64),

    #[error("Segment {segment} has no take {take}")]
    UnknownTake { segment: u64, take: usize },

    #[error("Host error: {0}")]
    Host(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("No audio clips selected")]
    NothingSelected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias
pub type CcResult<T> = Result<T, CcError>;
