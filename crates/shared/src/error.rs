use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("module location {0} is outside the 12 casing slots")]
    LocationOutOfRange(usize),
    #[error("unknown error level {0:?}")]
    UnknownErrorLevel(String),
}

/// Failure to turn one inbound text frame into a protocol value.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("invalid `{kind}` frame: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
