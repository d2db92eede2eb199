use thiserror::Error;

/// Failures reported by a back-end service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Unexpected status: {0}")]
    Status(u16),
    #[error("{0}")]
    Server(String),
    #[error("Malformed response: {0}")]
    Decode(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
