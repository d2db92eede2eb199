use thiserror::Error;

use crate::backend::BackendError;

/// Errors surfaced by the order view controller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderViewError {
    #[error("At least one item must have quantity greater than 0")]
    NoItemsSelected,
    #[error("Server amount {server} does not match displayed amount {local}")]
    AmountMismatch { server: String, local: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    Server(String),
    #[error("No delivery is selected")]
    NoSelection,
    #[error("No saved order for the selected delivery")]
    NoOrder,
    #[error("The selected delivery no longer accepts changes")]
    DeliveryClosed,
    #[error("Unknown order list row: {0}")]
    UnknownRow(usize),
    #[error("Product {0} is not part of the selected delivery")]
    UnknownProduct(u64),
    #[error("Another request is still pending")]
    RequestPending,
    #[error("Selection changed before the response arrived")]
    Superseded,
    #[error("Invalid resource url: {0}")]
    InvalidResource(String),
}

impl From<BackendError> for OrderViewError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Server(message) => OrderViewError::Server(message),
            other => OrderViewError::Transport(other.to_string()),
        }
    }
}
