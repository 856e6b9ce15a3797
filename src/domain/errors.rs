use thiserror::Error;

/// Input validation failures, surfaced to API callers as 400s.
///
/// Every variant fires before any write happens, so a rejected request
/// leaves the store untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid move type: {0}")]
    InvalidMoveType(String),

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("Invalid item_id: {0}")]
    InvalidItemId(i64),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Days window must be between 1 and 365, got {0}")]
    InvalidWindow(i64),
}

impl From<ValidationError> for String {
    fn from(error: ValidationError) -> Self {
        error.to_string()
    }
}
