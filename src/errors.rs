//! Unified error type for the ledger service.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer turns
//! an [`Error`] into a `{ "error": "..." }` body with the matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// A single failed field check produced by payment validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path as the client sent it, e.g. `paymentDetails.chequeDate`
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    /// Creates a field error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// All errors surfaced by the ledger service.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Storage-layer failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more request fields failed validation
    #[error("Validation failed: {}", join_field_errors(.errors))]
    Validation {
        /// Every violated field, in check order
        errors: Vec<FieldError>,
    },

    /// The referenced booking does not exist
    #[error("Booking {id} not found")]
    BookingNotFound {
        /// Booking id from the request
        id: i64,
    },

    /// The referenced ledger entry does not exist
    #[error("Payment {id} not found")]
    PaymentNotFound {
        /// Ledger entry id from the request
        id: i64,
    },

    /// Soft delete requested on an entry that is already deleted
    #[error("Payment {id} is already deleted")]
    AlreadyDeleted {
        /// Ledger entry id
        id: i64,
    },

    /// Restore requested on an entry that is not deleted
    #[error("Payment {id} is not deleted")]
    NotDeleted {
        /// Ledger entry id
        id: i64,
    },

    /// No authenticated actor was forwarded with the request
    #[error("Authentication required")]
    Unauthenticated,
}

impl Error {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Conflicts (already deleted / not deleted) are reported as 400.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::AlreadyDeleted { .. } | Self::NotDeleted { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::BookingNotFound { .. } | Self::PaymentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            format!("Internal server error: {self}")
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::invalid_field("amount", "must be positive").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::AlreadyDeleted { id: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotDeleted { id: 1 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::BookingNotFound { id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::PaymentNotFound { id: 1 }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::Database(sea_orm::DbErr::Custom("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = Error::Validation {
            errors: vec![
                FieldError::new("amount", "Amount must be greater than zero"),
                FieldError::new("paymentDetails.chequeDate", "Cheque date is required"),
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("amount: Amount must be greater than zero"));
        assert!(message.contains("paymentDetails.chequeDate: Cheque date is required"));
    }
}
