use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Insufficient balance: need {needed}, have {have}")]
    InsufficientBalance { needed: u64, have: u64 },

    #[error("Signature verification failed: {0}")]
    Verify(#[from] VerifyError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Webhook signature verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Missing webhook signature headers")]
    MissingHeaders,

    #[error("Webhook timestamp is not a Unix timestamp")]
    MalformedTimestamp,

    #[error("Webhook timestamp outside the replay window")]
    StaleNotification,

    #[error("No signature matched the computed digest")]
    InvalidSignature,

    #[error("Webhook secret is not valid base64")]
    MalformedSecret,
}

/// Errors from the external ledger/payments provider
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Balance lookup failed: {0}")]
    LookupFailed(String),

    #[error("Ledger entry rejected: {0}")]
    MutationFailed(String),

    #[error("Customer creation failed: {0}")]
    CustomerCreationFailed(String),

    #[error("Checkout session creation failed: {0}")]
    CheckoutFailed(String),
}

/// Errors from the speech synthesis provider
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Synthesis request failed: {0}")]
    Failed(String),

    #[error("Synthesis provider unreachable: {0}")]
    Unreachable(String),
}

/// API error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, balance) = match self {
            AppError::InvalidInput(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg, None)
            }
            AppError::MalformedEvent(msg) => {
                (StatusCode::BAD_REQUEST, "MALFORMED_EVENT", msg, None)
            }
            AppError::UnknownProduct(product_id) => (
                StatusCode::BAD_REQUEST,
                "UNKNOWN_PRODUCT",
                format!("Unknown product: {}", product_id),
                None,
            ),
            AppError::InsufficientBalance { needed, have } => (
                StatusCode::PAYMENT_REQUIRED,
                "INSUFFICIENT_BALANCE",
                format!("Insufficient credits. Need {}, have {}.", needed, have),
                Some(have),
            ),
            AppError::Verify(VerifyError::MissingHeaders) => (
                StatusCode::BAD_REQUEST,
                "MISSING_HEADERS",
                "Missing webhook signature headers".to_string(),
                None,
            ),
            AppError::Verify(VerifyError::MalformedTimestamp) => (
                StatusCode::BAD_REQUEST,
                "MALFORMED_TIMESTAMP",
                "Webhook timestamp is not a Unix timestamp".to_string(),
                None,
            ),
            AppError::Verify(VerifyError::StaleNotification) => (
                StatusCode::UNAUTHORIZED,
                "STALE_NOTIFICATION",
                "Webhook timestamp outside the replay window".to_string(),
                None,
            ),
            AppError::Verify(VerifyError::InvalidSignature) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SIGNATURE",
                "Webhook signature verification failed".to_string(),
                None,
            ),
            AppError::Ledger(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "LEDGER_ERROR",
                err.to_string(),
                None,
            ),
            AppError::Synthesis(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SYNTHESIS_ERROR",
                "Speech generation failed. Try again.".to_string(),
                None,
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            balance,
        });

        (status, body).into_response()
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
