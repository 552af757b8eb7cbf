use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use x402_nft::MintGateError;

/// Wire-facing request failure. Every per-request error funnels through this
/// type and renders as a JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// No resolvable payer on a gated route.
    PaymentRequired,
    /// Quantity outside the mintable bounds.
    InvalidQuantity(u64),
    /// The signer's submission queue is at capacity.
    QueueFull,
    /// Ledger write failed (revert, timeout, transport).
    Mint(String),
    /// Ledger read failed.
    Read(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::PaymentRequired => write!(f, "payment required"),
            ApiError::InvalidQuantity(q) => write!(f, "invalid quantity: {}", q),
            ApiError::QueueFull => write!(f, "mint queue full"),
            ApiError::Mint(msg) => write!(f, "mint failed: {}", msg),
            ApiError::Read(msg) => write!(f, "supply read failed: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<MintGateError> for ApiError {
    fn from(e: MintGateError) -> Self {
        match e {
            MintGateError::PaymentRequired => ApiError::PaymentRequired,
            MintGateError::InvalidQuantity(q) => ApiError::InvalidQuantity(q),
            MintGateError::QueueFull => ApiError::QueueFull,
            MintGateError::Mint(msg) => ApiError::Mint(msg),
            MintGateError::Read(msg) => ApiError::Read(msg),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            ApiError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
            ApiError::QueueFull => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Mint(_) | ApiError::Read(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::PaymentRequired => {
                HttpResponse::PaymentRequired().json(serde_json::json!({
                    "error": "Payment required"
                }))
            }
            ApiError::InvalidQuantity(q) => {
                tracing::warn!(quantity = q, "mint rejected: quantity out of bounds");
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Invalid quantity"
                }))
            }
            ApiError::QueueFull => HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "Mint queue full"
            })),
            ApiError::Mint(msg) => {
                tracing::error!(error = %msg, "mint failed");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": msg
                }))
            }
            ApiError::Read(msg) => {
                tracing::error!(error = %msg, "supply query failed");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": msg
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::PaymentRequired.status_code(), 402);
        assert_eq!(ApiError::InvalidQuantity(25).status_code(), 400);
        assert_eq!(ApiError::QueueFull.status_code(), 503);
        assert_eq!(ApiError::Mint("boom".into()).status_code(), 500);
        assert_eq!(ApiError::Read("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_conversion_preserves_ledger_message() {
        let api: ApiError = MintGateError::Mint("execution reverted".to_string()).into();
        match api {
            ApiError::Mint(msg) => assert_eq!(msg, "execution reverted"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
