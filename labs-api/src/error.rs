//! HTTP error responses.
//!
//! Every failure leaves the server as an [`ApiError`]: a stable
//! SCREAMING_SNAKE_CASE `code`, the status it implies, and a message safe to
//! show to clients. Workspace errors are logged in full where they are
//! converted; the response only carries a summary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use labs_core::{LabsError, LlmError, MarketError, StorageError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 400: rejected before any cache or provider is touched
    /// A query parameter is absent or blank
    MissingField,
    /// A value is longer than allowed
    InvalidRange,
    /// A value does not have the expected shape
    InvalidFormat,

    // 404
    /// The market indexer has no such market
    EntityNotFound,

    // 500
    InternalError,
    /// The response cache failed to read or write
    DatabaseError,
    /// The market indexer, search API or LLM failed
    UpstreamError,

    // 503
    /// A dependency is not reachable or not configured
    ServiceUnavailable,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField | Self::InvalidRange | Self::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            Self::EntityNotFound => StatusCode::NOT_FOUND,
            // Upstream failures surface as plain 500s to match the public contract.
            Self::InternalError | Self::DatabaseError | Self::UpstreamError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error body returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    pub fn too_long(field: &str, max: usize) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("Field '{}' must be at most {} characters", field, max),
        )
    }

    pub fn too_large(field: &str, max_bytes: usize) -> Self {
        Self::new(
            ErrorCode::InvalidRange,
            format!("Field '{}' must be at most {} bytes of UTF-8", field, max_bytes),
        )
    }

    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Field '{}' has invalid format, expected {}", field, expected),
        )
    }

    pub fn market_not_found(market_id: &str) -> Self {
        Self::new(
            ErrorCode::EntityNotFound,
            format!("Market with id `{}` not found", market_id),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn upstream_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Lets handlers return `Result<Json<T>, ApiError>` directly:
/// ```ignore
/// async fn handler() -> Result<Json<MarketInvalidResponse>, ApiError> {
///     Err(ApiError::market_not_found("0x01"))
/// }
/// ```
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM WORKSPACE ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::RequiredFieldMissing { field } => ApiError::missing_field(&field),
            ValidationError::InvalidFormat { field, expected } => {
                ApiError::invalid_format(&field, &expected)
            }
            ValidationError::TooLong { field, max } => ApiError::too_long(&field, max),
            ValidationError::TooLarge { field, max_bytes } => {
                ApiError::too_large(&field, max_bytes)
            }
        }
    }
}

impl From<LabsError> for ApiError {
    fn from(err: LabsError) -> Self {
        match err {
            LabsError::Validation(e) => e.into(),
            LabsError::Market(MarketError::NotFound { market_id }) => {
                ApiError::market_not_found(&market_id)
            }
            LabsError::Market(e @ MarketError::LookupFailed { .. }) => {
                tracing::error!(error = %e, "Market lookup failed");
                ApiError::upstream_error("Failed to fetch market")
            }
            LabsError::Llm(e) => {
                tracing::error!(error = %e, "Provider request failed");
                match e {
                    LlmError::ProviderNotConfigured { .. } => {
                        ApiError::service_unavailable("Provider not configured")
                    }
                    _ => ApiError::upstream_error("Upstream provider failed"),
                }
            }
            LabsError::Storage(e) => {
                // Full detail goes to the log; the response stays generic.
                tracing::error!(error = %e, "Cache storage failed");
                match e {
                    StorageError::ConnectionFailed { .. } => {
                        ApiError::service_unavailable("Database unavailable")
                    }
                    _ => ApiError::database_error("Database operation failed"),
                }
            }
            LabsError::Config(e) => {
                tracing::error!(error = %e, "Configuration error");
                ApiError::internal_error("Server misconfigured")
            }
        }
    }
}

impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        tracing::error!(error = ?err, "Database query failed");
        ApiError::database_error("Database operation failed")
    }
}

impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!(error = ?err, "No database connection available");
        match err {
            deadpool_postgres::PoolError::Timeout(_) | deadpool_postgres::PoolError::Closed => {
                ApiError::service_unavailable("Database unavailable")
            }
            _ => ApiError::database_error("Failed to acquire database connection"),
        }
    }
}

/// Payloads are serialized by the server, so a failure here is ours.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!(error = %err, "Payload serialization failed");
        ApiError::internal_error("Failed to encode response")
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use labs_core::ConfigError;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidFormat.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::EntityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::UpstreamError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::ServiceUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        let missing: ApiError = LabsError::from(ValidationError::RequiredFieldMissing {
            field: "question".to_string(),
        })
        .into();
        assert_eq!(missing.code, ErrorCode::MissingField);
        assert!(missing.message.contains("question"));

        let format: ApiError = ValidationError::InvalidFormat {
            field: "market_id".to_string(),
            expected: "0x followed by 40 hex characters".to_string(),
        }
        .into();
        assert_eq!(format.code, ErrorCode::InvalidFormat);
        assert_eq!(format.status_code(), StatusCode::BAD_REQUEST);

        let long: ApiError = ValidationError::TooLong {
            field: "question".to_string(),
            max: 1000,
        }
        .into();
        assert_eq!(long.code, ErrorCode::InvalidRange);
        assert!(long.message.contains("1000"));

        let large: ApiError = ValidationError::TooLarge {
            field: "question".to_string(),
            max_bytes: 2000,
        }
        .into();
        assert_eq!(large.code, ErrorCode::InvalidRange);
        assert!(large.message.contains("2000 bytes"));
    }

    #[test]
    fn test_market_not_found_maps_to_404() {
        let err: ApiError = LabsError::from(MarketError::NotFound {
            market_id: "0xabc".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Market with id `0xabc` not found");
    }

    #[test]
    fn test_upstream_failures_map_to_500() {
        let lookup: ApiError = LabsError::from(MarketError::LookupFailed {
            market_id: "0xabc".to_string(),
            reason: "timeout".to_string(),
        })
        .into();
        assert_eq!(lookup.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!lookup.message.contains("timeout"));

        let llm: ApiError = LabsError::from(LlmError::RequestFailed {
            provider: "tavily".to_string(),
            status: 502,
            message: "bad gateway".to_string(),
        })
        .into();
        assert_eq!(llm.code, ErrorCode::UpstreamError);

        let config: ApiError = LabsError::from(ConfigError::MissingRequired {
            field: "OPENAI_API_KEY".to_string(),
        })
        .into();
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_errors() {
        let down: ApiError = LabsError::from(StorageError::ConnectionFailed {
            target: "postgres://localhost".to_string(),
            reason: "refused".to_string(),
        })
        .into();
        assert_eq!(down.code, ErrorCode::ServiceUnavailable);

        let query: ApiError = LabsError::from(StorageError::QueryFailed {
            table: "market_invalid_response_cache".to_string(),
            reason: "syntax".to_string(),
        })
        .into();
        assert_eq!(query.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_serde_json_error_is_internal() {
        let err: ApiError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::market_not_found("0x01");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("ENTITY_NOT_FOUND"));
        assert!(json.contains("Market with id `0x01` not found"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::database_error("Connection failed");
        let display = format!("{}", err);

        assert!(display.contains("DatabaseError"));
        assert!(display.contains("Connection failed"));
    }
}
