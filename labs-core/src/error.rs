//! Error types for Labs operations

use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection to {target} failed: {reason}")]
    ConnectionFailed { target: String, reason: String },

    #[error("Schema creation failed for table {table}: {reason}")]
    SchemaFailed { table: String, reason: String },

    #[error("Query on table {table} failed: {reason}")]
    QueryFailed { table: String, reason: String },

    #[error("Insert into table {table} failed: {reason}")]
    InsertFailed { table: String, reason: String },

    #[error("Failed to encode payload for table {table}: {reason}")]
    EncodeFailed { table: String, reason: String },
}

/// Search and LLM provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("No provider configured for {capability}")]
    ProviderNotConfigured { capability: String },

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Rate limited by {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: i64,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Market data lookup errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketError {
    #[error("Market with id `{market_id}` not found")]
    NotFound { market_id: String },

    #[error("Failed to fetch market `{market_id}`: {reason}")]
    LookupFailed { market_id: String, reason: String },
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid format for {field}: expected {expected}")]
    InvalidFormat { field: String, expected: String },

    #[error("Field {field} exceeds {max} characters")]
    TooLong { field: String, max: usize },

    #[error("Field {field} exceeds {max_bytes} bytes")]
    TooLarge { field: String, max_bytes: usize },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Labs errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LabsError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Market error: {0}")]
    Market(#[from] MarketError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Labs operations.
pub type LabsResult<T> = Result<T, LabsError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_not_found_display() {
        let err = MarketError::NotFound {
            market_id: "0xabc".to_string(),
        };
        assert_eq!(err.to_string(), "Market with id `0xabc` not found");
    }

    #[test]
    fn test_llm_error_display_rate_limited() {
        let err = LlmError::RateLimited {
            provider: "openai".to_string(),
            retry_after_ms: 1500,
        };
        let msg = err.to_string();
        assert!(msg.contains("openai"));
        assert!(msg.contains("1500ms"));
    }

    #[test]
    fn test_labs_error_from_variants() {
        let storage: LabsError = StorageError::QueryFailed {
            table: "t".to_string(),
            reason: "boom".to_string(),
        }
        .into();
        assert!(matches!(storage, LabsError::Storage(_)));

        let config: LabsError = ConfigError::MissingRequired {
            field: "OPENAI_API_KEY".to_string(),
        }
        .into();
        assert!(config.to_string().contains("OPENAI_API_KEY"));

        let validation: LabsError = ValidationError::TooLong {
            field: "question".to_string(),
            max: 10,
        }
        .into();
        assert!(matches!(validation, LabsError::Validation(_)));
    }
}
