//! Subject identifiers used as cache keys.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Maximum accepted length of a free-text question, in characters.
pub const MAX_QUESTION_CHARS: usize = 1000;

/// Maximum accepted size of a question in UTF-8 bytes. Questions are the
/// indexed subject column of their cache table, and PostgreSQL refuses btree
/// entries above roughly 2.7 kB.
pub const MAX_QUESTION_BYTES: usize = 2000;

// A pattern that fails to compile rejects every id.
static MARKET_ID_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").ok());

/// Address of an Omen market: `0x` followed by 40 hex digits.
///
/// Always held in lowercase so that the same market maps to the same cache
/// key regardless of how the caller spelled it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(value_type = String))]
#[serde(try_from = "String", into = "String")]
pub struct MarketId(String);

impl MarketId {
    /// Parse and normalize a market address.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "market_id".to_string(),
            });
        }
        let matches = MARKET_ID_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(trimmed));
        if !matches {
            return Err(ValidationError::InvalidFormat {
                field: "market_id".to_string(),
                expected: "0x followed by 40 hex characters".to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MarketId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MarketId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MarketId> for String {
    fn from(id: MarketId) -> Self {
        id.0
    }
}

impl AsRef<str> for MarketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a free-text question used as a cache key.
///
/// Surrounding whitespace is dropped; the inner text is kept verbatim.
pub fn normalize_question(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: "question".to_string(),
        });
    }
    if trimmed.chars().count() > MAX_QUESTION_CHARS {
        return Err(ValidationError::TooLong {
            field: "question".to_string(),
            max: MAX_QUESTION_CHARS,
        });
    }
    if trimmed.len() > MAX_QUESTION_BYTES {
        return Err(ValidationError::TooLarge {
            field: "question".to_string(),
            max_bytes: MAX_QUESTION_BYTES,
        });
    }
    Ok(trimmed.to_string())
}
