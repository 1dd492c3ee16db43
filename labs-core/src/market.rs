//! Market data as seen by producers.

use crate::error::LabsResult;
use crate::identity::MarketId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The subset of an Omen market the producers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub id: MarketId,
    pub question_title: String,
}

/// Looks markets up in the market-data indexer.
///
/// Implementations return `MarketError::NotFound` when the indexer has no
/// market under the id, and `MarketError::LookupFailed` for transport or
/// decoding problems.
#[async_trait]
pub trait MarketLookup: Send + Sync {
    async fn get_market(&self, id: &MarketId) -> LabsResult<Market>;
}
