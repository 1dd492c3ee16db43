//! Market Insights Routes
//!
//! `GET /market-insights?market_id=0x…` returns the cached insights for an
//! Omen market, computing them on a miss.

use axum::{
    extract::{Query, State},
    Json,
};
use labs_core::{MarketId, MarketInsightsResponse};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::InsightsService;

/// Query string of the market-keyed endpoints.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct MarketQuery {
    /// Market address: `0x` followed by 40 hex characters.
    pub market_id: Option<String>,
}

impl MarketQuery {
    /// Validate the market id before anything touches the cache.
    pub fn market_id(&self) -> ApiResult<MarketId> {
        let raw = self
            .market_id
            .as_deref()
            .ok_or_else(|| ApiError::missing_field("market_id"))?;
        Ok(MarketId::parse(raw)?)
    }
}

/// GET /market-insights - Market insights for an Omen market
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/market-insights",
    tag = "Insights",
    params(MarketQuery),
    responses(
        (status = 200, description = "Market insights", body = MarketInsightsResponse),
        (status = 400, description = "Malformed market id", body = ApiError),
        (status = 404, description = "Market not found", body = ApiError),
        (status = 500, description = "Upstream failure", body = ApiError),
    ),
))]
pub async fn get_market_insights(
    State(service): State<InsightsService>,
    Query(query): Query<MarketQuery>,
) -> ApiResult<Json<MarketInsightsResponse>> {
    let market_id = query.market_id()?;
    let read = service.read(&market_id).await?;

    tracing::debug!(
        %market_id,
        cache_hit = read.was_cache_hit(),
        persisted = read.was_persisted(),
        "Served market insights"
    );
    Ok(Json(read.into_value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_market_query_validation() {
        let missing = MarketQuery { market_id: None };
        assert_eq!(missing.market_id().unwrap_err().code, ErrorCode::MissingField);

        let malformed = MarketQuery {
            market_id: Some("0x00".to_string()),
        };
        assert_eq!(malformed.market_id().unwrap_err().code, ErrorCode::InvalidFormat);

        let valid = MarketQuery {
            market_id: Some("0x1D0A2D7B1E6A2E5C8F9A0B1C2D3E4F5A6B7C8D9E".to_string()),
        };
        assert_eq!(
            valid.market_id().unwrap().as_str(),
            "0x1d0a2d7b1e6a2e5c8f9a0b1c2d3e4f5a6b7c8d9e"
        );
    }
}
