//! Invalidity Routes
//!
//! - `GET /market-invalid?market_id=0x…` classifies an Omen market's question
//! - `GET /question-invalid?question=…` classifies a free-text question

use axum::{
    extract::{Query, State},
    Json,
};
use labs_core::{normalize_question, MarketInvalidResponse, QuestionInvalidResponse};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::routes::insights::MarketQuery;
use crate::state::{MarketInvalidService, QuestionInvalidService};

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct QuestionQuery {
    /// Question text; surrounding whitespace is ignored.
    pub question: Option<String>,
}

impl QuestionQuery {
    pub fn question(&self) -> ApiResult<String> {
        let raw = self
            .question
            .as_deref()
            .ok_or_else(|| ApiError::missing_field("question"))?;
        Ok(normalize_question(raw)?)
    }
}

/// GET /market-invalid - Invalidity verdict for an Omen market
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/market-invalid",
    tag = "Invalid",
    params(MarketQuery),
    responses(
        (status = 200, description = "Invalidity verdict", body = MarketInvalidResponse),
        (status = 400, description = "Malformed market id", body = ApiError),
        (status = 404, description = "Market not found", body = ApiError),
        (status = 500, description = "Upstream failure", body = ApiError),
    ),
))]
pub async fn get_market_invalid(
    State(service): State<MarketInvalidService>,
    Query(query): Query<MarketQuery>,
) -> ApiResult<Json<MarketInvalidResponse>> {
    let market_id = query.market_id()?;
    let read = service.read(&market_id).await?;

    tracing::debug!(
        %market_id,
        cache_hit = read.was_cache_hit(),
        "Served market invalidity"
    );
    Ok(Json(read.into_value()))
}

/// GET /question-invalid - Invalidity verdict for a question
///
/// Answers 200 with `invalid: null` when the classifier is unavailable.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/question-invalid",
    tag = "Invalid",
    params(QuestionQuery),
    responses(
        (status = 200, description = "Invalidity verdict", body = QuestionInvalidResponse),
        (status = 400, description = "Missing or oversized question", body = ApiError),
    ),
))]
pub async fn get_question_invalid(
    State(service): State<QuestionInvalidService>,
    Query(query): Query<QuestionQuery>,
) -> ApiResult<Json<QuestionInvalidResponse>> {
    let question = query.question()?;
    let read = service.read(question.as_str()).await?;

    tracing::debug!(
        cache_hit = read.was_cache_hit(),
        invalid = ?read.value().invalid,
        "Served question invalidity"
    );
    Ok(Json(read.into_value()))
}
