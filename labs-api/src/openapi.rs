//! OpenAPI Specification for the Labs API
//!
//! Generated with utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::{health, insights, invalid};

use labs_core::{
    MarketInsightResult, MarketInsightsResponse, MarketInvalidResponse, QuestionInvalidResponse,
};

/// OpenAPI document for the Labs API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Labs API",
        version = "0.2.0",
        description = "Cached market insights and invalidity checks for Omen prediction markets",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Insights", description = "Web-search backed summaries of market questions"),
        (name = "Invalid", description = "Invalidity verdicts for markets and questions"),
        (name = "Health", description = "Liveness and readiness probes")
    ),
    paths(
        insights::get_market_insights,
        invalid::get_market_invalid,
        invalid::get_question_invalid,
        health::legacy_ping,
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            ApiError, ErrorCode,
            MarketInsightsResponse, MarketInsightResult,
            MarketInvalidResponse, QuestionInvalidResponse,
            HealthResponse, HealthStatus, HealthDetails, ComponentHealth,
        )
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        let openapi = Self::openapi();
        serde_json::to_string_pretty(&openapi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() -> Result<(), String> {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "Labs API");

        let tags = openapi
            .tags
            .as_ref()
            .ok_or_else(|| "OpenAPI tags missing".to_string())?;
        assert_eq!(tags.len(), 3);

        let components = openapi
            .components
            .as_ref()
            .ok_or_else(|| "OpenAPI components missing".to_string())?;
        assert!(components.schemas.contains_key("MarketInsightsResponse"));
        assert!(components.schemas.contains_key("ApiError"));
        Ok(())
    }

    #[test]
    fn test_openapi_paths_exist() {
        let openapi = ApiDoc::openapi();
        for path in [
            "/market-insights",
            "/market-invalid",
            "/question-invalid",
            "/ping/",
            "/health/ready",
        ] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_openapi_json_serialization() -> Result<(), String> {
        let json = ApiDoc::to_json().map_err(|e| format!("Failed to serialize OpenAPI: {}", e))?;

        serde_json::from_str::<serde_json::Value>(&json)
            .map_err(|e| format!("Generated JSON invalid: {}", e))?;
        assert!(json.contains("market_id"));
        Ok(())
    }
}
