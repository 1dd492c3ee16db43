//! Omen subgraph market lookup.
//!
//! Resolves a market address to its question title through the Omen
//! subgraph's GraphQL endpoint.

use async_trait::async_trait;
use labs_core::{LabsResult, Market, MarketError, MarketId, MarketLookup};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MARKET_QUERY: &str = r#"query getFixedProductMarketMaker($id: ID!) {
  fixedProductMarketMaker(id: $id) {
    id
    title
  }
}"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: MarketVariables<'a>,
}

#[derive(Debug, Serialize)]
struct MarketVariables<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<MarketData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketData {
    fixed_product_market_maker: Option<FixedProductMarketMaker>,
}

#[derive(Debug, Deserialize)]
struct FixedProductMarketMaker {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// [`MarketLookup`] backed by the Omen subgraph.
#[derive(Debug, Clone)]
pub struct OmenSubgraphLookup {
    client: Client,
    url: String,
}

impl OmenSubgraphLookup {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn lookup_failed(id: &MarketId, reason: impl Into<String>) -> MarketError {
    MarketError::LookupFailed {
        market_id: id.to_string(),
        reason: reason.into(),
    }
}

/// Turn a decoded subgraph answer into a market.
fn market_from_response(id: &MarketId, response: GraphQlResponse) -> LabsResult<Market> {
    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(lookup_failed(id, messages.join("; ")).into());
    }

    let data = response
        .data
        .ok_or_else(|| lookup_failed(id, "response has no data"))?;

    let Some(fpmm) = data.fixed_product_market_maker else {
        return Err(MarketError::NotFound {
            market_id: id.to_string(),
        }
        .into());
    };

    let question_title = fpmm
        .title
        .ok_or_else(|| lookup_failed(id, "market has no title"))?;

    Ok(Market {
        id: id.clone(),
        question_title,
    })
}

#[async_trait]
impl MarketLookup for OmenSubgraphLookup {
    async fn get_market(&self, id: &MarketId) -> LabsResult<Market> {
        let request = GraphQlRequest {
            query: MARKET_QUERY,
            variables: MarketVariables { id: id.as_str() },
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| lookup_failed(id, format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(lookup_failed(id, format!("subgraph returned status {}", status)).into());
        }

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|e| lookup_failed(id, format!("Failed to parse response: {}", e)))?;

        let market = market_from_response(id, body)?;
        tracing::debug!(
            market_id = %id,
            title = %market.question_title,
            "Fetched market from subgraph"
        );
        Ok(market)
    }
}
