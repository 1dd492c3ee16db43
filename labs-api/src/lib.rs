//! Labs API - HTTP Layer
//!
//! Axum server exposing cached market insights and invalidity verdicts for
//! Omen prediction markets. Each endpoint reads through a
//! [`labs_storage::ResponseCache`] and only calls the market indexer and the
//! search/LLM providers on a miss.

pub mod config;
pub mod error;
pub mod macros;
pub mod omen;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ApiConfig, ProviderConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use omen::OmenSubgraphLookup;
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_router;
pub use services::Providers;
pub use state::AppState;
