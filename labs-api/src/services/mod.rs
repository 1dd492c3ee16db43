//! Producers
//!
//! One [`Producer`](labs_storage::Producer) per result kind. Each one calls the
//! market indexer and the search/LLM providers to compute a fresh payload
//! when the cache has none.

pub mod insights;
pub mod invalid;

use std::sync::Arc;

use labs_core::{InvalidityClassifier, MarketLookup, SearchProvider, SummarizationProvider};
use labs_llm::{
    OpenAIClient, OpenAIInvalidityClassifier, OpenAISummarizationProvider, TavilySearchProvider,
};

use crate::config::ProviderConfig;
use crate::omen::OmenSubgraphLookup;

pub use insights::MarketInsightsProducer;
pub use invalid::{MarketInvalidProducer, QuestionInvalidProducer};

/// External services shared by the producers.
#[derive(Clone)]
pub struct Providers {
    pub markets: Arc<dyn MarketLookup>,
    pub search: Arc<dyn SearchProvider>,
    pub summarizer: Arc<dyn SummarizationProvider>,
    pub classifier: Arc<dyn InvalidityClassifier>,
}

impl Providers {
    /// Production providers: Omen subgraph, Tavily and OpenAI.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let openai = OpenAIClient::new(config.openai_api_key.clone(), 60);
        Self {
            markets: Arc::new(OmenSubgraphLookup::new(config.omen_subgraph_url.clone())),
            search: Arc::new(TavilySearchProvider::new(config.tavily_api_key.clone())),
            summarizer: Arc::new(OpenAISummarizationProvider::with_client(
                openai.clone(),
                config.openai_model.clone(),
            )),
            classifier: Arc::new(OpenAIInvalidityClassifier::with_client(
                openai,
                config.openai_model.clone(),
            )),
        }
    }
}
