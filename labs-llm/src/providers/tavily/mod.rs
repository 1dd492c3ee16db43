//! Tavily web-search provider.

pub mod client;
pub mod types;

pub use client::{TavilyClient, TavilySearchProvider};
