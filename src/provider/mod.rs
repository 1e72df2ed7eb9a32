//! Search result providers
//!
//! The orchestrator only depends on [`SearchProvider`]; the SerpApi client
//! is the production implementation.

mod serpapi;
mod types;

pub use serpapi::SerpApiProvider;
pub use types::{ProviderPage, SearchQuery, SearchResult};

use async_trait::async_trait;

use crate::error::StillbrookResult;

/// Fetches one page of search results
///
/// Implementations must report a missing credential as
/// [`StillbrookError::Configuration`](crate::error::StillbrookError::Configuration)
/// and provider-side failures as
/// [`StillbrookError::Upstream`](crate::error::StillbrookError::Upstream).
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn fetch(&self, query: &SearchQuery) -> StillbrookResult<ProviderPage>;
}
