//! Search executor - runs built queries against the index engine / 搜索执行器
//!
//! One request, one engine call. No caching, no retries: a failed engine call
//! is returned as-is and the request yields no products.

use std::sync::Arc;

use super::client::IndexClient;
use super::error::SearchError;
use super::filter::SearchFilter;
use super::query::QueryBuilder;
use super::schema::{EngineResponse, Pagination, SearchResponsePage, SearchResultItem};

/// Products of one window plus the engine's full match count
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub items: Vec<SearchResultItem>,
    pub total: u64,
}

/// Search executor / 搜索执行器
#[derive(Clone)]
pub struct SearchExecutor {
    client: Arc<dyn IndexClient>,
    index: String,
}

impl SearchExecutor {
    pub fn new(client: Arc<dyn IndexClient>, index: impl Into<String>) -> Self {
        Self {
            client,
            index: index.into(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn client(&self) -> &Arc<dyn IndexClient> {
        &self.client
    }

    /// Run the filter and flatten the hits of the requested window
    pub async fn search(&self, filter: &SearchFilter) -> Result<SearchOutcome, SearchError> {
        let query = QueryBuilder::build(filter);
        tracing::debug!(
            "Search {}: must={} filter={} sort={} from={} size={}",
            self.index,
            query.must.len(),
            query.filter.len(),
            query.sort.len(),
            query.window.from,
            query.window.size
        );

        let raw = self.client.search(&self.index, &query.to_request_body()).await?;
        let response = EngineResponse::from_value(&raw);
        if response.malformed {
            tracing::warn!("Index engine response for {} has no hit list, treating as empty", self.index);
        }

        // without a reported total, the window end is the best lower bound;
        // an empty window says nothing about earlier pages
        let total = match response.total {
            Some(total) => total,
            None if response.hits.is_empty() => 0,
            None => query.window.from.saturating_add(response.hits.len() as u64),
        };

        let items = response.hits.into_iter().map(SearchResultItem::from).collect();
        Ok(SearchOutcome { items, total })
    }

    /// Run the filter and attach pagination metadata from the true total
    pub async fn search_page(&self, filter: &SearchFilter) -> Result<SearchResponsePage, SearchError> {
        let outcome = self.search(filter).await?;
        Ok(SearchResponsePage {
            pagination: Pagination::new(filter.page, filter.limit, outcome.total),
            products: outcome.items,
        })
    }
}
