//! Search module - product search against the index engine / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - `query` turns filter parameters into an engine bool query (pure)
//! - `executor` sends it through an `IndexClient` and shapes the result page
//! - Call direction: API → Executor → IndexClient (unidirectional) / 调用方向
//!
//! Engine backends / 引擎后端：
//! - `client::HttpIndexClient`: Elasticsearch / OpenSearch over HTTP
//! - `memory::MemoryIndex`: in-process index for development and tests

pub mod client;
pub mod error;
pub mod executor;
pub mod filter;
pub mod memory;
pub mod query;
pub mod schema;

pub use client::{HttpIndexClient, IndexClient};
pub use error::SearchError;
pub use executor::{SearchExecutor, SearchOutcome};
pub use filter::{PriceRange, SearchFilter, SortDirection};
pub use memory::MemoryIndex;
pub use query::{BooleanQuery, QueryBuilder, Window};
pub use schema::{Pagination, SearchResponsePage, SearchResultItem};
