//! Search response schema / 搜索响应结构
//!
//! Engine side: a lenient reader for `{ hits: { total, hits: [{ _id, _source }] } }`.
//! Catalog side: flattened result items and the paginated page returned to clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One engine hit / 引擎命中
#[derive(Debug, Clone, PartialEq)]
pub struct EngineHit {
    pub id: String,
    pub source: Map<String, Value>,
}

/// What we could read out of an engine response / 引擎响应
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineResponse {
    pub hits: Vec<EngineHit>,
    /// True match count, if the engine reported one
    pub total: Option<u64>,
    /// Response had no usable `hits.hits` array
    pub malformed: bool,
}

impl EngineResponse {
    /// Never fails; missing or mistyped parts read as empty
    pub fn from_value(value: &Value) -> Self {
        let hits_obj = value.get("hits");

        // ES >= 7: { "value": n, "relation": "eq" }; ES 6: bare number
        let total = hits_obj
            .and_then(|h| h.get("total"))
            .and_then(|t| t.get("value").and_then(Value::as_u64).or_else(|| t.as_u64()));

        let (hits, malformed) = match hits_obj.and_then(|h| h.get("hits")).and_then(Value::as_array) {
            Some(list) => (list.iter().filter_map(EngineHit::from_value).collect(), false),
            None => (Vec::new(), true),
        };

        Self { hits, total, malformed }
    }
}

impl EngineHit {
    fn from_value(value: &Value) -> Option<Self> {
        let id = match value.get("_id")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let source = value
            .get("_source")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Some(Self { id, source })
    }
}

/// Search result item: engine id plus every source field / 搜索结果项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<EngineHit> for SearchResultItem {
    fn from(hit: EngineHit) -> Self {
        let mut fields = hit.source;
        // the engine id is authoritative
        fields.remove("id");
        Self { id: hit.id, fields }
    }
}

/// Pagination metadata / 分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl Pagination {
    pub fn new(current_page: u64, limit: u64, total_items: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total_items.div_ceil(limit) };
        Self {
            current_page,
            total_pages,
            total_items,
        }
    }
}

/// One page of search results / 搜索结果页
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponsePage {
    pub products: Vec<SearchResultItem>,
    pub pagination: Pagination,
}
