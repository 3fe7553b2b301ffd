//! In-memory index engine / 内存索引引擎
//!
//! Answers the same `_search` body the HTTP engine receives, for local
//! development and tests. Supported query shape:
//! - `bool.must`: `match` clauses (`fuzziness: "AUTO"` or exact)
//! - `bool.filter`: `term` and `range` (`lte`/`lt`/`gte`/`gt`) clauses
//! - `sort`: `[{ field: { order } }]` on numeric fields
//! - `from` / `size` window, `hits.total.value` is the full match count
//!
//! Anything else is rejected with a 400, like a real engine would.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Map, Value};

use super::client::IndexClient;
use super::error::SearchError;
use crate::models::{Product, SeedProduct};

/// Stored document / 存储的文档
#[derive(Debug, Clone)]
struct StoredDoc {
    id: String,
    source: Map<String, Value>,
}

/// In-memory index engine / 内存搜索引擎
pub struct MemoryIndex {
    /// index name -> documents in insertion order / 索引名 -> 文档
    indices: RwLock<HashMap<String, Vec<StoredDoc>>>,
    next_id: AtomicU64,
    /// When set, every search fails with this message
    failure: RwLock<Option<String>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self {
            indices: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            failure: RwLock::new(None),
        }
    }

    /// Index a single document, replacing any document with the same id.
    /// Returns the document id.
    pub fn index_document(&self, index: &str, id: Option<String>, source: Map<String, Value>) -> String {
        let id = id.unwrap_or_else(|| self.next_id.fetch_add(1, AtomicOrdering::SeqCst).to_string());
        let mut indices = self.indices.write();
        let docs = indices.entry(index.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => existing.source = source,
            None => docs.push(StoredDoc { id: id.clone(), source }),
        }
        id
    }

    /// Index a catalog product / 索引商品
    pub fn index_product(&self, index: &str, id: Option<String>, product: &Product) -> Result<String, String> {
        let source = match serde_json::to_value(product).map_err(|e| e.to_string())? {
            Value::Object(map) => map,
            _ => return Err("product did not serialize to an object".to_string()),
        };
        Ok(self.index_document(index, id, source))
    }

    /// Index a batch of seed products / 批量索引
    pub fn index_batch(&self, index: &str, seeds: Vec<SeedProduct>) -> Result<usize, String> {
        let mut indexed = 0;
        for seed in seeds {
            self.index_product(index, seed.id, &seed.product)?;
            indexed += 1;
        }
        Ok(indexed)
    }

    /// Load a JSON array of products from disk / 从文件加载种子数据
    pub fn load_seed_file(&self, index: &str, path: &Path) -> Result<usize, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read seed file {:?}: {}", path, e))?;
        let seeds: Vec<SeedProduct> = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse seed file {:?}: {}", path, e))?;
        self.index_batch(index, seeds)
    }

    /// Make subsequent searches fail (`None` restores normal operation)
    pub fn fail_with(&self, message: Option<String>) {
        *self.failure.write() = message;
    }

    /// Clear an index / 清空索引
    pub fn clear(&self, index: &str) {
        self.indices.write().remove(index);
    }

    pub fn document_count(&self, index: &str) -> usize {
        self.indices.read().get(index).map(|d| d.len()).unwrap_or(0)
    }

    fn execute(&self, index: &str, body: &Value) -> Result<Value, SearchError> {
        let from = body.get("from").and_then(Value::as_u64).unwrap_or(0) as usize;
        let size = body.get("size").and_then(Value::as_u64).unwrap_or(10) as usize;

        let bool_query = body.get("query").and_then(|q| q.get("bool"));
        let must = clause_list(bool_query, "must")?;
        let filter = clause_list(bool_query, "filter")?;
        let sort = parse_sort(body.get("sort"))?;

        let indices = self.indices.read();
        let docs = indices.get(index).map(Vec::as_slice).unwrap_or(&[]);

        let mut matched: Vec<(&StoredDoc, f64)> = Vec::new();
        'docs: for doc in docs {
            for clause in filter {
                if !filter_matches(clause, &doc.source)? {
                    continue 'docs;
                }
            }
            let mut score = if must.is_empty() { 1.0 } else { 0.0 };
            for clause in must {
                match match_score(clause, &doc.source)? {
                    Some(s) => score += s,
                    None => continue 'docs,
                }
            }
            matched.push((doc, score));
        }

        // stable sorts: ties keep insertion order
        if sort.is_empty() {
            matched.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        } else {
            matched.sort_by(|a, b| compare_by_sort(&sort, &a.0.source, &b.0.source));
        }

        let total = matched.len();
        let max_score = matched.iter().map(|(_, s)| *s).fold(None, |acc: Option<f64>, s| {
            Some(acc.map_or(s, |m| m.max(s)))
        });

        let hits: Vec<Value> = matched
            .into_iter()
            .skip(from)
            .take(size)
            .map(|(doc, score)| {
                // explicit sorts are unscored
                let score = if sort.is_empty() { json!(score) } else { Value::Null };
                json!({
                    "_index": index,
                    "_id": doc.id,
                    "_score": score,
                    "_source": doc.source,
                })
            })
            .collect();

        Ok(json!({
            "hits": {
                "total": { "value": total, "relation": "eq" },
                "max_score": max_score,
                "hits": hits,
            }
        }))
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IndexClient for MemoryIndex {
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError> {
        let failure = self.failure.read().clone();
        if let Some(message) = failure {
            return Err(SearchError::Transport(message));
        }
        self.execute(index, body)
    }

    async fn ping(&self) -> Result<(), SearchError> {
        let failure = self.failure.read().clone();
        match failure {
            Some(message) => Err(SearchError::Transport(message)),
            None => Ok(()),
        }
    }
}

fn bad_request(message: impl Into<String>) -> SearchError {
    SearchError::Engine { status: 400, body: message.into() }
}

fn clause_list<'a>(bool_query: Option<&'a Value>, key: &str) -> Result<&'a [Value], SearchError> {
    match bool_query.and_then(|b| b.get(key)) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(list)) => Ok(list.as_slice()),
        Some(other) => Err(bad_request(format!("bool.{} must be an array, got {}", key, other))),
    }
}

/// Single-key object `{ key: value }`
fn single_entry(value: &Value) -> Option<(&String, &Value)> {
    let obj = value.as_object()?;
    if obj.len() == 1 {
        obj.iter().next()
    } else {
        None
    }
}

fn filter_matches(clause: &Value, source: &Map<String, Value>) -> Result<bool, SearchError> {
    let (kind, inner) = single_entry(clause).ok_or_else(|| bad_request("malformed filter clause"))?;
    let (field, expected) = single_entry(inner).ok_or_else(|| bad_request(format!("malformed {} clause", kind)))?;
    match kind.as_str() {
        "term" => {
            // { term: { field: value } } or { term: { field: { value } } }
            let expected = expected.get("value").unwrap_or(expected);
            Ok(source.get(field) == Some(expected))
        }
        "range" => {
            let bounds = expected.as_object().ok_or_else(|| bad_request("range bounds must be an object"))?;
            let actual = match source.get(field).and_then(Value::as_f64) {
                Some(v) => v,
                None => return Ok(false),
            };
            for (op, bound) in bounds {
                let bound = bound.as_f64().ok_or_else(|| bad_request(format!("range {} must be numeric", op)))?;
                let ok = match op.as_str() {
                    "lte" => actual <= bound,
                    "lt" => actual < bound,
                    "gte" => actual >= bound,
                    "gt" => actual > bound,
                    other => return Err(bad_request(format!("unsupported range operator {}", other))),
                };
                if !ok {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        other => Err(bad_request(format!("unsupported filter clause {}", other))),
    }
}

/// Score of a `match` clause, `None` if the document does not match
fn match_score(clause: &Value, source: &Map<String, Value>) -> Result<Option<f64>, SearchError> {
    let (kind, inner) = single_entry(clause).ok_or_else(|| bad_request("malformed must clause"))?;
    if kind != "match" {
        return Err(bad_request(format!("unsupported must clause {}", kind)));
    }
    let (field, params) = single_entry(inner).ok_or_else(|| bad_request("malformed match clause"))?;
    let (query, fuzzy) = match params {
        Value::String(q) => (q.as_str(), false),
        Value::Object(p) => (
            p.get("query").and_then(Value::as_str).ok_or_else(|| bad_request("match query must be a string"))?,
            p.get("fuzziness").and_then(Value::as_str) == Some("AUTO"),
        ),
        _ => return Err(bad_request("malformed match clause")),
    };

    let field_tokens = tokenize(source.get(field).and_then(Value::as_str).unwrap_or(""));
    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return Ok(None);
    }

    // OR across query terms, exact hits outscore fuzzy ones
    let mut score = 0.0;
    for token in &query_tokens {
        let max_distance = if fuzzy { auto_fuzziness(token) } else { 0 };
        let best = field_tokens
            .iter()
            .filter_map(|t| {
                if t == token {
                    Some(2.0)
                } else if max_distance > 0 && fuzzy_match(token, t, max_distance) {
                    Some(1.0)
                } else {
                    None
                }
            })
            .fold(0.0, f64::max);
        score += best;
    }

    Ok(if score > 0.0 { Some(score) } else { None })
}

#[derive(Debug)]
struct SortKey {
    field: String,
    descending: bool,
}

fn parse_sort(sort: Option<&Value>) -> Result<Vec<SortKey>, SearchError> {
    let list = match sort {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(list)) => list,
        Some(_) => return Err(bad_request("sort must be an array")),
    };
    list.iter()
        .map(|entry| {
            let (field, inner) = single_entry(entry).ok_or_else(|| bad_request("malformed sort entry"))?;
            let order = inner.get("order").and_then(Value::as_str).or_else(|| inner.as_str()).unwrap_or("asc");
            let descending = match order {
                "asc" => false,
                "desc" => true,
                other => return Err(bad_request(format!("unsupported sort order {}", other))),
            };
            Ok(SortKey { field: field.clone(), descending })
        })
        .collect()
}

fn compare_by_sort(sort: &[SortKey], a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    for key in sort {
        let ordering = match (a.get(&key.field).and_then(Value::as_f64), b.get(&key.field).and_then(Value::as_f64)) {
            (Some(x), Some(y)) => {
                let o = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                if key.descending { o.reverse() } else { o }
            }
            // documents without the field sort last either way
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Lowercased alphanumeric words / 分词
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// `AUTO` edit distance: 0 for 1-2 chars, 1 for 3-5, 2 above
fn auto_fuzziness(term: &str) -> usize {
    match term.chars().count() {
        0..=2 => 0,
        3..=5 => 1,
        _ => 2,
    }
}

/// 简单的编辑距离模糊匹配
fn fuzzy_match(s1: &str, s2: &str, max_distance: usize) -> bool {
    if s1 == s2 {
        return true;
    }

    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    // 长度差太大直接返回
    if len1.abs_diff(len2) > max_distance {
        return false;
    }

    levenshtein_distance(s1, s2) <= max_distance
}

/// 计算 Levenshtein 编辑距离
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 { return len2; }
    if len2 == 0 { return len1; }

    // two rows are enough
    let mut prev: Vec<usize> = (0..=len2).collect();
    let mut curr = vec![0usize; len2 + 1];

    for i in 1..=len1 {
        curr[0] = i;
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[len2]
}
