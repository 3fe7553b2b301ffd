//! Query builder - maps a [`SearchFilter`] onto an engine bool query / 查询构建
//!
//! Pure and infallible. Every rule below is applied independently:
//! - keyword  -> fuzzy `match` on `name` (scored, goes into `must`)
//! - category -> `term` on `category` (unscored, goes into `filter`)
//! - priceRange -> `range` `price <= ceiling` (unscored, goes into `filter`)
//! - sortPrice -> single `price` sort; otherwise the engine's relevance order

use serde_json::{json, Value};

use super::filter::{PriceRange, SearchFilter, SortDirection};

/// Result window requested from the engine / 分页窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: u64,
    pub size: u64,
}

impl Window {
    /// `from = (page - 1) * limit`; page 0 is read as page 1
    pub fn for_page(page: u64, limit: u64) -> Self {
        Self {
            from: page.saturating_sub(1).saturating_mul(limit),
            size: limit,
        }
    }
}

/// Bool query plus sort and window / 布尔查询
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanQuery {
    /// Clauses that contribute to the score
    pub must: Vec<Value>,
    /// Clauses that only constrain
    pub filter: Vec<Value>,
    /// Empty means engine default (relevance) ordering
    pub sort: Vec<Value>,
    pub window: Window,
}

impl BooleanQuery {
    /// Body for the engine's `_search` endpoint
    pub fn to_request_body(&self) -> Value {
        json!({
            "from": self.window.from,
            "size": self.window.size,
            "sort": self.sort,
            "track_total_hits": true,
            "query": {
                "bool": {
                    "must": self.must,
                    "filter": self.filter,
                }
            }
        })
    }
}

pub struct QueryBuilder;

impl QueryBuilder {
    pub fn build(filter: &SearchFilter) -> BooleanQuery {
        let mut must = Vec::new();
        let mut clauses = Vec::new();

        if let Some(keyword) = non_blank(&filter.keyword) {
            must.push(json!({
                "match": {
                    "name": {
                        "query": keyword,
                        "fuzziness": "AUTO"
                    }
                }
            }));
        }

        if let Some(category) = non_empty(&filter.category) {
            clauses.push(json!({ "term": { "category": category } }));
        }

        if let Some(range) = filter.price_range.as_deref().and_then(PriceRange::from_bucket) {
            clauses.push(json!({ "range": { "price": { "lte": range.ceiling() } } }));
        }

        let sort = match filter.sort_price.as_deref().and_then(SortDirection::parse) {
            Some(direction) => vec![json!({ "price": { "order": direction.as_str() } })],
            None => Vec::new(),
        };

        BooleanQuery {
            must,
            filter: clauses,
            sort,
            window: Window::for_page(filter.page, filter.limit),
        }
    }
}

/// Keyword whitespace is not significant
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Category is matched as given; only the empty string is absent
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter() {
        let query = QueryBuilder::build(&SearchFilter::default().with_limit(25));
        assert!(query.must.is_empty());
        assert!(query.filter.is_empty());
        assert!(query.sort.is_empty());
        assert_eq!(query.window, Window { from: 0, size: 25 });
    }

    #[test]
    fn test_keyword_is_fuzzy_name_match() {
        let query = QueryBuilder::build(&SearchFilter::default().with_keyword("sneaker"));
        assert_eq!(
            query.must,
            vec![json!({ "match": { "name": { "query": "sneaker", "fuzziness": "AUTO" } } })]
        );
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_blank_keyword_adds_nothing() {
        for keyword in ["", "   "] {
            let query = QueryBuilder::build(&SearchFilter::default().with_keyword(keyword));
            assert!(query.must.is_empty(), "keyword {:?}", keyword);
        }
    }

    #[test]
    fn test_category_is_exact_term() {
        let query = QueryBuilder::build(&SearchFilter::default().with_category("Shoes"));
        assert_eq!(query.filter, vec![json!({ "term": { "category": "Shoes" } })]);
        assert!(query.must.is_empty());
    }

    #[test]
    fn test_category_is_sent_untrimmed() {
        let query = QueryBuilder::build(&SearchFilter::default().with_category("  "));
        assert_eq!(query.filter, vec![json!({ "term": { "category": "  " } })]);

        let query = QueryBuilder::build(&SearchFilter::default().with_category(""));
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_price_buckets() {
        for (bucket, ceiling) in [
            ("100", 100_000u64),
            ("200", 200_000),
            ("500", 500_000),
            ("1000", 1_000_000),
            ("2000", 2_000_000),
        ] {
            let query = QueryBuilder::build(&SearchFilter::default().with_price_range(bucket));
            assert_eq!(query.filter, vec![json!({ "range": { "price": { "lte": ceiling } } })]);
        }
    }

    #[test]
    fn test_unknown_price_bucket_is_same_as_none() {
        let plain = QueryBuilder::build(&SearchFilter::default());
        for bucket in ["9999", "", "abc", "1000000"] {
            let query = QueryBuilder::build(&SearchFilter::default().with_price_range(bucket));
            assert_eq!(query, plain, "bucket {:?}", bucket);
        }
    }

    #[test]
    fn test_category_and_price_are_combined() {
        let query = QueryBuilder::build(
            &SearchFilter::default()
                .with_category("Shoes")
                .with_price_range("200"),
        );
        assert_eq!(
            query.filter,
            vec![
                json!({ "term": { "category": "Shoes" } }),
                json!({ "range": { "price": { "lte": 200_000 } } }),
            ]
        );
    }

    #[test]
    fn test_sort_price() {
        let asc = QueryBuilder::build(&SearchFilter::default().with_sort_price("asc"));
        assert_eq!(asc.sort, vec![json!({ "price": { "order": "asc" } })]);

        let desc = QueryBuilder::build(&SearchFilter::default().with_sort_price("desc"));
        assert_eq!(desc.sort, vec![json!({ "price": { "order": "desc" } })]);

        for other in ["", "ASC", "Desc", "price"] {
            let query = QueryBuilder::build(&SearchFilter::default().with_sort_price(other));
            assert!(query.sort.is_empty(), "sortPrice {:?}", other);
        }
    }

    #[test]
    fn test_window_follows_page() {
        assert_eq!(Window::for_page(1, 10).from, 0);
        assert_eq!(Window::for_page(3, 10).from, 20);
        assert_eq!(Window::for_page(2, 5), Window { from: 5, size: 5 });
        assert_eq!(Window::for_page(0, 10).from, 0);
    }

    #[test]
    fn test_request_body_shape() {
        let body = QueryBuilder::build(
            &SearchFilter::default()
                .with_keyword("bag")
                .with_sort_price("desc")
                .with_page(2)
                .with_limit(5),
        )
        .to_request_body();

        assert_eq!(body["from"], 5);
        assert_eq!(body["size"], 5);
        assert_eq!(body["track_total_hits"], true);
        assert_eq!(body["sort"][0]["price"]["order"], "desc");
        assert_eq!(body["query"]["bool"]["must"].as_array().unwrap().len(), 1);
        assert!(body["query"]["bool"]["filter"].as_array().unwrap().is_empty());
    }
}
