use serde::Deserialize;

use catalog_backend::search::filter::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_PAGE};
use catalog_backend::search::SearchFilter;

/// 搜索请求参数 (query string, all raw strings)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub sort_price: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

impl SearchParams {
    /// Non-positive or unparsable page/limit fall back to the defaults;
    /// page is capped at `MAX_PAGE` and limit at `max_limit`
    pub fn into_filter(self, max_limit: u64) -> SearchFilter {
        SearchFilter {
            keyword: self.keyword,
            category: self.category,
            price_range: self.price_range,
            sort_price: self.sort_price,
            page: positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE).min(MAX_PAGE),
            limit: positive(self.limit.as_deref()).unwrap_or(DEFAULT_LIMIT).min(max_limit),
        }
    }
}

fn positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> SearchParams {
        SearchParams {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            ..SearchParams::default()
        }
    }

    #[test]
    fn test_page_and_limit_fallback() {
        let filter = params(None, None).into_filter(100);
        assert_eq!((filter.page, filter.limit), (1, 10));

        for bad in ["0", "-2", "abc", "", "1.5"] {
            let filter = params(Some(bad), Some(bad)).into_filter(100);
            assert_eq!((filter.page, filter.limit), (1, 10), "value {:?}", bad);
        }

        let filter = params(Some("3"), Some(" 20 ")).into_filter(100);
        assert_eq!((filter.page, filter.limit), (3, 20));
    }

    #[test]
    fn test_limit_is_capped() {
        let filter = params(None, Some("5000")).into_filter(100);
        assert_eq!(filter.limit, 100);
    }

    #[test]
    fn test_page_is_capped() {
        let filter = params(Some("18446744073709551615"), Some("100")).into_filter(100);
        assert_eq!(filter.page, MAX_PAGE);
        assert_eq!(filter.limit, 100);
    }

    #[test]
    fn test_enum_fields_pass_through_raw() {
        let filter = SearchParams {
            price_range: Some("9999".to_string()),
            sort_price: Some("ASC".to_string()),
            ..SearchParams::default()
        }
        .into_filter(100);
        assert_eq!(filter.price_range.as_deref(), Some("9999"));
        assert_eq!(filter.sort_price.as_deref(), Some("ASC"));
    }
}
