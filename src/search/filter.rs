//! Search filter parameters / 搜索过滤参数
//!
//! All fields are optional and independent. A missing field never narrows
//! the result set. Enumerated fields are kept as the raw strings the client
//! sent; unknown values are dropped when the query is built.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Highest page accepted from clients / 最大页码
pub const MAX_PAGE: u64 = 10_000;

/// Search filter / 搜索过滤条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Free text matched against the product name / 商品名称关键词
    #[serde(default)]
    pub keyword: Option<String>,
    /// Exact category, case-sensitive / 分类（精确匹配）
    #[serde(default)]
    pub category: Option<String>,
    /// Price ceiling bucket in thousands: "100", "200", "500", "1000", "2000"
    #[serde(default)]
    pub price_range: Option<String>,
    /// "asc" or "desc"; anything else keeps relevance order
    #[serde(default)]
    pub sort_price: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            keyword: None,
            category: None,
            price_range: None,
            sort_price: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchFilter {
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price_range(mut self, bucket: impl Into<String>) -> Self {
        self.price_range = Some(bucket.into());
        self
    }

    pub fn with_sort_price(mut self, direction: impl Into<String>) -> Self {
        self.sort_price = Some(direction.into());
        self
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}

/// Price bucket / 价格区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    UpTo100K,
    UpTo200K,
    UpTo500K,
    UpTo1M,
    UpTo2M,
}

impl PriceRange {
    /// Map a bucket name to its range; unknown names yield `None`
    pub fn from_bucket(bucket: &str) -> Option<Self> {
        match bucket {
            "100" => Some(Self::UpTo100K),
            "200" => Some(Self::UpTo200K),
            "500" => Some(Self::UpTo500K),
            "1000" => Some(Self::UpTo1M),
            "2000" => Some(Self::UpTo2M),
            _ => None,
        }
    }

    /// Inclusive price ceiling / 价格上限（含）
    pub fn ceiling(&self) -> u64 {
        match self {
            Self::UpTo100K => 100_000,
            Self::UpTo200K => 200_000,
            Self::UpTo500K => 500_000,
            Self::UpTo1M => 1_000_000,
            Self::UpTo2M => 2_000_000,
        }
    }
}

/// Price sort direction / 价格排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Exact, case-sensitive match on "asc" / "desc"
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}
