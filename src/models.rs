use serde::{Deserialize, Serialize};

/// Product document as stored in the product index / 商品索引文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub stock: u64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub purchase_count: u64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub average_rating: f64,
}

fn default_active() -> bool { true }

impl Product {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            image: None,
            description: None,
            tags: Vec::new(),
            brand: None,
            stock: 0,
            is_active: true,
            view_count: 0,
            favorite_count: 0,
            purchase_count: 0,
            review_count: 0,
            average_rating: 0.0,
        }
    }
}

/// Entry of a seed file: a product plus an optional fixed document id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub product: Product,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let mut product = Product::new("Sneakers", 150000.0, "Shoes");
        product.tags = vec!["running".to_string()];

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["name"], "Sneakers");
        assert_eq!(value["isActive"], true);
        assert_eq!(value["viewCount"], 0);
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_seed_product_defaults() {
        let seed: SeedProduct = serde_json::from_str(
            r#"{ "id": "p-1", "name": "Boots", "price": 90000, "category": "Shoes" }"#,
        )
        .unwrap();

        assert_eq!(seed.id.as_deref(), Some("p-1"));
        assert_eq!(seed.product.category, "Shoes");
        assert!(seed.product.is_active);
        assert!(seed.product.tags.is_empty());
    }
}
