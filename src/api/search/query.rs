use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use catalog_backend::search::SearchResponsePage;

use super::types::SearchParams;
use crate::api::ApiResponse;
use crate::state::AppState;

/// GET /v1/api/search - 商品搜索
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<ApiResponse<SearchResponsePage>>) {
    let filter = params.into_filter(state.max_limit());

    match state.search.search_page(&filter).await {
        Ok(page) => (StatusCode::OK, Json(ApiResponse::success(page))),
        Err(e) => {
            tracing::error!("Search failed on index {}: {}", state.search.index(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Error searching products")),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request, Router};
    use catalog_backend::config::AppConfig;
    use catalog_backend::models::Product;
    use catalog_backend::search::{MemoryIndex, SearchExecutor};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::router;
    use crate::state::AppState;

    fn app(index: Arc<MemoryIndex>) -> Router {
        let config = AppConfig::default();
        let search = SearchExecutor::new(index, config.search.index.clone());
        router(Arc::new(AppState::new(config, search)))
    }

    fn catalog() -> Arc<MemoryIndex> {
        let index = Arc::new(MemoryIndex::new());
        for i in 0..12 {
            let product = Product::new(format!("Runner {}", i), 100_000.0 + i as f64 * 5_000.0, "Shoes");
            index.index_product("products", Some(format!("r{}", i)), &product).unwrap();
        }
        let mut sneakers = Product::new("Sneakers", 350_000.0, "Sport");
        sneakers.image = Some("/img/sneakers.png".to_string());
        sneakers.tags = vec!["street".to_string()];
        index.index_product("products", Some("sn".into()), &sneakers).unwrap();
        index
    }

    async fn get(app: Router, uri: &str) -> (u16, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_search_envelope_and_pagination() {
        let (status, body) = get(
            app(catalog()),
            "/v1/api/search?category=Shoes&priceRange=200&page=1&limit=5",
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["products"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"]["pagination"]["currentPage"], 1);
        assert_eq!(body["data"]["pagination"]["totalItems"], 12);
        assert_eq!(body["data"]["pagination"]["totalPages"], 3);
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_products_are_flattened() {
        let (status, body) = get(app(catalog()), "/v1/api/search?keyword=sneaker").await;

        assert_eq!(status, 200);
        let products = body["data"]["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["id"], "sn");
        assert_eq!(products[0]["name"], "Sneakers");
        assert_eq!(products[0]["image"], "/img/sneakers.png");
        assert_eq!(products[0]["tags"][0], "street");
    }

    #[tokio::test]
    async fn test_engine_failure_is_500() {
        let index = catalog();
        index.fail_with(Some("timed out".to_string()));

        let (status, body) = get(app(index), "/v1/api/search?keyword=runner").await;
        assert_eq!(status, 500);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Error searching products");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_malformed_params_degrade() {
        let (_, unknown) = get(app(catalog()), "/v1/api/search?priceRange=9999&sortPrice=ASC&page=zero&limit=-1").await;
        let (_, plain) = get(app(catalog()), "/v1/api/search").await;

        assert_eq!(unknown, plain);
        assert_eq!(plain["data"]["pagination"]["totalItems"], 13);
        assert_eq!(plain["data"]["products"].as_array().unwrap().len(), 10);
    }
}
