//! Index engine client / 搜索引擎客户端
//!
//! The engine is an external Elasticsearch / OpenSearch compatible service.
//! Only the `_search` call and a liveness ping are used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::error::SearchError;
use crate::config::SearchConfig;

const USER_AGENT: &str = concat!("catalog-backend/", env!("CARGO_PKG_VERSION"));

/// Index engine capability / 搜索引擎能力
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Run a search body against `index` and return the raw engine response
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError>;

    /// Check the engine is reachable
    async fn ping(&self) -> Result<(), SearchError>;
}

/// HTTP client for the engine REST API / HTTP 搜索引擎客户端
pub struct HttpIndexClient {
    base_url: Url,
    client: Client,
    username: Option<String>,
    password: Option<String>,
}

impl HttpIndexClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let base_url = Url::parse(config.url.trim_end_matches('/'))
            .map_err(|e| SearchError::Unavailable(format!("invalid engine url {:?}: {}", config.url, e)))?;

        // keep-alive pool is reqwest's; timeout is the only limit applied
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            client,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// `{base}/{index}/_search`
    pub fn search_url(&self, index: &str) -> Result<Url, SearchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SearchError::Unavailable(format!("engine url cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push(index)
            .push("_search");
        Ok(url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_ref()),
            None => builder,
        }
    }
}

#[async_trait]
impl IndexClient for HttpIndexClient {
    async fn search(&self, index: &str, body: &Value) -> Result<Value, SearchError> {
        let url = self.search_url(index)?;
        let resp = self.request(self.client.post(url).json(body)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SearchError::Engine { status: status.as_u16(), body: text });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))
    }

    async fn ping(&self) -> Result<(), SearchError> {
        let resp = self.request(self.client.get(self.base_url.clone())).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SearchError::Engine { status: status.as_u16(), body: String::new() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(url: &str) -> HttpIndexClient {
        let config = SearchConfig { url: url.to_string(), ..SearchConfig::default() };
        HttpIndexClient::new(&config).unwrap()
    }

    #[test]
    fn test_search_url() {
        let client = client_for("http://localhost:9200");
        assert_eq!(client.search_url("products").unwrap().as_str(), "http://localhost:9200/products/_search");

        let client = client_for("https://es.internal:9243/cluster-a/");
        assert_eq!(
            client.search_url("products").unwrap().as_str(),
            "https://es.internal:9243/cluster-a/products/_search"
        );
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = SearchConfig { url: "not a url".to_string(), ..SearchConfig::default() };
        assert!(matches!(HttpIndexClient::new(&config), Err(SearchError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_transport_error() {
        // port 9 (discard) is closed on test hosts
        let config = SearchConfig {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..SearchConfig::default()
        };
        let client = HttpIndexClient::new(&config).unwrap();
        let err = client.search("products", &serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)), "{:?}", err);
    }
}
