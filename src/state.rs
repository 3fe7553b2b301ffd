use std::path::Path;
use std::sync::Arc;

use catalog_backend::config::{AppConfig, SearchBackend};
use catalog_backend::search::{HttpIndexClient, IndexClient, MemoryIndex, SearchExecutor};

pub struct AppState {
    pub config: AppConfig,
    pub search: SearchExecutor,
}

impl AppState {
    pub fn new(config: AppConfig, search: SearchExecutor) -> Self {
        Self { config, search }
    }

    /// Build the index engine client named by the config / 根据配置创建搜索引擎
    pub fn from_config(config: AppConfig) -> Result<Self, String> {
        let client: Arc<dyn IndexClient> = match config.search.backend {
            SearchBackend::Elasticsearch => {
                tracing::info!("Index engine: {} (index {})", config.search.url, config.search.index);
                Arc::new(HttpIndexClient::new(&config.search).map_err(|e| e.to_string())?)
            }
            SearchBackend::Memory => {
                let index = MemoryIndex::new();
                if let Some(ref seed_file) = config.search.seed_file {
                    let count = index.load_seed_file(&config.search.index, Path::new(seed_file))?;
                    tracing::info!("Memory index seeded with {} products from {}", count, seed_file);
                } else {
                    tracing::warn!("Memory index has no seed_file, searches will return nothing");
                }
                Arc::new(index)
            }
        };

        let search = SearchExecutor::new(client, config.search.index.clone());
        Ok(Self::new(config, search))
    }

    /// Effective `limit` cap / 单页上限
    pub fn max_limit(&self) -> u64 {
        self.config.search.max_limit.max(1) as u64
    }
}
