//! Search error type / 搜索错误

use thiserror::Error;

/// Failure talking to the index engine. Every variant means "no results for
/// this request"; the HTTP layer maps all of them to a generic failure.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Connection refused, DNS failure, timeout / 网络错误
    #[error("index engine unreachable: {0}")]
    Transport(String),
    /// Engine answered with a non-success status (e.g. rejected query)
    #[error("index engine returned {status}: {body}")]
    Engine { status: u16, body: String },
    /// Engine answered with a body that is not JSON
    #[error("invalid index engine response: {0}")]
    Decode(String),
    /// Backend refuses all requests (misconfigured or switched off)
    #[error("search unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SearchError::Decode(e.to_string())
        } else {
            SearchError::Transport(e.to_string())
        }
    }
}
