use infrastructure::TodoRepository;
use std::sync::Arc;

/// Shared application state
///
/// ストアクライアントは起動時に一度だけ作られ、全リクエストで読み取り専用に共有される。
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}
