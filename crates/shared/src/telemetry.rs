use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, info, warn};

/// リクエスト単位のトレーシング情報
#[derive(Debug, Clone)]
pub struct RequestTraceContext {
    pub request_id: String,
    pub trace_id: Option<String>,
}

impl RequestTraceContext {
    /// リクエストIDの採番とトレースIDの解決は呼び出し側で行う
    pub fn new(request_id: String, trace_id: Option<String>) -> Self {
        Self {
            request_id,
            trace_id,
        }
    }
}

/// HTTP リクエスト用のスパンを作成
pub fn create_request_span(method: &str, path: &str, context: &RequestTraceContext) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = method,
        path = path,
        request_id = %context.request_id,
        trace_id = %context.trace_id.as_deref().unwrap_or("none")
    )
}

/// HTTP レスポンスを記録
pub fn record_http_response(method: &str, path: &str, status_code: u16, duration_ms: u128) {
    if status_code >= 400 {
        warn!(
            method = method,
            path = path,
            status_code = status_code,
            duration_ms = duration_ms,
            "HTTP request failed"
        );
    } else {
        info!(
            method = method,
            path = path,
            status_code = status_code,
            duration_ms = duration_ms,
            "HTTP request completed"
        );
    }
}

/// ストア操作をトレース
///
/// 所要時間付きで記録し、結果はそのまま返す。エラーの記録は呼び出し元のハンドラで行う。
pub async fn trace_store_operation<T, E, F, Fut>(
    table_name: &str,
    operation_name: &str,
    todo_id: Option<&str>,
    operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start_time = Instant::now();
    let result = operation().await;
    let duration = start_time.elapsed();

    match &result {
        Ok(_) => {
            debug!(
                table = table_name,
                operation = operation_name,
                todo_id = todo_id,
                duration_ms = duration.as_millis(),
                "DynamoDB operation completed successfully"
            );
        }
        Err(e) => {
            warn!(
                table = table_name,
                operation = operation_name,
                todo_id = todo_id,
                duration_ms = duration.as_millis(),
                error = %e,
                "DynamoDB operation failed"
            );
        }
    }

    result
}
