//! 全ルート共通の前後処理
//!
//! リクエストは trace → validate → invoke の順に進み、log はその結果を記録する。
//! いずれも `Router::layer` で追加するのでルーティング後に実行され、
//! `MatchedPath` を参照できる。

use axum::{
    async_trait,
    body::{self, Body},
    extract::{FromRequestParts, MatchedPath, Request},
    http::{request::Parts, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::{validate_todo_input, DomainError, TodoInput};
use lambda_http::RequestExt;
use shared::telemetry::{create_request_span, record_http_response, RequestTraceContext};
use shared::AppError;
use std::time::Instant;
use tracing::{warn, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::router::{TODOS, TODO_ITEM};

/// 受け付けるボディの上限（API Gateway のペイロード上限に合わせる）
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const REQUEST_ID_HEADER: &str = "x-amzn-requestid";
const TRACE_ID_HEADER: &str = "x-amzn-trace-id";
const LAMBDA_TRACE_ENV: &str = "_X_AMZN_TRACE_ID";

/// このルートが入力スキーマを持つか
pub fn has_inbound_schema(method: &Method, matched_path: &str) -> bool {
    (*method == Method::POST && matched_path == TODOS)
        || (*method == Method::PUT && matched_path == TODO_ITEM)
}

/// validate: スキーマ付きルートのボディを検証し、結果を extensions に載せる。
/// 失敗時はハンドラを呼ばずに 400 を返す。
pub async fn validate_body(request: Request, next: Next) -> Response {
    let needs_schema = request
        .extensions()
        .get::<MatchedPath>()
        .is_some_and(|path| has_inbound_schema(request.method(), path.as_str()));

    if !needs_schema {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return reject(DomainError::Validation(
                "Request body could not be read".to_string(),
            ))
        }
    };

    match validate_todo_input(&bytes) {
        Ok(input) => {
            // 以降は extensions の入力だけを使うのでボディは空にする
            parts.extensions.insert(input);
            next.run(Request::from_parts(parts, Body::empty())).await
        }
        Err(e) => reject(e),
    }
}

fn reject(error: DomainError) -> Response {
    warn!(reason = error.reason(), "Request validation failed");
    ApiError::from(error).into_response()
}

/// trace: リクエスト単位のスパンを張り、以降の処理をその中で実行する
pub async fn trace_request(request: Request, next: Next) -> Response {
    let context = trace_context(&request);
    let span = create_request_span(
        request.method().as_str(),
        request.uri().path(),
        &context,
    );

    next.run(request).instrument(span).await
}

fn trace_context(request: &Request) -> RequestTraceContext {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    let request_id = request
        .lambda_context_ref()
        .map(|ctx| ctx.request_id.clone())
        .or_else(|| header(REQUEST_ID_HEADER))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let trace_id = header(TRACE_ID_HEADER).or_else(|| std::env::var(LAMBDA_TRACE_ENV).ok());

    RequestTraceContext::new(request_id, trace_id)
}

/// log: ステータスと所要時間を記録する
pub async fn log_response(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    record_http_response(
        method.as_str(),
        &path,
        response.status().as_u16(),
        started.elapsed().as_millis(),
    );

    response
}

/// validate ステップを通過した入力
///
/// ボディの再パースはしない。validate が動いていない構成では 500 になる。
#[derive(Debug, Clone)]
pub struct ValidatedTodo(pub TodoInput);

#[async_trait]
impl<S> FromRequestParts<S> for ValidatedTodo
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<TodoInput>()
            .map(ValidatedTodo)
            .ok_or_else(|| {
                tracing::error!("Handler requires a validated body but none was found");
                ApiError(AppError::Internal(
                    "request body was not validated".to_string(),
                ))
            })
    }
}
