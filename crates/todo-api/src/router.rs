use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::{handle_panic, method_not_allowed, not_found};
use crate::handlers;
use crate::middleware::{log_response, trace_request, validate_body};
use crate::state::AppState;

// Route path constants - single source of truth for all API paths
pub const HEALTH: &str = "/health";
pub const TODOS: &str = "/v2/todos";
pub const TODO_ITEM: &str = "/v2/todos/:todo_id";

/// ルータを構築して返します。
///
/// レイヤは上から外側: trace → log → panic 捕捉 → validate → (ハンドラ)。
/// 400 の検証エラーや panic 由来の 500 も `http_request` スパン内でステータスが記録される。
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(handlers::health).fallback(method_not_allowed))
        .route(
            TODOS,
            get(handlers::list_todos)
                .post(handlers::create_todo)
                .fallback(method_not_allowed),
        )
        .route(
            TODO_ITEM,
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo)
                .fallback(method_not_allowed),
        )
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(trace_request))
                .layer(middleware::from_fn(log_response))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(middleware::from_fn(validate_body)),
        )
        .with_state(state)
}
