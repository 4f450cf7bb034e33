//! Todo CRUD API（axum）
//!
//! `/v2/todos` 配下の 5 ルートを `TodoRepository` の 5 操作に対応付ける。
//! Lambda 上では `lambda_http` から、ローカルでは `axum::serve` から同じルータを提供する。

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::app;
pub use state::AppState;
