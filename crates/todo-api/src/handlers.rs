use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{Todo, TodoId, TodoUpdate};
use infrastructure::StoreError;
use serde::Serialize;
use shared::{ErrorResponse, TODO_NOT_FOUND_MESSAGE};
use tracing::error;

use crate::error::ApiError;
use crate::middleware::ValidatedTodo;
use crate::state::AppState;

/// ストアエラーを文脈付きで記録し、そのまま伝播させる
fn store_failure<'a>(
    context: &'static str,
    todo_id: Option<&'a TodoId>,
) -> impl FnOnce(StoreError) -> ApiError + 'a {
    move |e| {
        error!(
            error = %e,
            todo_id = todo_id.map(TodoId::as_str),
            "{context}"
        );
        ApiError::from(e)
    }
}

/// GET /v2/todos
pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state
        .repo
        .list_todos()
        .await
        .map_err(store_failure("Failed to list todos", None))?;

    Ok(Json(todos))
}

/// GET /v2/todos/{todo_id}
pub async fn get_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = TodoId::from_string(todo_id);

    let todo = state
        .repo
        .get_todo(&id)
        .await
        .map_err(store_failure("Failed to get todo", Some(&id)))?;

    // 見つからないのは異常ではないのでエラーログは出さない
    match todo {
        Some(todo) => Ok(Json(todo).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(TODO_NOT_FOUND_MESSAGE)),
        )
            .into_response()),
    }
}

/// POST /v2/todos
pub async fn create_todo(
    State(state): State<AppState>,
    ValidatedTodo(input): ValidatedTodo,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = Todo::create(input);

    state
        .repo
        .put_todo(&todo)
        .await
        .map_err(store_failure("Failed to create todo", Some(&todo.id)))?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /v2/todos/{todo_id}
///
/// 存在確認はしない。`completed` を省略すると false で上書きされる。
pub async fn update_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
    ValidatedTodo(input): ValidatedTodo,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::from_string(todo_id);
    let update = TodoUpdate::from_input(input);

    let todo = state
        .repo
        .update_todo(&id, &update)
        .await
        .map_err(store_failure("Failed to update todo", Some(&id)))?;

    Ok(Json(todo))
}

/// DELETE /v2/todos/{todo_id}
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(todo_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TodoId::from_string(todo_id);

    state
        .repo
        .delete_todo(&id)
        .await
        .map_err(store_failure("Failed to delete todo", Some(&id)))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct HealthBody {
    /// サービスの簡易ステータス
    status: &'static str,
}

/// ヘルスチェック用ハンドラ
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}
