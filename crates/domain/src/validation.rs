//! 受信ボディのスキーマ検証
//!
//! `{"title": string (必須), "completed": boolean (任意)}` の構造だけを検査する。
//! 空文字の title は拒否しない。未知のフィールドは無視する。

use serde_json::{Map, Value};

use crate::errors::DomainError;
use crate::todo::TodoInput;

pub const TITLE_FIELD: &str = "title";
pub const COMPLETED_FIELD: &str = "completed";

/// 生のボディを検証して `TodoInput` を返す
pub fn validate_todo_input(body: &[u8]) -> Result<TodoInput, DomainError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| DomainError::Validation("Request body is not valid JSON".to_string()))?;

    let object = value.as_object().ok_or_else(|| {
        DomainError::Validation("Request body must be a JSON object".to_string())
    })?;

    validate_object(object)
}

fn validate_object(object: &Map<String, Value>) -> Result<TodoInput, DomainError> {
    let title = match object.get(TITLE_FIELD) {
        None => {
            return Err(DomainError::Validation(format!(
                "Missing required field: {TITLE_FIELD}"
            )))
        }
        Some(Value::String(title)) => title.clone(),
        Some(_) => {
            return Err(DomainError::Validation(format!(
                "Field '{TITLE_FIELD}' must be a string"
            )))
        }
    };

    let completed = match object.get(COMPLETED_FIELD) {
        None => None,
        Some(Value::Bool(completed)) => Some(*completed),
        Some(_) => {
            return Err(DomainError::Validation(format!(
                "Field '{COMPLETED_FIELD}' must be a boolean"
            )))
        }
    };

    Ok(TodoInput { title, completed })
}
