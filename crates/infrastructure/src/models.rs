use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoId};
use std::collections::HashMap;

use crate::repositories::StoreError;

pub type Item = HashMap<String, AttributeValue>;

/// テーブルの属性名（JSON のフィールド名と同じ camelCase）
pub mod attributes {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const COMPLETED: &str = "completed";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

pub fn todo_to_item(todo: &Todo) -> Item {
    let mut item = HashMap::new();
    item.insert(
        attributes::ID.to_string(),
        AttributeValue::S(todo.id.as_str().to_string()),
    );
    item.insert(
        attributes::TITLE.to_string(),
        AttributeValue::S(todo.title.clone()),
    );
    item.insert(
        attributes::COMPLETED.to_string(),
        AttributeValue::Bool(todo.completed),
    );
    if let Some(created_at) = &todo.created_at {
        item.insert(
            attributes::CREATED_AT.to_string(),
            AttributeValue::S(created_at.clone()),
        );
    }
    item.insert(
        attributes::UPDATED_AT.to_string(),
        AttributeValue::S(todo.updated_at.clone()),
    );
    item
}

pub fn item_to_todo(item: &Item) -> Result<Todo, StoreError> {
    Ok(Todo {
        id: TodoId::from_string(required_string(item, attributes::ID)?),
        title: required_string(item, attributes::TITLE)?,
        completed: required_bool(item, attributes::COMPLETED)?,
        created_at: optional_string(item, attributes::CREATED_AT)?,
        updated_at: required_string(item, attributes::UPDATED_AT)?,
    })
}

/// スキャン結果をまとめて変換する。一件でも変換できなければ全体を失敗にする。
pub fn items_to_todos(items: &[Item]) -> Result<Vec<Todo>, StoreError> {
    items.iter().map(item_to_todo).collect()
}

fn required_string(item: &Item, name: &str) -> Result<String, StoreError> {
    optional_string(item, name)?
        .ok_or_else(|| StoreError::Decode(format!("missing attribute '{name}'")))
}

fn optional_string(item: &Item, name: &str) -> Result<Option<String>, StoreError> {
    match item.get(name) {
        None => Ok(None),
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(_) => Err(StoreError::Decode(format!(
            "attribute '{name}' is not a string"
        ))),
    }
}

fn required_bool(item: &Item, name: &str) -> Result<bool, StoreError> {
    match item.get(name) {
        Some(AttributeValue::Bool(value)) => Ok(*value),
        Some(_) => Err(StoreError::Decode(format!(
            "attribute '{name}' is not a boolean"
        ))),
        None => Err(StoreError::Decode(format!("missing attribute '{name}'"))),
    }
}
