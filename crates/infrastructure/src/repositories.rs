use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use domain::{Todo, TodoId, TodoUpdate};
use shared::telemetry::trace_store_operation;
use shared::AppError;
use thiserror::Error;

use crate::models::{attributes, item_to_todo, items_to_todos, todo_to_item, Item};
use crate::DynamoDbClient;

/// ストアとの通信・応答に関するエラー。リトライはしない。
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("scan failed: {0}")]
    Scan(String),

    #[error("get_item failed for {id}: {message}")]
    Get { id: String, message: String },

    #[error("put_item failed for {id}: {message}")]
    Put { id: String, message: String },

    #[error("update_item failed for {id}: {message}")]
    Update { id: String, message: String },

    #[error("delete_item failed for {id}: {message}")]
    Delete { id: String, message: String },

    #[error("update_item returned no attributes for {0}")]
    MissingAttributes(String),

    #[error("item could not be decoded: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::DynamoDb(e.to_string())
    }
}

/// Todo テーブルへの 5 操作。ハンドラが依存する唯一の境界。
///
/// 実装は条件式・楽観ロック・リトライを一切持たない。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 全件スキャン（順序はストア依存）
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError>;

    async fn get_todo(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// 無条件 put。既存キーの確認はしない。
    async fn put_todo(&self, todo: &Todo) -> Result<(), StoreError>;

    /// 無条件の `SET title, completed, updatedAt`。キーが無ければストアが部分レコードを作る。
    /// 戻り値は書き込み後の値（ALL_NEW）。
    async fn update_todo(&self, id: &TodoId, update: &TodoUpdate) -> Result<Todo, StoreError>;

    /// 無条件削除。存在しないキーでも成功する。
    async fn delete_todo(&self, id: &TodoId) -> Result<(), StoreError>;
}

pub struct DynamoDbTodoRepository {
    db: DynamoDbClient,
}

impl DynamoDbTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }

    fn key(id: &TodoId) -> (String, AttributeValue) {
        (
            attributes::ID.to_string(),
            AttributeValue::S(id.as_str().to_string()),
        )
    }

    async fn scan_all(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .db
                .client()
                .scan()
                .table_name(self.db.table_name())
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| StoreError::Scan(DisplayErrorContext(&e).to_string()))?;

            items.extend(output.items.unwrap_or_default());

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl TodoRepository for DynamoDbTodoRepository {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        let items = trace_store_operation(self.db.table_name(), "scan", None, || {
            self.scan_all()
        })
        .await?;

        items_to_todos(&items)
    }

    async fn get_todo(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let (key_name, key_value) = Self::key(id);

        let output = trace_store_operation(
            self.db.table_name(),
            "get_item",
            Some(id.as_str()),
            || async move {
                self.db
                    .client()
                    .get_item()
                    .table_name(self.db.table_name())
                    .key(key_name, key_value)
                    .send()
                    .await
                    .map_err(|e| StoreError::Get {
                        id: id.to_string(),
                        message: DisplayErrorContext(&e).to_string(),
                    })
            },
        )
        .await?;

        output.item.as_ref().map(item_to_todo).transpose()
    }

    async fn put_todo(&self, todo: &Todo) -> Result<(), StoreError> {
        trace_store_operation(
            self.db.table_name(),
            "put_item",
            Some(todo.id.as_str()),
            || async move {
                self.db
                    .client()
                    .put_item()
                    .table_name(self.db.table_name())
                    .set_item(Some(todo_to_item(todo)))
                    .send()
                    .await
                    .map_err(|e| StoreError::Put {
                        id: todo.id.to_string(),
                        message: DisplayErrorContext(&e).to_string(),
                    })
            },
        )
        .await?;

        Ok(())
    }

    async fn update_todo(&self, id: &TodoId, update: &TodoUpdate) -> Result<Todo, StoreError> {
        let (key_name, key_value) = Self::key(id);

        let output = trace_store_operation(
            self.db.table_name(),
            "update_item",
            Some(id.as_str()),
            || async move {
                self.db
                    .client()
                    .update_item()
                    .table_name(self.db.table_name())
                    .key(key_name, key_value)
                    .update_expression(
                        "SET #title = :title, #completed = :completed, #updatedAt = :updatedAt",
                    )
                    .expression_attribute_names("#title", attributes::TITLE)
                    .expression_attribute_names("#completed", attributes::COMPLETED)
                    .expression_attribute_names("#updatedAt", attributes::UPDATED_AT)
                    .expression_attribute_values(
                        ":title",
                        AttributeValue::S(update.title.clone()),
                    )
                    .expression_attribute_values(
                        ":completed",
                        AttributeValue::Bool(update.completed),
                    )
                    .expression_attribute_values(
                        ":updatedAt",
                        AttributeValue::S(update.updated_at.clone()),
                    )
                    .return_values(ReturnValue::AllNew)
                    .send()
                    .await
                    .map_err(|e| StoreError::Update {
                        id: id.to_string(),
                        message: DisplayErrorContext(&e).to_string(),
                    })
            },
        )
        .await?;

        let item = output
            .attributes
            .ok_or_else(|| StoreError::MissingAttributes(id.to_string()))?;
        item_to_todo(&item)
    }

    async fn delete_todo(&self, id: &TodoId) -> Result<(), StoreError> {
        let (key_name, key_value) = Self::key(id);

        trace_store_operation(
            self.db.table_name(),
            "delete_item",
            Some(id.as_str()),
            || async move {
                self.db
                    .client()
                    .delete_item()
                    .table_name(self.db.table_name())
                    .key(key_name, key_value)
                    .send()
                    .await
                    .map_err(|e| StoreError::Delete {
                        id: id.to_string(),
                        message: DisplayErrorContext(&e).to_string(),
                    })
            },
        )
        .await?;

        Ok(())
    }
}
