//! プロセス内の Todo ストア（開発/テスト用）
//!
//! DynamoDB と同じ観測可能な挙動を再現する: 無条件 put、更新時の upsert
//! （`createdAt` なしの部分レコード）、存在しないキーの削除も成功。

use async_trait::async_trait;
use domain::{Todo, TodoId, TodoUpdate};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::repositories::{StoreError, TodoRepository};

#[derive(Default)]
pub struct InMemoryTodoRepository {
    items: Mutex<HashMap<String, Todo>>,
    // put 呼び出しの履歴（テスト観測用）
    puts: Mutex<Vec<Todo>>,
    // Some の間はすべての操作がこのメッセージで失敗する
    failure: Option<String>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に失敗するストア
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn put_calls(&self) -> Vec<Todo> {
        lock(&self.puts).clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        self.check_available()?;
        Ok(lock(&self.items).values().cloned().collect())
    }

    async fn get_todo(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        self.check_available()?;
        Ok(lock(&self.items).get(id.as_str()).cloned())
    }

    async fn put_todo(&self, todo: &Todo) -> Result<(), StoreError> {
        self.check_available()?;
        lock(&self.puts).push(todo.clone());
        lock(&self.items).insert(todo.id.as_str().to_string(), todo.clone());
        Ok(())
    }

    async fn update_todo(&self, id: &TodoId, update: &TodoUpdate) -> Result<Todo, StoreError> {
        self.check_available()?;
        let mut items = lock(&self.items);
        let todo = items
            .entry(id.as_str().to_string())
            .or_insert_with(|| Todo {
                id: id.clone(),
                title: update.title.clone(),
                completed: update.completed,
                created_at: None,
                updated_at: update.updated_at.clone(),
            });

        todo.title = update.title.clone();
        todo.completed = update.completed;
        todo.updated_at = update.updated_at.clone();

        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: &TodoId) -> Result<(), StoreError> {
        self.check_available()?;
        lock(&self.items).remove(id.as_str());
        Ok(())
    }
}
