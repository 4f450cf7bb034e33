use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Todo の主キー（UUID v4 文字列）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub String);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// パスパラメータなど外部から受け取った値をそのまま包む。
    /// ストアのキーは任意の文字列なので形式は検査しない。
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 現在時刻を ISO-8601 (UTC, マイクロ秒, `Z` 付き) で返す
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 永続化される Todo レコード
///
/// 存在しない id に対する更新はストア側で部分レコードを作るため、
/// `createdAt` を持たないレコードがあり得る。その場合 JSON からも省かれる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub updated_at: String,
}

impl Todo {
    /// 新しい id とタイムスタンプを割り当てて作成する。
    /// `createdAt` と `updatedAt` は同一の時刻を共有する。
    pub fn create(input: TodoInput) -> Self {
        let timestamp = timestamp_now();
        Self {
            id: TodoId::new(),
            completed: input.completed_or_default(),
            title: input.title,
            created_at: Some(timestamp.clone()),
            updated_at: timestamp,
        }
    }
}

/// 作成・更新で共通の入力ボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoInput {
    pub fn completed_or_default(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// 更新式 `SET title, completed, updatedAt` に渡す値
///
/// 部分更新ではない。`completed` を省略した更新は `false` を書き込む。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    pub completed: bool,
    pub updated_at: String,
}

impl TodoUpdate {
    pub fn from_input(input: TodoInput) -> Self {
        Self {
            completed: input.completed_or_default(),
            title: input.title,
            updated_at: timestamp_now(),
        }
    }
}
