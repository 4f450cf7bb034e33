use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TODO_NOT_FOUND_MESSAGE: &str = "Todo not found";
pub const NOT_FOUND_MESSAGE: &str = "Not found";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";

/// アプリケーション全体で使用されるエラー型
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // 入力ボディのスキーマ不一致
    #[error("Domain error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // インフラストラクチャエラー
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Domain(_) | AppError::NotFound(_) => ErrorCategory::Client,
            AppError::DynamoDb(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                ErrorCategory::Server
            }
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::Domain(_) => 400,
            AppError::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// ユーザー向けメッセージを取得
    ///
    /// サーバー側のエラーは詳細を含めず固定文言にする。
    pub fn user_message(&self) -> String {
        match self {
            AppError::Domain(err) => err.reason().to_string(),
            AppError::NotFound(message) => message.clone(),
            _ => INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
        }
    }
}

/// すべてのエラーレスポンスのボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn from_app_error(error: &AppError) -> Self {
        Self::new(error.user_message())
    }

    pub fn internal() -> Self {
        Self::new(INTERNAL_SERVER_ERROR_MESSAGE)
    }

    /// 失敗しないシリアライズ（フォールバック文字列を持つ）
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!(r#"{{"message":"{INTERNAL_SERVER_ERROR_MESSAGE}"}}"#))
    }
}
