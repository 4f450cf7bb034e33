use std::env;

use crate::errors::AppError;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub environment: String,
    /// 未設定なら SDK の既定チェーンに従う
    pub aws_region: Option<String>,
    /// DynamoDB Local などへ向ける場合のみ
    pub dynamodb_endpoint: Option<String>,
    /// Lambda 以外で起動したときの待ち受けポート
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を組み立てる（テストでは環境変数を汚さずに使う）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup("TABLE_NAME")
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("TABLE_NAME must be set".to_string()))?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Configuration(format!("PORT is not a valid port: {raw}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            table_name,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            aws_region: lookup("AWS_REGION"),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT"),
            port,
        })
    }
}
