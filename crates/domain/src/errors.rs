use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 入力ボディがスキーマに一致しない
    #[error("Validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// 呼び出し側に返してよい説明文
    pub fn reason(&self) -> &str {
        match self {
            DomainError::Validation(reason) => reason,
        }
    }
}
