use thiserror::Error;

use crate::upload::UploadError;
use crate::validation::{DescriptionError, Field, HashtagError};

/// アプリケーション全体で使用する統一エラー型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// バリデーションエラーを作成
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 設定エラーを作成
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<HashtagError> for AppError {
    fn from(err: HashtagError) -> Self {
        AppError::validation(field_name(Field::Hashtags), err.to_string())
    }
}

impl From<DescriptionError> for AppError {
    fn from(err: DescriptionError) -> Self {
        AppError::validation(field_name(Field::Description), err.to_string())
    }
}

fn field_name(field: Field) -> &'static str {
    match field {
        Field::Hashtags => "hashtags",
        Field::Description => "description",
    }
}

/// アプリケーション全体で使用するResult型
pub type AppResult<T> = Result<T, AppError>;

/// エラーのカテゴリ分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// ユーザー操作エラー（修正可能）
    UserError,
    /// システムエラー（再試行可能）
    SystemError,
    /// 設定エラー（設定変更が必要）
    ConfigError,
}

impl AppError {
    /// エラーのカテゴリを取得
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Validation { .. } => ErrorCategory::UserError,
            AppError::Upload(_) => ErrorCategory::SystemError,
            AppError::Network(_) => ErrorCategory::SystemError,
            AppError::Io(_) => ErrorCategory::SystemError,
            AppError::UrlParse(_) => ErrorCategory::ConfigError,
            AppError::Configuration(_) => ErrorCategory::ConfigError,
            AppError::Serialization(_) => ErrorCategory::ConfigError,
        }
    }

    /// ユーザー向けメッセージを取得
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::Upload(_) | AppError::Network(_) => {
                "Не удалось отправить фотографию. Попробуйте ещё раз.".to_string()
            }
            AppError::Io(_) => "Ошибка при работе с файлом.".to_string(),
            AppError::UrlParse(_) => "Некорректный адрес сервера загрузки.".to_string(),
            AppError::Configuration(msg) => format!("Ошибка настроек: {msg}"),
            AppError::Serialization(_) => "Файл настроек повреждён.".to_string(),
        }
    }

    /// 再試行可能かどうか
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::SystemError)
    }
}

/// AppError を String に変換 (エラーメッセージの表示)
impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}
