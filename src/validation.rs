// ハッシュタグ・コメントのバリデーション
// 入力イベントごとに呼ばれるため、すべて副作用のない純粋関数

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::config::{ui_text, validation};

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(validation::HASHTAG_PATTERN).expect("hashtag pattern should be valid")
});

/// ハッシュタグのルール違反（優先順位順に宣言）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashtagError {
    #[error("{}", ui_text::HASHTAG_MISSING_PREFIX)]
    MissingPrefix,

    #[error("{}", ui_text::HASHTAG_TOO_LONG)]
    TooLong,

    #[error("{}", ui_text::HASHTAG_NOT_SEPARATED)]
    NotSeparated,

    #[error("{}", ui_text::HASHTAG_DUPLICATE)]
    Duplicate,

    #[error("{}", ui_text::HASHTAG_TOO_MANY)]
    TooMany,

    #[error("{}", ui_text::HASHTAG_PREFIX_ONLY)]
    PrefixOnly,

    #[error("{}", ui_text::HASHTAG_INVALID_CHARS)]
    InvalidCharacters,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("{}", ui_text::DESCRIPTION_TOO_LONG)]
    TooLong { length: usize },
}

/// Form field covered by the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Hashtags,
    Description,
}

/// Outcome of validating one field. `message` is empty when `valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn passed() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            valid: false,
            message: error.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::passed()
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for ValidationResult {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::passed(),
            Err(e) => Self::failed(e),
        }
    }
}

/// 入力文字列をハッシュタグのトークン列に分解する
///
/// Lower-cases and splits on runs of whitespace. An empty or
/// whitespace-only input yields no tokens.
pub fn parse_hashtags(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(is_separator)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// Unicode whitespace plus the byte order mark, which browsers also treat as a separator
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Every rule the hashtag text violates, in priority order.
///
/// The first entry is the message a form shows; any entry at all makes the
/// field invalid.
pub fn hashtag_violations(text: &str) -> Vec<HashtagError> {
    let tags = parse_hashtags(text);
    if tags.is_empty() {
        return Vec::new();
    }

    let rules = [
        (
            tags.iter().any(|t| !t.starts_with(validation::HASHTAG_PREFIX)),
            HashtagError::MissingPrefix,
        ),
        (
            tags.iter().any(|t| t.chars().count() > validation::MAX_HASHTAG_LENGTH),
            HashtagError::TooLong,
        ),
        (
            tags.iter().any(|t| t.chars().skip(1).any(|c| c == validation::HASHTAG_PREFIX)),
            HashtagError::NotSeparated,
        ),
        (has_duplicates(&tags), HashtagError::Duplicate),
        (tags.len() > validation::MAX_HASHTAGS, HashtagError::TooMany),
        (
            tags.iter().any(|t| t.chars().eq(std::iter::once(validation::HASHTAG_PREFIX))),
            HashtagError::PrefixOnly,
        ),
        (
            tags.iter().any(|t| !HASHTAG_RE.is_match(t)),
            HashtagError::InvalidCharacters,
        ),
    ];

    rules
        .into_iter()
        .filter_map(|(violated, error)| violated.then_some(error))
        .collect()
}

fn has_duplicates(tags: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(tags.len());
    tags.iter().any(|t| !seen.insert(t.as_str()))
}

/// ハッシュタグを検証し、正規化済みトークンを返す
pub fn check_hashtags(text: &str) -> Result<Vec<String>, HashtagError> {
    match hashtag_violations(text).first() {
        Some(error) => Err(*error),
        None => Ok(parse_hashtags(text)),
    }
}

pub fn check_description(text: &str) -> Result<(), DescriptionError> {
    let length = text.chars().count();
    if length > validation::MAX_DESCRIPTION_LENGTH {
        return Err(DescriptionError::TooLong { length });
    }
    Ok(())
}

/// メインのハッシュタグ検証関数
pub fn validate_hashtags(text: &str) -> ValidationResult {
    check_hashtags(text).map(|_| ()).into()
}

/// メインのコメント検証関数
pub fn validate_description(text: &str) -> ValidationResult {
    check_description(text).into()
}

pub fn validate_field(field: Field, text: &str) -> ValidationResult {
    match field {
        Field::Hashtags => validate_hashtags(text),
        Field::Description => validate_description(text),
    }
}
