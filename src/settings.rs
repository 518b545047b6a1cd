use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{app, upload};
use crate::upload::HttpMethod;
use crate::{AppError, AppResult};

/// Where and how submissions are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadSettings {
    pub endpoint: String,
    pub method: HttpMethod,
    pub timeout_secs: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            endpoint: upload::DEFAULT_ENDPOINT.to_string(),
            method: HttpMethod::default(),
            timeout_secs: upload::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl UploadSettings {
    /// 設定ファイルのパス（データディレクトリ配下）
    pub fn settings_path() -> PathBuf {
        dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(app::DATA_DIR_NAME)
            .join(app::SETTINGS_FILENAME)
    }

    /// 設定を読み込む。ファイルが無い場合はデフォルト値
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Loads the user settings file and applies the endpoint environment override.
    pub fn load() -> AppResult<Self> {
        let settings = Self::load_from(&Self::settings_path())?
            .with_endpoint_override(std::env::var(app::ENDPOINT_ENV).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            debug!("Upload endpoint overridden by {}", app::ENDPOINT_ENV);
            self.endpoint = endpoint.trim().to_string();
        }
        self
    }

    pub fn endpoint_url(&self) -> AppResult<Url> {
        let url = Url::parse(&self.endpoint)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(AppError::config(format!(
                "Upload endpoint must use http or https, got {scheme}"
            ))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> AppResult<()> {
        self.endpoint_url()?;
        if self.timeout_secs == 0 {
            return Err(AppError::config("Upload timeout must be at least one second"));
        }
        Ok(())
    }
}
