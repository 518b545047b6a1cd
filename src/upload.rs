use std::future::Future;
use std::path::Path;
use std::str::FromStr;

use log::{info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::upload;
use crate::settings::UploadSettings;
use crate::{AppError, AppResult};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Network request failed: {source}")]
    Network { source: reqwest::Error },

    #[error("HTTP error: {status}")]
    Status { status: u16 },

    #[error("Invalid upload payload: {message}")]
    InvalidPayload { message: String },
}

/// Methods the upload endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            other => Err(AppError::config(format!("Unsupported upload method: {other}"))),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

/// The image the user picked in the file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = guess_content_type(&name).map(str::to_string);
        Self {
            name,
            content_type,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// ディスク上のファイルを読み込む
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(Self::new(name, bytes))
    }
}

fn guess_content_type(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Form contents captured at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub file: SelectedFile,
    pub hashtags: String,
    pub description: String,
}

impl UploadPayload {
    fn into_form(self) -> Result<Form, UploadError> {
        let content_type = self
            .file
            .content_type
            .as_deref()
            .unwrap_or(upload::FALLBACK_CONTENT_TYPE)
            .to_string();
        let part = Part::bytes(self.file.bytes)
            .file_name(self.file.name)
            .mime_str(&content_type)
            .map_err(|e| UploadError::InvalidPayload {
                message: format!("content type {content_type}: {e}"),
            })?;

        Ok(Form::new()
            .part(upload::FIELD_FILE, part)
            .text(upload::FIELD_HASHTAGS, self.hashtags)
            .text(upload::FIELD_DESCRIPTION, self.description))
    }
}

/// Sends one submission and resolves exactly once with its outcome.
pub trait Uploader {
    fn upload(
        &self,
        method: HttpMethod,
        payload: UploadPayload,
    ) -> impl Future<Output = Result<(), UploadError>> + Send;
}

/// Multipart uploader backed by reqwest.
pub struct HttpUploader {
    client: Client,
    endpoint: Url,
}

impl HttpUploader {
    pub fn new(settings: &UploadSettings) -> AppResult<Self> {
        let endpoint = settings.endpoint_url()?;
        let client = Client::builder().timeout(settings.timeout()).build()?;

        Ok(HttpUploader { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Uploader for HttpUploader {
    async fn upload(&self, method: HttpMethod, payload: UploadPayload) -> Result<(), UploadError> {
        let file_name = payload.file.name.clone();
        let form = payload.into_form()?;

        info!(
            "Uploading {file_name} with {} to {}",
            method.as_str(),
            self.endpoint
        );

        let response = self
            .client
            .request(method.into(), self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|source| UploadError::Network { source })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upload of {file_name} failed with HTTP {status}");
            return Err(UploadError::Status {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
