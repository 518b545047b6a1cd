// 写真アップロードフォーム: 入力バリデーションとエディタの状態管理

pub mod api_types;
mod config;
pub mod editor;
pub mod errors;
pub mod settings;
pub mod upload;
pub mod validation;

pub use editor::{
    ClickTarget, EditorSessionState, EscapeOutcome, FocusTarget, PendingUpload, PhotoEditor,
    PopupKind, Scale, SubmitRejected, UploadCompletion,
};
pub use errors::{AppError, AppResult};
pub use settings::UploadSettings;
pub use upload::{HttpMethod, HttpUploader, SelectedFile, UploadError, UploadPayload, Uploader};
pub use validation::{validate_description, validate_hashtags, Field, ValidationResult};

/// Initializes env_logger for hosts embedding the form (`RUST_LOG` controls the filter).
///
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Loads the user's upload settings and builds a ready editor and uploader pair.
pub fn build_from_settings() -> AppResult<(PhotoEditor, HttpUploader)> {
    let settings = UploadSettings::load()?;
    let uploader = HttpUploader::new(&settings)?;
    log::info!("Uploads go to {}", uploader.endpoint());
    Ok((PhotoEditor::from_settings(&settings), uploader))
}
