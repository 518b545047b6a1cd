// Configuration constants for the photo upload form
// This module centralizes all magic numbers and user-facing strings

/// Application configuration constants
pub mod app {
    /// Name of the application data directory
    pub const DATA_DIR_NAME: &str = "PhotoUploadForm";

    /// Settings file name inside the data directory
    pub const SETTINGS_FILENAME: &str = "config.json";

    /// Environment variable overriding the upload endpoint
    pub const ENDPOINT_ENV: &str = "PHOTO_UPLOAD_ENDPOINT";
}

/// Hashtag and description limits
pub mod validation {
    /// Maximum length of one hashtag, including the leading `#`
    pub const MAX_HASHTAG_LENGTH: usize = 20;

    /// Maximum number of hashtags per photo
    pub const MAX_HASHTAGS: usize = 5;

    /// Maximum description length in characters
    pub const MAX_DESCRIPTION_LENGTH: usize = 140;

    /// Allowed shape of a single, already lower-cased hashtag
    pub const HASHTAG_PATTERN: &str = r"^#[a-zа-яё0-9]{0,19}$";

    /// Hashtag prefix character
    pub const HASHTAG_PREFIX: char = '#';
}

/// Preview zoom configuration, in whole percent
pub mod scale {
    /// Zoom step
    pub const STEP: u8 = 25;

    /// Smallest allowed zoom
    pub const MIN: u8 = 25;

    /// Largest allowed zoom (also the value on open and reset)
    pub const MAX: u8 = 100;

    /// Image transform after a reset
    pub const TRANSFORM_NONE: &str = "none";
}

/// Upload request configuration
pub mod upload {
    /// Default backend endpoint
    pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/upload";

    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Multipart field carrying the image
    pub const FIELD_FILE: &str = "filename";

    /// Multipart field carrying the hashtag text
    pub const FIELD_HASHTAGS: &str = "hashtags";

    /// Multipart field carrying the description text
    pub const FIELD_DESCRIPTION: &str = "description";

    /// Fallback content type for files with an unknown type
    pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
}

/// UI text constants
pub mod ui_text {
    /// Hashtag does not start with `#`
    pub const HASHTAG_MISSING_PREFIX: &str = "Хэштег должен начинаться с символа #";

    /// Hashtag longer than the limit
    pub const HASHTAG_TOO_LONG: &str =
        "Максимальная длина одного хэштега 20 символов, включая решётку";

    /// Two hashtags glued together without a space
    pub const HASHTAG_NOT_SEPARATED: &str = "Хэштеги разделяются пробелами";

    /// Same hashtag used twice
    pub const HASHTAG_DUPLICATE: &str = "Хэштег не может повторяться";

    /// Too many hashtags
    pub const HASHTAG_TOO_MANY: &str = "Нельзя указать больше 5 хэштегов";

    /// Hashtag consisting of `#` only
    pub const HASHTAG_PREFIX_ONLY: &str = "Хэштег не может состоять только из символа #";

    /// Hashtag containing characters outside the allowed alphabet
    pub const HASHTAG_INVALID_CHARS: &str = "Хэштег содержит недопустимые символы";

    /// Description longer than the limit
    pub const DESCRIPTION_TOO_LONG: &str = "Максимальная длина комментария 140 символов";

    /// Error popup title
    pub const POPUP_ERROR_TITLE: &str = "Ошибка загрузки файла";

    /// Error popup button
    pub const POPUP_ERROR_BUTTON: &str = "Попробовать ещё раз";

    /// Success popup title
    pub const POPUP_SUCCESS_TITLE: &str = "Изображение успешно загружено";

    /// Success popup button
    pub const POPUP_SUCCESS_BUTTON: &str = "Круто!";
}
