use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::ui_text;

/// 送信結果のポップアップ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PopupKind {
    Error,
    Success,
}

impl PopupKind {
    pub fn title(self) -> &'static str {
        match self {
            PopupKind::Error => ui_text::POPUP_ERROR_TITLE,
            PopupKind::Success => ui_text::POPUP_SUCCESS_TITLE,
        }
    }

    pub fn button_text(self) -> &'static str {
        match self {
            PopupKind::Error => ui_text::POPUP_ERROR_BUTTON,
            PopupKind::Success => ui_text::POPUP_SUCCESS_BUTTON,
        }
    }
}

/// Where a click on an attached popup landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Overlay around the message box
    Backdrop,
    /// The message box's own button
    Button,
    /// The message box itself (title, padding)
    Inner,
}

impl ClickTarget {
    pub fn dismisses(self) -> bool {
        !matches!(self, ClickTarget::Inner)
    }
}
