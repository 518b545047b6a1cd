use log::{debug, info, warn};
use thiserror::Error;

use crate::api_types::{EditorSnapshot, FieldView, PopupView, ScaleView};
use crate::editor::listeners::{Listener, ListenerRegistry};
use crate::editor::popup::{ClickTarget, PopupKind};
use crate::editor::scale::{ImageTransform, Scale};
use crate::editor::session::EditorSessionState;
use crate::settings::UploadSettings;
use crate::upload::{HttpMethod, SelectedFile, UploadError, UploadPayload, Uploader};
use crate::validation::{validate_description, validate_hashtags, Field};

/// Identifies one submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

/// A dispatched submission the host must resolve with [`PhotoEditor::finish_upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub id: SubmissionId,
    pub method: HttpMethod,
    pub payload: UploadPayload,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("the photo editor is not open")]
    NotOpen,

    #[error("a submission is already in flight")]
    AlreadySubmitting,

    #[error("no file selected")]
    MissingFile,

    #[error("{field:?}: {message}")]
    Invalid { field: Field, message: String },
}

/// How an upload result was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCompletion {
    /// Editor closed and reset, success popup shown
    Succeeded,
    /// Editor kept open with its fields, error popup shown
    Failed,
    /// Result of a submission the session no longer waits for; only the popup is shown
    Stale,
}

/// Element holding keyboard focus when escape is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    HashtagsField,
    DescriptionField,
    Other,
}

impl FocusTarget {
    fn is_text_field(self) -> bool {
        matches!(self, FocusTarget::HashtagsField | FocusTarget::DescriptionField)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    PopupDismissed,
    EditorClosed,
    Ignored,
}

/// Photo editor modal: open/zoom/edit/submit/result lifecycle.
///
/// All input arrives as discrete calls from the host; the controller is the
/// only writer of its [`EditorSessionState`].
#[derive(Debug)]
pub struct PhotoEditor {
    state: EditorSessionState,
    popup: Option<PopupKind>,
    listeners: ListenerRegistry,
    method: HttpMethod,
    in_flight: Option<SubmissionId>,
    next_submission: u64,
}

impl Default for PhotoEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoEditor {
    pub fn new() -> Self {
        Self::with_method(HttpMethod::default())
    }

    pub fn with_method(method: HttpMethod) -> Self {
        PhotoEditor {
            state: EditorSessionState::default(),
            popup: None,
            listeners: ListenerRegistry::default(),
            method,
            in_flight: None,
            next_submission: 1,
        }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::with_method(settings.method)
    }

    pub fn state(&self) -> &EditorSessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn popup(&self) -> Option<PopupKind> {
        self.popup
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    // ---------------------------------------------------------------------
    // Modal lifecycle
    // ---------------------------------------------------------------------

    /// ファイル選択でエディタを開く
    pub fn select_file(&mut self, file: SelectedFile) {
        if self.state.is_open {
            debug!("Replacing selected file with {}", file.name);
            self.state.file = Some(file);
            return;
        }

        info!("Opening photo editor for {}", file.name);
        self.state.file = Some(file);
        self.state.is_open = true;
        self.state.scale = Scale::MAX;
        self.listeners.subscribe_all(&Listener::EDITOR);
    }

    /// Cancel button. Returns whether the editor was open.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_open {
            return false;
        }
        self.close();
        true
    }

    /// Escape key, with the element that currently has focus.
    pub fn escape(&mut self, focus: FocusTarget) -> EscapeOutcome {
        if self.popup.is_some() {
            self.dismiss_popup();
            return EscapeOutcome::PopupDismissed;
        }
        if !self.state.is_open || focus.is_text_field() {
            return EscapeOutcome::Ignored;
        }
        self.close();
        EscapeOutcome::EditorClosed
    }

    fn close(&mut self) {
        self.listeners.unsubscribe_all(&Listener::EDITOR);
        if let Some(id) = self.in_flight.take() {
            warn!("Closing photo editor with submission {id:?} still in flight");
        }
        self.state = EditorSessionState::default();
        info!("Photo editor closed");
    }

    // ---------------------------------------------------------------------
    // Zoom
    // ---------------------------------------------------------------------

    /// Returns whether the scale changed.
    pub fn zoom_out(&mut self) -> bool {
        let next = self.state.scale.zoomed_out();
        self.apply_scale(next)
    }

    /// Returns whether the scale changed.
    pub fn zoom_in(&mut self) -> bool {
        let next = self.state.scale.zoomed_in();
        self.apply_scale(next)
    }

    fn apply_scale(&mut self, next: Option<Scale>) -> bool {
        match next {
            Some(scale) if self.state.is_open => {
                self.state.scale = scale;
                self.state.image_transform = ImageTransform::Scaled(scale);
                true
            }
            _ => false,
        }
    }

    // ---------------------------------------------------------------------
    // Field edits
    // ---------------------------------------------------------------------

    pub fn edit_hashtags(&mut self, text: impl Into<String>) {
        if !self.state.is_open {
            return;
        }
        self.state.hashtags = text.into();
        self.state.hashtags_result = validate_hashtags(&self.state.hashtags);
        self.state.refresh_submit_enabled();
    }

    pub fn edit_description(&mut self, text: impl Into<String>) {
        if !self.state.is_open {
            return;
        }
        self.state.description = text.into();
        self.state.description_result = validate_description(&self.state.description);
        self.state.refresh_submit_enabled();
    }

    // ---------------------------------------------------------------------
    // Submission
    // ---------------------------------------------------------------------

    /// Validates both fields once and, if they pass, dispatches exactly one
    /// upload. Submit stays disabled until the result arrives.
    pub fn submit(&mut self) -> Result<PendingUpload, SubmitRejected> {
        if !self.state.is_open {
            return Err(SubmitRejected::NotOpen);
        }
        if self.in_flight.is_some() {
            return Err(SubmitRejected::AlreadySubmitting);
        }

        self.state.hashtags_result = validate_hashtags(&self.state.hashtags);
        self.state.description_result = validate_description(&self.state.description);
        self.state.refresh_submit_enabled();

        let rejected = [
            (Field::Hashtags, &self.state.hashtags_result),
            (Field::Description, &self.state.description_result),
        ]
        .into_iter()
        .find(|(_, result)| !result.is_valid())
        .map(|(field, result)| SubmitRejected::Invalid {
            field,
            message: result.message.clone(),
        });
        if let Some(rejected) = rejected {
            debug!("Submit rejected: {rejected}");
            return Err(rejected);
        }

        let file = self.state.file.clone().ok_or(SubmitRejected::MissingFile)?;

        let id = SubmissionId(self.next_submission);
        self.next_submission += 1;
        self.in_flight = Some(id);
        self.state.submitting = true;
        self.state.refresh_submit_enabled();

        info!("Submitting {} as {id:?}", file.name);
        Ok(PendingUpload {
            id,
            method: self.method,
            payload: UploadPayload {
                file,
                hashtags: self.state.hashtags.clone(),
                description: self.state.description.clone(),
            },
        })
    }

    /// Applies the single result of a dispatched upload.
    pub fn finish_upload(
        &mut self,
        id: SubmissionId,
        outcome: Result<(), UploadError>,
    ) -> UploadCompletion {
        if self.in_flight != Some(id) {
            warn!("Ignoring session changes for stale submission {id:?}");
            self.show_popup(match outcome {
                Ok(()) => PopupKind::Success,
                Err(_) => PopupKind::Error,
            });
            return UploadCompletion::Stale;
        }

        self.in_flight = None;
        self.state.submitting = false;

        match outcome {
            Ok(()) => {
                info!("Submission {id:?} uploaded");
                self.close();
                self.show_popup(PopupKind::Success);
                UploadCompletion::Succeeded
            }
            Err(e) => {
                warn!("Submission {id:?} failed: {e}");
                self.state.refresh_submit_enabled();
                self.show_popup(PopupKind::Error);
                UploadCompletion::Failed
            }
        }
    }

    /// `submit`, await the uploader, then `finish_upload`.
    pub async fn submit_with<U: Uploader>(
        &mut self,
        uploader: &U,
    ) -> Result<UploadCompletion, SubmitRejected> {
        let pending = self.submit()?;
        let outcome = uploader.upload(pending.method, pending.payload).await;
        Ok(self.finish_upload(pending.id, outcome))
    }

    // ---------------------------------------------------------------------
    // Result popup
    // ---------------------------------------------------------------------

    fn show_popup(&mut self, kind: PopupKind) {
        if let Some(previous) = self.popup.replace(kind) {
            debug!("Replacing {previous:?} popup with {kind:?}");
        }
        self.listeners.subscribe_all(&Listener::POPUP);
    }

    /// Removes the attached popup, if any.
    pub fn dismiss_popup(&mut self) -> bool {
        let dismissed = self.popup.take().is_some();
        self.listeners.unsubscribe_all(&Listener::POPUP);
        dismissed
    }

    /// Click on the popup; only clicks outside its inner content dismiss it.
    pub fn popup_click(&mut self, target: ClickTarget) -> bool {
        if self.popup.is_none() || !target.dismisses() {
            return false;
        }
        self.dismiss_popup()
    }

    // ---------------------------------------------------------------------
    // View
    // ---------------------------------------------------------------------

    pub fn snapshot(&self) -> EditorSnapshot {
        let state = &self.state;
        EditorSnapshot {
            is_open: state.is_open,
            file_name: state.file.as_ref().map(|f| f.name.clone()),
            scale: ScaleView {
                percent: state.scale.percent(),
                label: state.scale.label(),
                transform: state.image_transform.css(),
            },
            hashtags: FieldView {
                value: state.hashtags.clone(),
                valid: state.hashtags_result.valid,
                message: state.hashtags_result.message.clone(),
            },
            description: FieldView {
                value: state.description.clone(),
                valid: state.description_result.valid,
                message: state.description_result.message.clone(),
            },
            submitting: state.submitting,
            submit_enabled: state.submit_enabled,
            popup: self.popup.map(|kind| PopupView {
                kind,
                title: kind.title().to_string(),
                button: kind.button_text().to_string(),
            }),
            listeners: self.listeners.active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ui_text;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn photo() -> SelectedFile {
        SelectedFile::new("cat.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    fn open_editor() -> PhotoEditor {
        let mut editor = PhotoEditor::new();
        editor.select_file(photo());
        editor
    }

    /// Records every call and answers with a fixed outcome.
    struct FakeUploader {
        calls: AtomicUsize,
        last: Mutex<Option<(HttpMethod, UploadPayload)>>,
        fail_with: Option<u16>,
    }

    impl FakeUploader {
        fn succeeding() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
                fail_with: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::succeeding()
            }
        }
    }

    impl Uploader for FakeUploader {
        async fn upload(
            &self,
            method: HttpMethod,
            payload: UploadPayload,
        ) -> Result<(), UploadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((method, payload));
            tokio::task::yield_now().await;
            match self.fail_with {
                Some(status) => Err(UploadError::Status { status }),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn test_select_file_opens_editor() {
        let editor = open_editor();
        let state = editor.state();
        assert!(state.is_open);
        assert_eq!(state.scale, Scale::MAX);
        assert!(!state.submitting);
        assert!(state.submit_enabled);
        assert_eq!(state.file.as_ref().unwrap().name, "cat.jpg");
        assert!(editor.listeners().is_subscribed(Listener::CancelClick));
        assert!(editor.listeners().is_subscribed(Listener::EditorEscape));
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut editor = open_editor();
        assert!(!editor.zoom_in());

        for _ in 0..10 {
            editor.zoom_out();
        }
        assert_eq!(editor.state().scale, Scale::MIN);
        assert_eq!(editor.state().image_transform.css(), "scale(0.25)");
        assert!(!editor.zoom_out());

        for _ in 0..10 {
            editor.zoom_in();
        }
        assert_eq!(editor.state().scale, Scale::MAX);
        assert_eq!(editor.snapshot().scale.label, "100%");
    }

    #[test]
    fn test_zoom_ignored_while_closed() {
        let mut editor = PhotoEditor::new();
        assert!(!editor.zoom_out());
        assert_eq!(editor.state(), &EditorSessionState::default());
    }

    #[test]
    fn test_submit_enabled_tracks_both_fields() {
        let mut editor = open_editor();

        editor.edit_hashtags("#cat #cat");
        assert!(!editor.state().submit_enabled);
        assert_eq!(editor.state().hashtags_result.message, ui_text::HASHTAG_DUPLICATE);

        editor.edit_description("x".repeat(141));
        assert!(!editor.state().submit_enabled);

        editor.edit_hashtags("#cat #dog");
        assert!(editor.state().hashtags_result.valid);
        assert!(!editor.state().submit_enabled);

        editor.edit_description("Two pets");
        assert!(editor.state().submit_enabled);
    }

    #[test]
    fn test_submit_while_invalid_dispatches_nothing() {
        let mut editor = open_editor();
        editor.edit_hashtags("cat");

        let rejected = editor.submit().unwrap_err();
        assert_eq!(
            rejected,
            SubmitRejected::Invalid {
                field: Field::Hashtags,
                message: ui_text::HASHTAG_MISSING_PREFIX.to_string(),
            }
        );
        assert!(!editor.state().submitting);
        assert!(editor.is_open());
    }

    #[test]
    fn test_submit_when_closed_is_rejected() {
        let mut editor = PhotoEditor::new();
        assert_eq!(editor.submit().unwrap_err(), SubmitRejected::NotOpen);
    }

    #[test]
    fn test_submit_captures_form_and_blocks_second_submit() {
        let mut editor = PhotoEditor::with_method(HttpMethod::Put);
        editor.select_file(photo());
        editor.edit_hashtags("#Cat");
        editor.edit_description("Sleepy");

        let pending = editor.submit().unwrap();
        assert_eq!(pending.method, HttpMethod::Put);
        assert_eq!(pending.payload.file, photo());
        assert_eq!(pending.payload.hashtags, "#Cat");
        assert_eq!(pending.payload.description, "Sleepy");
        assert!(editor.state().submitting);
        assert!(!editor.state().submit_enabled);

        assert_eq!(editor.submit().unwrap_err(), SubmitRejected::AlreadySubmitting);

        // typing while in flight must not re-enable submit
        editor.edit_description("Very sleepy");
        assert!(!editor.state().submit_enabled);
    }

    #[test]
    fn test_upload_success_resets_session() {
        let mut editor = open_editor();
        editor.zoom_out();
        editor.edit_hashtags("#cat");
        editor.edit_description("Sleepy");

        let pending = editor.submit().unwrap();
        let completion = editor.finish_upload(pending.id, Ok(()));

        assert_eq!(completion, UploadCompletion::Succeeded);
        assert_eq!(editor.state(), &EditorSessionState::default());
        assert_eq!(editor.popup(), Some(PopupKind::Success));
        assert_eq!(
            editor.listeners().active(),
            vec![Listener::PopupClick, Listener::PopupEscape]
        );
    }

    #[test]
    fn test_upload_failure_keeps_session() {
        let mut editor = open_editor();
        editor.zoom_out();
        editor.edit_hashtags("#cat");
        editor.edit_description("Sleepy");
        let before = editor.state().clone();

        let pending = editor.submit().unwrap();
        let completion =
            editor.finish_upload(pending.id, Err(UploadError::Status { status: 500 }));

        assert_eq!(completion, UploadCompletion::Failed);
        assert_eq!(editor.state(), &before);
        assert!(editor.state().submit_enabled);
        assert_eq!(editor.popup(), Some(PopupKind::Error));

        assert!(editor.popup_click(ClickTarget::Backdrop));
        assert_eq!(editor.popup(), None);
        assert!(editor.is_open());
        assert_eq!(editor.listeners().active(), Listener::EDITOR.to_vec());

        // retry works
        assert!(editor.submit().is_ok());
    }

    #[test]
    fn test_escape_with_popup_only_dismisses_popup() {
        let mut editor = open_editor();
        editor.edit_hashtags("#cat");
        let pending = editor.submit().unwrap();
        editor.finish_upload(pending.id, Err(UploadError::Status { status: 502 }));
        let before = editor.state().clone();

        assert_eq!(editor.escape(FocusTarget::Other), EscapeOutcome::PopupDismissed);
        assert_eq!(editor.popup(), None);
        assert_eq!(editor.state(), &before);
        assert!(editor.is_open());
    }

    #[test]
    fn test_escape_in_text_field_is_ignored() {
        let mut editor = open_editor();
        editor.edit_hashtags("#cat");

        assert_eq!(editor.escape(FocusTarget::HashtagsField), EscapeOutcome::Ignored);
        assert_eq!(editor.escape(FocusTarget::DescriptionField), EscapeOutcome::Ignored);
        assert!(editor.is_open());
        assert_eq!(editor.state().hashtags, "#cat");
    }

    #[test]
    fn test_escape_closes_and_releases_listeners() {
        let mut editor = open_editor();
        editor.zoom_out();
        editor.edit_hashtags("bad");

        assert_eq!(editor.escape(FocusTarget::Other), EscapeOutcome::EditorClosed);
        assert_eq!(editor.state(), &EditorSessionState::default());
        assert!(editor.listeners().is_empty());
        assert_eq!(editor.escape(FocusTarget::Other), EscapeOutcome::Ignored);
    }

    #[test]
    fn test_cancel_resets_everything() {
        let mut editor = open_editor();
        editor.zoom_out();
        editor.zoom_out();
        editor.edit_description("x".repeat(200));

        assert!(editor.cancel());
        let state = editor.state();
        assert_eq!(state, &EditorSessionState::default());
        assert_eq!(state.image_transform.css(), "none");
        assert!(state.submit_enabled);
        assert!(editor.listeners().is_empty());
        assert!(!editor.cancel());
    }

    #[test]
    fn test_inner_click_keeps_popup() {
        let mut editor = open_editor();
        let pending = editor.submit().unwrap();
        editor.finish_upload(pending.id, Ok(()));

        assert!(!editor.popup_click(ClickTarget::Inner));
        assert_eq!(editor.popup(), Some(PopupKind::Success));
        assert!(editor.popup_click(ClickTarget::Button));
        assert!(editor.listeners().is_empty());
    }

    #[test]
    fn test_escape_dismisses_success_popup_after_close() {
        let mut editor = open_editor();
        let pending = editor.submit().unwrap();
        editor.finish_upload(pending.id, Ok(()));
        assert!(!editor.is_open());

        assert_eq!(editor.escape(FocusTarget::Other), EscapeOutcome::PopupDismissed);
        assert!(editor.listeners().is_empty());
    }

    #[test]
    fn test_late_result_after_cancel_is_stale() {
        let mut editor = open_editor();
        let pending = editor.submit().unwrap();
        editor.cancel();

        editor.select_file(SelectedFile::new("dog.png", vec![1]));
        editor.edit_hashtags("#dog");

        let completion = editor.finish_upload(pending.id, Ok(()));
        assert_eq!(completion, UploadCompletion::Stale);
        assert!(editor.is_open());
        assert_eq!(editor.state().hashtags, "#dog");
        assert_eq!(editor.popup(), Some(PopupKind::Success));
    }

    #[test]
    fn test_at_most_one_popup() {
        let mut editor = open_editor();
        let first = editor.submit().unwrap();
        editor.finish_upload(first.id, Err(UploadError::Status { status: 500 }));
        let second = editor.submit().unwrap();
        assert_ne!(first.id, second.id);
        editor.finish_upload(second.id, Err(UploadError::Status { status: 500 }));

        assert_eq!(editor.popup(), Some(PopupKind::Error));
        assert!(editor.dismiss_popup());
        assert!(!editor.dismiss_popup());
    }

    #[tokio::test]
    async fn test_submit_with_success() {
        let uploader = FakeUploader::succeeding();
        let mut editor = open_editor();
        editor.edit_hashtags("#sunset #море");
        editor.edit_description("Evening");

        let completion = editor.submit_with(&uploader).await.unwrap();
        assert_eq!(completion, UploadCompletion::Succeeded);
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 1);

        let last = uploader.last.lock().unwrap().clone().unwrap();
        assert_eq!(last.0, HttpMethod::Post);
        assert_eq!(last.1.hashtags, "#sunset #море");
        assert_eq!(editor.state(), &EditorSessionState::default());
        assert_eq!(editor.snapshot().popup.unwrap().kind, PopupKind::Success);
    }

    #[tokio::test]
    async fn test_submit_with_failure() {
        let uploader = FakeUploader::failing(503);
        let mut editor = open_editor();
        editor.edit_description("Evening");

        let completion = editor.submit_with(&uploader).await.unwrap();
        assert_eq!(completion, UploadCompletion::Failed);
        assert!(editor.is_open());
        assert_eq!(editor.state().description, "Evening");
        assert_eq!(editor.popup(), Some(PopupKind::Error));
    }

    #[tokio::test]
    async fn test_submit_with_invalid_fields_never_calls_uploader() {
        let uploader = FakeUploader::succeeding();
        let mut editor = open_editor();
        editor.edit_hashtags("#a #b #c #d #e #f");

        let rejected = editor.submit_with(&uploader).await.unwrap_err();
        assert!(matches!(rejected, SubmitRejected::Invalid { field: Field::Hashtags, .. }));
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut editor = open_editor();
        editor.zoom_out();
        editor.edit_hashtags("#cat#dog");

        let snapshot = editor.snapshot();
        assert!(snapshot.is_open);
        assert_eq!(snapshot.file_name.as_deref(), Some("cat.jpg"));
        assert_eq!(snapshot.scale.percent, 75);
        assert_eq!(snapshot.scale.label, "75%");
        assert_eq!(snapshot.scale.transform, "scale(0.75)");
        assert!(!snapshot.hashtags.valid);
        assert_eq!(snapshot.hashtags.message, ui_text::HASHTAG_NOT_SEPARATED);
        assert!(!snapshot.submit_enabled);
        assert!(snapshot.popup.is_none());
        assert_eq!(snapshot.listeners, Listener::EDITOR.to_vec());
    }
}
