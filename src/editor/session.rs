use crate::editor::scale::{ImageTransform, Scale};
use crate::upload::SelectedFile;
use crate::validation::ValidationResult;

/// Everything the editor modal holds between events.
///
/// `Default` is the closed state: no file, empty fields, full scale, no
/// transform, no validation errors and an enabled submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSessionState {
    pub is_open: bool,
    pub scale: Scale,
    pub submitting: bool,
    pub file: Option<SelectedFile>,
    pub hashtags: String,
    pub description: String,
    pub hashtags_result: ValidationResult,
    pub description_result: ValidationResult,
    pub submit_enabled: bool,
    pub image_transform: ImageTransform,
}

impl Default for EditorSessionState {
    fn default() -> Self {
        Self {
            is_open: false,
            scale: Scale::default(),
            submitting: false,
            file: None,
            hashtags: String::new(),
            description: String::new(),
            hashtags_result: ValidationResult::passed(),
            description_result: ValidationResult::passed(),
            submit_enabled: true,
            image_transform: ImageTransform::None,
        }
    }
}

impl EditorSessionState {
    pub fn fields_valid(&self) -> bool {
        self.hashtags_result.is_valid() && self.description_result.is_valid()
    }

    /// Submit is allowed only with valid fields and nothing in flight.
    pub fn refresh_submit_enabled(&mut self) {
        self.submit_enabled = !self.submitting && self.fields_valid();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_closed() {
        let state = EditorSessionState::default();
        assert!(!state.is_open);
        assert_eq!(state.scale, Scale::MAX);
        assert!(state.submit_enabled);
        assert!(state.fields_valid());
        assert_eq!(state.image_transform.css(), "none");
    }

    #[test]
    fn test_submit_disabled_while_submitting() {
        let mut state = EditorSessionState {
            submitting: true,
            ..EditorSessionState::default()
        };
        state.refresh_submit_enabled();
        assert!(!state.submit_enabled);

        state.submitting = false;
        state.hashtags_result = ValidationResult::failed("bad");
        state.refresh_submit_enabled();
        assert!(!state.submit_enabled);
    }
}
