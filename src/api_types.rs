// API型定義 - TypeScript自動生成対応
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::editor::{Listener, PopupKind};
use crate::validation::{Field, ValidationResult};

// =============================================================================
// Editor View Types
// =============================================================================

/// Everything a host needs to render the editor after an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub is_open: bool,
    pub file_name: Option<String>,
    pub scale: ScaleView,
    pub hashtags: FieldView,
    pub description: FieldView,
    pub submitting: bool,
    pub submit_enabled: bool,
    pub popup: Option<PopupView>,
    pub listeners: Vec<Listener>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ScaleView {
    pub percent: u8,
    /// Scale control value, e.g. "75%"
    pub label: String,
    /// Preview image transform, e.g. "scale(0.75)" or "none"
    pub transform: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub value: String,
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PopupView {
    pub kind: PopupKind,
    pub title: String,
    pub button: String,
}

// =============================================================================
// Validation Request/Response Types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValidateFieldRequest {
    pub field: Field,
    pub text: String,
}

impl ValidateFieldRequest {
    pub fn evaluate(&self) -> ValidationResult {
        crate::validation::validate_field(self.field, &self.text)
    }
}

// =============================================================================
// TypeScript / JSON Schema Generation Helpers
// =============================================================================

/// TypeScript型定義を生成するヘルパー関数
pub fn generate_typescript_bindings() -> Result<(), Box<dyn std::error::Error>> {
    EditorSnapshot::export()?;
    ScaleView::export()?;
    FieldView::export()?;
    PopupView::export()?;
    ValidateFieldRequest::export()?;
    ValidationResult::export()?;
    Field::export()?;
    PopupKind::export()?;
    Listener::export()?;
    Ok(())
}

/// JSON Schemaを生成するヘルパー関数
pub fn generate_json_schema() -> Result<String, Box<dyn std::error::Error>> {
    use schemars::schema_for;

    let schema = schema_for!(EditorSnapshot);
    Ok(serde_json::to_string_pretty(&schema)?)
}
