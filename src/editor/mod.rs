// 写真エディタのモーダル状態機械
// DOM 側はイベントを渡し、snapshot() の内容を描画するだけ

pub mod controller;
pub mod listeners;
pub mod popup;
pub mod scale;
pub mod session;

pub use controller::{
    EscapeOutcome, FocusTarget, PendingUpload, PhotoEditor, SubmissionId, SubmitRejected,
    UploadCompletion,
};
pub use listeners::{Listener, ListenerRegistry};
pub use popup::{ClickTarget, PopupKind};
pub use scale::{ImageTransform, Scale};
pub use session::EditorSessionState;
