use std::collections::BTreeSet;

use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Temporary event subscriptions the host attaches on the controller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, TS, JsonSchema)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Listener {
    /// Cancel button of the editor
    CancelClick,
    /// Document keydown while the editor is open
    EditorEscape,
    /// Click on an attached result popup
    PopupClick,
    /// Document keydown while a result popup is attached
    PopupEscape,
}

impl Listener {
    pub const EDITOR: [Listener; 2] = [Listener::CancelClick, Listener::EditorEscape];
    pub const POPUP: [Listener; 2] = [Listener::PopupClick, Listener::PopupEscape];
}

/// Active subscriptions. Subscribing twice is a no-op, as is removing an
/// absent listener.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListenerRegistry {
    active: BTreeSet<Listener>,
}

impl ListenerRegistry {
    pub fn subscribe(&mut self, listener: Listener) -> bool {
        let added = self.active.insert(listener);
        if added {
            debug!("subscribed {listener:?}");
        }
        added
    }

    pub fn unsubscribe(&mut self, listener: Listener) -> bool {
        let removed = self.active.remove(&listener);
        if removed {
            debug!("unsubscribed {listener:?}");
        }
        removed
    }

    pub fn subscribe_all(&mut self, listeners: &[Listener]) {
        for listener in listeners {
            self.subscribe(*listener);
        }
    }

    pub fn unsubscribe_all(&mut self, listeners: &[Listener]) {
        for listener in listeners {
            self.unsubscribe(*listener);
        }
    }

    pub fn is_subscribed(&self, listener: Listener) -> bool {
        self.active.contains(&listener)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active(&self) -> Vec<Listener> {
        self.active.iter().copied().collect()
    }
}
