use serde::{Deserialize, Serialize};

/// Events emitted by the editing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    ComponentAdded,
    ComponentRemoved,
    ComponentUpdated,
    StyleUpdated,
    #[serde(rename_all = "camelCase")]
    PageSelected { page_id: String },
    /// The rendering context was (re)initialized and lost injected styles.
    CanvasReloaded,
}

impl EditorEvent {
    /// Whether the event changes page content and should schedule a save.
    pub fn is_content_change(&self) -> bool {
        matches!(
            self,
            EditorEvent::ComponentAdded
                | EditorEvent::ComponentRemoved
                | EditorEvent::ComponentUpdated
                | EditorEvent::StyleUpdated
        )
    }
}
