use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::TaskId;

/// Stable identity of a row (resource, team or phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub Uuid);

impl RowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

/// A swimlane of the timeline. Task order here is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub label: String,
    /// Image path or URL for the row's owner.
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub tasks: Vec<TaskId>,
}

impl Row {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: RowId::new(),
            label: label.into(),
            avatar: None,
            tasks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_is_optional_in_json() {
        let id = Uuid::new_v4();
        let bare: Row = serde_json::from_str(&format!(r#"{{"id":"{id}","label":"Backend"}}"#)).unwrap();
        assert_eq!(bare.avatar, None);
        assert!(bare.tasks.is_empty());

        let with: Row =
            serde_json::from_str(&format!(r#"{{"id":"{id}","label":"Backend","avatar":"avatars/bo.png"}}"#)).unwrap();
        assert_eq!(with.avatar.as_deref(), Some("avatars/bo.png"));
    }
}
