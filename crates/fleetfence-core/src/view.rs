//! View/Selection State: UI-local flags for the geofence screens.
//!
//! Plain data plus a pure reducer; nothing here touches shapes or records.

use crate::shapes::{ShapeId, ShapeKind};
use crate::store::{GeofenceId, GeofenceStatus};
use serde::{Deserialize, Serialize};

/// How geofences are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Map,
    List,
}

/// Listing tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeofenceTab {
    #[default]
    All,
    Active,
    Inactive,
    Pending,
}

impl GeofenceTab {
    /// Status shown by this tab; `None` for the unfiltered tab.
    pub fn status(&self) -> Option<GeofenceStatus> {
        match self {
            GeofenceTab::All => None,
            GeofenceTab::Active => Some(GeofenceStatus::Active),
            GeofenceTab::Inactive => Some(GeofenceStatus::Inactive),
            GeofenceTab::Pending => Some(GeofenceStatus::Pending),
        }
    }
}

/// The draft currently being edited, tagged with its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRef {
    pub id: ShapeId,
    pub kind: ShapeKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected: Option<GeofenceId>,
    pub mode: ViewMode,
    pub tab: GeofenceTab,
    pub editor_open: bool,
    pub draft: Option<DraftRef>,
    /// Drawing tool armed on the map, if any.
    pub drawing_mode: Option<ShapeKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    SelectRecord(GeofenceId),
    ClearSelection,
    SetMode(ViewMode),
    SetTab(GeofenceTab),
    OpenEditor,
    CloseEditor,
    SetDraft(DraftRef),
    ClearDraft,
    ArmDrawing(Option<ShapeKind>),
}

pub fn reduce_view(state: &ViewState, action: ViewAction) -> ViewState {
    let mut next = state.clone();
    match action {
        ViewAction::SelectRecord(id) => next.selected = Some(id),
        ViewAction::ClearSelection => next.selected = None,
        ViewAction::SetMode(mode) => next.mode = mode,
        ViewAction::SetTab(tab) => next.tab = tab,
        ViewAction::OpenEditor => next.editor_open = true,
        ViewAction::CloseEditor => next.editor_open = false,
        ViewAction::SetDraft(draft) => next.draft = Some(draft),
        ViewAction::ClearDraft => next.draft = None,
        ViewAction::ArmDrawing(kind) => next.drawing_mode = kind,
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_defaults() {
        let state = ViewState::default();
        assert_eq!(state.mode, ViewMode::Map);
        assert_eq!(state.tab, GeofenceTab::All);
        assert!(!state.editor_open);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = ViewState::default();
        let next = reduce_view(&state, ViewAction::SetMode(ViewMode::List));
        assert_eq!(next.mode, ViewMode::List);
        assert_eq!(state.mode, ViewMode::Map);
    }

    #[test]
    fn test_selection() {
        let id = Uuid::new_v4();
        let state = reduce_view(&ViewState::default(), ViewAction::SelectRecord(id));
        assert_eq!(state.selected, Some(id));
        let state = reduce_view(&state, ViewAction::ClearSelection);
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_editor_and_draft() {
        let draft = DraftRef {
            id: Uuid::new_v4(),
            kind: ShapeKind::Polygon,
        };
        let state = [
            ViewAction::ArmDrawing(Some(ShapeKind::Polygon)),
            ViewAction::SetDraft(draft),
            ViewAction::OpenEditor,
        ]
        .into_iter()
        .fold(ViewState::default(), |s, a| reduce_view(&s, a));
        assert!(state.editor_open);
        assert_eq!(state.draft, Some(draft));
        assert_eq!(state.drawing_mode, Some(ShapeKind::Polygon));

        let state = reduce_view(&state, ViewAction::CloseEditor);
        let state = reduce_view(&state, ViewAction::ClearDraft);
        assert!(!state.editor_open);
        assert!(state.draft.is_none());
    }

    #[test]
    fn test_tab_status() {
        assert_eq!(GeofenceTab::All.status(), None);
        assert_eq!(GeofenceTab::Pending.status(), Some(GeofenceStatus::Pending));
        let state = reduce_view(&ViewState::default(), ViewAction::SetTab(GeofenceTab::Inactive));
        assert_eq!(state.tab, GeofenceTab::Inactive);
    }
}
