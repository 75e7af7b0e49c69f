//! Which presentation the events screen is in.
//!
//! The mode is derived from two inputs: what the user last asked for and the
//! location status. The map needs a center point, so any map intent without
//! an acquired location shows the loading placeholder instead. The list can
//! always be shown.
//!
//! ```text
//!            acquired (no list choice)
//!  Loading ─────────────────────────────▶ Map
//!     │  ▲                                 │ ▲
//!     │  └──── choose map, not acquired    │ │ choose map, acquired
//!     │                                    ▼ │
//!     └──────────── choose list ─────────▶ List
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::LocationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Loading,
    Map,
    List,
}

impl ViewMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Map => "map",
            Self::List => "list",
        }
    }
}

/// The presentation the user explicitly picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedView {
    Map,
    List,
}

impl FeedView {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Map => Self::List,
            Self::List => Self::Map,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ViewMode,
    pub to: ViewMode,
}

impl Transition {
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModeController {
    choice: Option<FeedView>,
    status: LocationStatus,
    mode: ViewMode,
    distance_labels: bool,
}

impl ViewModeController {
    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        self.mode
    }

    #[must_use]
    pub const fn choice(&self) -> Option<FeedView> {
        self.choice
    }

    /// True once the list has been shown with an acquired location.
    #[must_use]
    pub const fn shows_distance_labels(&self) -> bool {
        self.distance_labels
    }

    pub fn location_changed(&mut self, status: LocationStatus) -> Transition {
        self.status = status;
        self.settle()
    }

    pub fn choose(&mut self, view: FeedView) -> Transition {
        self.choice = Some(view);
        self.settle()
    }

    /// Flips between map and list. Before any choice the screen counts as
    /// being on the map, so the first toggle goes to the list.
    pub fn toggle(&mut self) -> Transition {
        let current = self.choice.unwrap_or(FeedView::Map);
        self.choose(current.toggle())
    }

    fn derive(&self) -> ViewMode {
        match self.choice {
            Some(FeedView::List) => ViewMode::List,
            Some(FeedView::Map) | None if self.status == LocationStatus::Acquired => ViewMode::Map,
            Some(FeedView::Map) | None => ViewMode::Loading,
        }
    }

    fn settle(&mut self) -> Transition {
        let from = self.mode;
        self.mode = self.derive();

        if self.mode == ViewMode::List
            && self.status == LocationStatus::Acquired
            && !self.distance_labels
        {
            self.distance_labels = true;
            debug!("list shown with an acquired location; distance labels enabled");
        }

        let transition = Transition { from, to: self.mode };
        if transition.changed() {
            debug!(from = from.as_str(), to = self.mode.as_str(), "view mode changed");
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_loading() {
        let controller = ViewModeController::default();
        assert_eq!(controller.mode(), ViewMode::Loading);
        assert_eq!(controller.choice(), None);
        assert!(!controller.shows_distance_labels());
    }

    #[test]
    fn acquisition_moves_loading_to_map() {
        let mut controller = ViewModeController::default();
        controller.location_changed(LocationStatus::Pending);
        assert_eq!(controller.mode(), ViewMode::Loading);

        let transition = controller.location_changed(LocationStatus::Acquired);
        assert_eq!(
            transition,
            Transition {
                from: ViewMode::Loading,
                to: ViewMode::Map
            }
        );

        // Later refreshes do not fire the transition again.
        assert!(!controller.location_changed(LocationStatus::Acquired).changed());
    }

    #[test]
    fn list_choice_wins_over_acquisition() {
        let mut controller = ViewModeController::default();
        controller.location_changed(LocationStatus::Pending);

        controller.choose(FeedView::List);
        assert_eq!(controller.mode(), ViewMode::List);

        controller.location_changed(LocationStatus::Acquired);
        assert_eq!(controller.mode(), ViewMode::List);
    }

    #[test]
    fn map_without_location_is_loading() {
        let mut controller = ViewModeController::default();
        controller.choose(FeedView::List);
        controller.location_changed(LocationStatus::Failed);

        controller.choose(FeedView::Map);
        assert_eq!(controller.mode(), ViewMode::Loading);
    }

    #[test]
    fn failure_keeps_loading() {
        let mut controller = ViewModeController::default();
        controller.location_changed(LocationStatus::Pending);
        controller.location_changed(LocationStatus::Failed);
        assert_eq!(controller.mode(), ViewMode::Loading);
    }

    #[test]
    fn cycles_between_map_and_list() {
        let mut controller = ViewModeController::default();
        controller.location_changed(LocationStatus::Acquired);
        assert_eq!(controller.mode(), ViewMode::Map);

        for _ in 0..3 {
            controller.toggle();
            assert_eq!(controller.mode(), ViewMode::List);
            controller.toggle();
            assert_eq!(controller.mode(), ViewMode::Map);
        }
    }

    #[test]
    fn first_toggle_from_loading_goes_to_list() {
        let mut controller = ViewModeController::default();
        controller.toggle();
        assert_eq!(controller.mode(), ViewMode::List);
    }

    #[test]
    fn distance_labels_turn_on_with_list_after_acquisition() {
        let mut controller = ViewModeController::default();
        controller.choose(FeedView::List);
        assert!(!controller.shows_distance_labels());

        controller.location_changed(LocationStatus::Acquired);
        assert!(controller.shows_distance_labels());

        controller.choose(FeedView::Map);
        assert!(controller.shows_distance_labels());
    }
}
