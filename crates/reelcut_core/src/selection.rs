use crate::types::{Composition, Item};
use uuid::Uuid;

/// At most one selected item, tracked by id rather than by position.
///
/// Positions go stale the moment a delete or move reshuffles a track, so the
/// selection re-resolves to `(track_index, item_index)` on every read and
/// simply stops resolving once the item is gone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<Uuid>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select by position. Silently clears when no item exists there.
    pub fn select_at(&mut self, comp: &Composition, track_index: usize, item_index: usize) {
        self.selected = comp
            .tracks
            .get(track_index)
            .and_then(|t| t.items.get(item_index))
            .map(|i| i.id());
    }

    pub fn select(&mut self, item_id: Uuid) {
        self.selected = Some(item_id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn is_selected(&self, item_id: Uuid) -> bool {
        self.selected == Some(item_id)
    }

    /// Current `(track_index, item_index)` of the selected item, if it still
    /// exists anywhere in the composition.
    pub fn resolve(&self, comp: &Composition) -> Option<(usize, usize)> {
        self.selected.and_then(|id| comp.locate_item(id))
    }

    pub fn resolve_item<'a>(&self, comp: &'a Composition) -> Option<&'a Item> {
        let (t, i) = self.resolve(comp)?;
        Some(&comp.tracks[t].items[i])
    }

    /// Drop a selection that no longer resolves. Returns true when a
    /// selection remains afterwards.
    pub fn prune(&mut self, comp: &Composition) -> bool {
        if let Some(id) = self.selected {
            if comp.locate_item(id).is_none() {
                self.selected = None;
            }
        }
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::preset_1080p;
    use crate::types::{Frames, Item};

    fn comp_with_items() -> (Composition, Uuid, Uuid) {
        let mut comp = Composition::new("sel", preset_1080p());
        comp.add_track("A");
        comp.add_track("B");
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        comp.insert_item(
            0,
            Item::Solid {
                id: a,
                from: Frames(0),
                duration_in_frames: Frames(30),
                color: "#111111".into(),
            },
        )
        .unwrap();
        comp.insert_item(
            0,
            Item::Solid {
                id: b,
                from: Frames(60),
                duration_in_frames: Frames(30),
                color: "#222222".into(),
            },
        )
        .unwrap();
        (comp, a, b)
    }

    #[test]
    fn select_at_resolves_back() {
        let (comp, _, b) = comp_with_items();
        let mut sel = SelectionState::new();
        sel.select_at(&comp, 0, 1);
        assert_eq!(sel.selected_id(), Some(b));
        assert_eq!(sel.resolve(&comp), Some((0, 1)));
    }

    #[test]
    fn select_at_missing_target_clears() {
        let (comp, a, _) = comp_with_items();
        let mut sel = SelectionState::new();
        sel.select(a);
        sel.select_at(&comp, 0, 9);
        assert!(sel.is_empty());
        sel.select(a);
        sel.select_at(&comp, 5, 0);
        assert!(sel.is_empty());
    }

    #[test]
    fn selection_follows_item_across_moves() {
        let (mut comp, a, _) = comp_with_items();
        let mut sel = SelectionState::new();
        sel.select(a);
        assert_eq!(sel.resolve(&comp), Some((0, 0)));

        comp.move_item(0, 0, 1, Frames(15)).unwrap();
        assert_eq!(sel.resolve(&comp), Some((1, 0)));
        assert_eq!(sel.resolve_item(&comp).map(|i| i.id()), Some(a));
    }

    #[test]
    fn deleted_item_stops_resolving_and_prunes() {
        let (mut comp, a, _) = comp_with_items();
        let mut sel = SelectionState::new();
        sel.select(a);

        comp.delete_item(0, 0).unwrap();
        assert_eq!(sel.resolve(&comp), None);
        assert!(!sel.prune(&comp));
        assert!(sel.is_empty());
    }

    #[test]
    fn prune_keeps_live_selection() {
        let (comp, _, b) = comp_with_items();
        let mut sel = SelectionState::new();
        sel.select(b);
        assert!(sel.prune(&comp));
        assert_eq!(sel.selected_id(), Some(b));
    }

    #[test]
    fn clear_always_succeeds() {
        let mut sel = SelectionState::new();
        sel.clear();
        assert!(sel.is_empty());
        sel.select(Uuid::new_v4());
        sel.clear();
        assert!(sel.is_empty());
    }
}
