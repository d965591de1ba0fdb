//! Flat key-value snapshot of a placement
//!
//! The shareable-link collaborator stores placement as a flat record:
//!
//! ```text
//! layout      = 3
//! cell_0      = 2024txhou-1
//! cell_2      = 2024onto
//! livescore_2 = true
//! ```
//!
//! Only occupied cells and enabled live-score flags are written. Restoring
//! replays transitions, so slot numbering after a restore follows cell order
//! rather than the slots of the state that was captured.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::broadcast::{BroadcastId, BroadcastRegistry};
use crate::error::Result;
use crate::layout::LayoutId;
use crate::placement::{PlacementState, PlacementStore};

const LAYOUT_KEY: &str = "layout";
const CELL_PREFIX: &str = "cell_";
const LIVE_SCORE_PREFIX: &str = "livescore_";

/// Flat record describing a placement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementSnapshot {
    entries: BTreeMap<String, String>,
}

impl PlacementSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture a placement
    pub fn from_state(state: &PlacementState) -> Self {
        let mut snapshot = Self::new();
        snapshot.set(LAYOUT_KEY, state.layout_id().0.to_string());

        for cell in 0..state.num_cells() {
            if let Some(id) = state.broadcast_at_cell(cell) {
                snapshot.set(format!("{}{}", CELL_PREFIX, cell), id.as_str());
                if state.live_score_at_cell(cell) {
                    snapshot.set(format!("{}{}", LIVE_SCORE_PREFIX, cell), "true");
                }
            }
        }

        snapshot
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layout named by the snapshot, if parseable
    pub fn layout(&self) -> Option<LayoutId> {
        self.get(LAYOUT_KEY)?.parse().ok().map(LayoutId)
    }

    /// Broadcasts per cell, in ascending cell order
    pub fn cells(&self) -> Vec<(usize, BroadcastId)> {
        let mut cells: Vec<(usize, BroadcastId)> = self
            .indexed(CELL_PREFIX)
            .filter(|(_, value)| !value.is_empty())
            .map(|(cell, value)| (cell, BroadcastId::new(value)))
            .collect();
        cells.sort_by_key(|(cell, _)| *cell);
        cells
    }

    /// Cells with live-score mode on, in ascending order
    pub fn live_score_cells(&self) -> Vec<usize> {
        let mut cells: Vec<usize> = self
            .indexed(LIVE_SCORE_PREFIX)
            .filter(|(_, value)| matches!(*value, "true" | "1"))
            .map(|(cell, _)| cell)
            .collect();
        cells.sort_unstable();
        cells
    }

    fn indexed<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        self.entries.iter().filter_map(move |(key, value)| {
            let cell: usize = key.strip_prefix(prefix)?.parse().ok()?;
            Some((cell, value.as_str()))
        })
    }

    /// Rebuild a placement by replaying transitions
    ///
    /// Falls back to `fallback_layout` when the snapshot names no known
    /// layout. Cells outside the layout, unknown broadcasts and duplicates
    /// are skipped with a warning.
    pub fn restore(
        &self,
        store: &PlacementStore,
        registry: &BroadcastRegistry,
        fallback_layout: LayoutId,
    ) -> Result<Arc<PlacementState>> {
        let layout = match self.layout() {
            Some(layout) if store.catalog().layout_by_id(layout).is_some() => layout,
            other => {
                if let Some(layout) = other {
                    tracing::warn!(layout = %layout, "Snapshot layout unknown, using fallback");
                }
                fallback_layout
            }
        };

        let mut state = store.initial(layout)?;

        for (cell, id) in self.cells() {
            if !registry.contains(&id) {
                tracing::warn!(broadcast = %id, cell = cell, "Snapshot broadcast unknown, skipping");
                continue;
            }
            if state.broadcast_at_cell(cell).is_some() || state.is_displayed(&id) {
                tracing::warn!(broadcast = %id, cell = cell, "Snapshot cell duplicated, skipping");
                continue;
            }
            match store.add_at_cell(&state, &id, cell) {
                Ok(next) => state = next,
                Err(e) => {
                    tracing::warn!(broadcast = %id, cell = cell, error = %e, "Snapshot cell not restored");
                }
            }
        }

        for cell in self.live_score_cells() {
            if !state.live_score_at_cell(cell) {
                state = store.toggle_live_score(&state, cell);
            }
        }

        Ok(state)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlacementSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.set(key, value);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{BroadcastDescriptor, BroadcastKind};
    use crate::error::Error;
    use crate::layout::LayoutCatalog;

    fn setup() -> (PlacementStore, BroadcastRegistry) {
        let registry = ["a", "b", "c"]
            .into_iter()
            .map(|id| BroadcastDescriptor::new(id, "2024casj", BroadcastKind::Twitch, id, id))
            .collect();
        (PlacementStore::new(Arc::new(LayoutCatalog::default())), registry)
    }

    #[test]
    fn test_capture_writes_occupied_cells_only() {
        let (store, _) = setup();
        let state = store.initial(LayoutId(3)).unwrap();
        let state = store.add_at_cell(&state, &BroadcastId::new("a"), 2).unwrap();
        let state = store.toggle_live_score(&state, 2);

        let snapshot = PlacementSnapshot::from_state(&state);

        assert_eq!(
            snapshot.iter().collect::<Vec<_>>(),
            vec![("cell_2", "a"), ("layout", "3"), ("livescore_2", "true")]
        );
    }

    #[test]
    fn test_restore_replays_placement() {
        let (store, registry) = setup();
        let snapshot: PlacementSnapshot = vec![
            ("layout", "3"),
            ("cell_3", "a"),
            ("cell_1", "b"),
            ("livescore_3", "true"),
            ("livescore_1", "false"),
        ]
        .into_iter()
        .collect();

        let state = snapshot.restore(&store, &registry, LayoutId(0)).unwrap();

        assert_eq!(state.layout_id(), LayoutId(3));
        assert_eq!(state.broadcast_at_cell(1), Some(&BroadcastId::new("b")));
        assert_eq!(state.broadcast_at_cell(3), Some(&BroadcastId::new("a")));
        // Replayed in cell order, so the lower cell got the lower slot
        assert_eq!(state.slot_at_cell(1), Some(0));
        assert!(state.live_score_at_cell(3));
        assert!(!state.live_score_at_cell(1));
        state.assert_invariants();
    }

    #[test]
    fn test_restore_skips_bad_entries() {
        let (store, registry) = setup();
        let snapshot: PlacementSnapshot = vec![
            ("layout", "1"),
            ("cell_0", "ghost"),
            ("cell_1", "a"),
            ("cell_5", "b"),
            ("cell_x", "c"),
            ("livescore_0", "true"),
        ]
        .into_iter()
        .collect();

        let state = snapshot.restore(&store, &registry, LayoutId(0)).unwrap();

        assert_eq!(state.displayed_order(), &[BroadcastId::new("a")]);
        assert!(!state.live_score_at_cell(0));
        state.assert_invariants();
    }

    #[test]
    fn test_restore_unknown_layout_falls_back() {
        let (store, registry) = setup();
        let snapshot: PlacementSnapshot = vec![("layout", "77"), ("cell_0", "a")].into_iter().collect();

        let state = snapshot.restore(&store, &registry, LayoutId(1)).unwrap();
        assert_eq!(state.layout_id(), LayoutId(1));
        assert_eq!(state.broadcast_at_cell(0), Some(&BroadcastId::new("a")));

        let result = PlacementSnapshot::new().restore(&store, &registry, LayoutId(99));
        assert_eq!(result, Err(Error::LayoutNotFound(LayoutId(99))));
    }

    #[test]
    fn test_capture_then_restore_same_cells() {
        let (store, registry) = setup();
        let state = store.initial(LayoutId(2)).unwrap();
        let state = store.add_auto_place(&state, &BroadcastId::new("a")).unwrap();
        let state = store.add_auto_place(&state, &BroadcastId::new("b")).unwrap();
        let state = store.swap_cells(&state, 0, 2).unwrap();
        let state = store.toggle_live_score(&state, 1);

        let restored = PlacementSnapshot::from_state(&state)
            .restore(&store, &registry, LayoutId(0))
            .unwrap();

        for cell in 0..state.num_cells() {
            assert_eq!(restored.broadcast_at_cell(cell), state.broadcast_at_cell(cell));
            assert_eq!(restored.live_score_at_cell(cell), state.live_score_at_cell(cell));
        }
    }
}
