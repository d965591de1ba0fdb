//! Placement state
//!
//! The single mutable entity of the core. Only [`super::PlacementStore`]
//! produces new values; everything else reads.

use crate::broadcast::BroadcastId;
use crate::layout::LayoutId;

use super::MAX_SLOTS;

/// Assignment of broadcasts to slots and of slots to cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementState {
    /// Active layout
    pub(super) layout_id: LayoutId,

    /// Broadcast held by each slot
    pub(super) slot_contents: [Option<BroadcastId>; MAX_SLOTS],

    /// Slot shown by each visible cell; length is the layout's cell count
    pub(super) cell_to_slot: Vec<Option<usize>>,

    /// Live-score mode per slot
    pub(super) slot_live_score: [bool; MAX_SLOTS],

    /// Displayed broadcasts in insertion order
    pub(super) displayed_order: Vec<BroadcastId>,
}

impl PlacementState {
    /// Create an empty state for a layout with `num_cells` cells
    pub(super) fn empty(layout_id: LayoutId, num_cells: usize) -> Self {
        Self {
            layout_id,
            slot_contents: std::array::from_fn(|_| None),
            cell_to_slot: vec![None; num_cells],
            slot_live_score: [false; MAX_SLOTS],
            displayed_order: Vec::new(),
        }
    }

    pub fn layout_id(&self) -> LayoutId {
        self.layout_id
    }

    /// Number of cells in the active layout
    pub fn num_cells(&self) -> usize {
        self.cell_to_slot.len()
    }

    pub fn slot_contents(&self) -> &[Option<BroadcastId>] {
        &self.slot_contents
    }

    pub fn cell_to_slot(&self) -> &[Option<usize>] {
        &self.cell_to_slot
    }

    pub fn displayed_order(&self) -> &[BroadcastId] {
        &self.displayed_order
    }

    pub fn is_empty(&self) -> bool {
        self.displayed_order.is_empty()
    }

    pub fn is_displayed(&self, id: &BroadcastId) -> bool {
        self.slot_of(id).is_some()
    }

    /// Slot holding a broadcast
    pub fn slot_of(&self, id: &BroadcastId) -> Option<usize> {
        self.slot_contents
            .iter()
            .position(|content| content.as_ref() == Some(id))
    }

    /// Visible cell showing a slot
    pub fn cell_of_slot(&self, slot: usize) -> Option<usize> {
        self.cell_to_slot
            .iter()
            .position(|mapped| *mapped == Some(slot))
    }

    /// Visible cell showing a broadcast
    pub fn cell_of(&self, id: &BroadcastId) -> Option<usize> {
        self.slot_of(id).and_then(|slot| self.cell_of_slot(slot))
    }

    /// Slot shown by a cell, `None` for empty or out-of-range cells
    pub fn slot_at_cell(&self, cell: usize) -> Option<usize> {
        self.cell_to_slot.get(cell).copied().flatten()
    }

    /// Broadcast shown by a cell
    pub fn broadcast_at_cell(&self, cell: usize) -> Option<&BroadcastId> {
        self.slot_at_cell(cell)
            .and_then(|slot| self.slot_contents[slot].as_ref())
    }

    pub fn live_score_on(&self, slot: usize) -> bool {
        self.slot_live_score.get(slot).copied().unwrap_or(false)
    }

    pub fn live_score_at_cell(&self, cell: usize) -> bool {
        self.slot_at_cell(cell)
            .map(|slot| self.live_score_on(slot))
            .unwrap_or(false)
    }

    /// Clear a slot: content, live-score flag, referencing cells and order entry
    ///
    /// Returns the broadcast that was evicted.
    pub(super) fn vacate_slot(&mut self, slot: usize) -> Option<BroadcastId> {
        let evicted = self.slot_contents[slot].take()?;
        self.slot_live_score[slot] = false;

        for mapped in self.cell_to_slot.iter_mut() {
            if *mapped == Some(slot) {
                *mapped = None;
            }
        }
        self.displayed_order.retain(|id| *id != evicted);

        Some(evicted)
    }

    /// Check the structural invariants, panicking with a description on failure
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        let num_cells = self.num_cells();
        let mut in_slots = HashSet::new();

        for (slot, content) in self.slot_contents.iter().enumerate() {
            match content {
                Some(id) => {
                    assert!(slot < num_cells, "occupied slot {} beyond layout", slot);
                    assert!(in_slots.insert(id.clone()), "{} held by two slots", id);
                    let refs = self
                        .cell_to_slot
                        .iter()
                        .filter(|mapped| **mapped == Some(slot))
                        .count();
                    assert_eq!(refs, 1, "slot {} referenced by {} cells", slot, refs);
                }
                None => {
                    assert!(!self.slot_live_score[slot], "empty slot {} has live score", slot);
                    assert!(self.cell_of_slot(slot).is_none(), "cell maps empty slot {}", slot);
                }
            }
        }

        let in_order: HashSet<_> = self.displayed_order.iter().cloned().collect();
        assert_eq!(in_order.len(), self.displayed_order.len(), "duplicate in order");
        assert_eq!(in_order, in_slots, "displayed order out of sync with slots");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = PlacementState::empty(LayoutId(3), 4);

        assert_eq!(state.num_cells(), 4);
        assert!(state.is_empty());
        assert!(state.slot_contents().iter().all(Option::is_none));
        state.assert_invariants();
    }

    #[test]
    fn test_lookups_out_of_range() {
        let state = PlacementState::empty(LayoutId(0), 1);

        assert_eq!(state.slot_at_cell(5), None);
        assert_eq!(state.broadcast_at_cell(5), None);
        assert!(!state.live_score_on(MAX_SLOTS + 1));
        assert!(!state.live_score_at_cell(5));
    }

    #[test]
    fn test_vacate_slot() {
        let mut state = PlacementState::empty(LayoutId(1), 2);
        let id = BroadcastId::new("a");
        state.slot_contents[0] = Some(id.clone());
        state.cell_to_slot[1] = Some(0);
        state.slot_live_score[0] = true;
        state.displayed_order.push(id.clone());

        assert_eq!(state.cell_of(&id), Some(1));
        assert_eq!(state.vacate_slot(0), Some(id));
        assert_eq!(state.vacate_slot(0), None);
        assert_eq!(state, PlacementState::empty(LayoutId(1), 2));
    }
}
