//! Placement transitions
//!
//! Every transition takes the current `Arc<PlacementState>` and returns the
//! next one. When a transition changes nothing it hands back the same `Arc`.

use std::sync::Arc;

use crate::broadcast::BroadcastId;
use crate::error::{Error, Result};
use crate::layout::{LayoutCatalog, LayoutId};

use super::allocator;
use super::state::PlacementState;
use super::MAX_SLOTS;

/// Pure transition functions over [`PlacementState`]
#[derive(Debug, Clone)]
pub struct PlacementStore {
    catalog: Arc<LayoutCatalog>,
}

impl PlacementStore {
    /// Create a store backed by a layout catalog
    pub fn new(catalog: Arc<LayoutCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }

    /// Empty state for a layout
    pub fn initial(&self, layout_id: LayoutId) -> Result<Arc<PlacementState>> {
        let num_cells = self
            .catalog
            .num_cells(layout_id)
            .ok_or(Error::LayoutNotFound(layout_id))?;

        Ok(Arc::new(PlacementState::empty(layout_id, num_cells)))
    }

    /// Place a broadcast at a specific cell
    ///
    /// The broadcast gets the lowest free slot. If `cell` already showed a
    /// slot, that slot is not freed; remove its broadcast first. Adding a
    /// broadcast that is already displayed changes nothing.
    pub fn add_at_cell(
        &self,
        state: &Arc<PlacementState>,
        id: &BroadcastId,
        cell: usize,
    ) -> Result<Arc<PlacementState>> {
        check_cell(state, cell)?;

        if state.is_displayed(id) {
            tracing::debug!(broadcast = %id, cell = cell, "Broadcast already displayed");
            return Ok(Arc::clone(state));
        }

        let slot = allocator::lowest_free_slot(&state.slot_contents).ok_or_else(|| {
            tracing::warn!(broadcast = %id, max_slots = MAX_SLOTS, "No free slot");
            Error::CapacityExceeded {
                max_slots: MAX_SLOTS,
            }
        })?;

        Ok(Arc::new(place(state, id, slot, cell)))
    }

    /// Place a broadcast in the first empty cell of the layout
    pub fn add_auto_place(
        &self,
        state: &Arc<PlacementState>,
        id: &BroadcastId,
    ) -> Result<Arc<PlacementState>> {
        if state.is_displayed(id) {
            tracing::debug!(broadcast = %id, "Broadcast already displayed");
            return Ok(Arc::clone(state));
        }

        let num_cells = state.num_cells();
        let cell = allocator::auto_place_index(&state.cell_to_slot, num_cells).ok_or_else(|| {
            tracing::warn!(broadcast = %id, cells = num_cells, "No empty cell");
            Error::CapacityExceeded {
                max_slots: num_cells,
            }
        })?;

        self.add_at_cell(state, id, cell)
    }

    /// Remove a broadcast, its live-score mode and any cell showing it
    ///
    /// Removing a broadcast that is not displayed changes nothing.
    pub fn remove(&self, state: &Arc<PlacementState>, id: &BroadcastId) -> Arc<PlacementState> {
        let Some(slot) = state.slot_of(id) else {
            tracing::debug!(broadcast = %id, "Remove of undisplayed broadcast ignored");
            return Arc::clone(state);
        };

        let mut next = PlacementState::clone(state);
        next.vacate_slot(slot);

        tracing::info!(broadcast = %id, slot = slot, "Broadcast removed");
        Arc::new(next)
    }

    /// Exchange what two cells show
    ///
    /// Only `cell_to_slot` changes; slots keep their content and live-score
    /// flag, so no embed is remounted.
    pub fn swap_cells(
        &self,
        state: &Arc<PlacementState>,
        cell_a: usize,
        cell_b: usize,
    ) -> Result<Arc<PlacementState>> {
        check_cell(state, cell_a)?;
        check_cell(state, cell_b)?;

        if cell_a == cell_b || state.cell_to_slot[cell_a] == state.cell_to_slot[cell_b] {
            return Ok(Arc::clone(state));
        }

        let mut next = PlacementState::clone(state);
        next.cell_to_slot.swap(cell_a, cell_b);

        tracing::debug!(cell_a = cell_a, cell_b = cell_b, "Cells swapped");
        Ok(Arc::new(next))
    }

    /// Flip live-score mode of the slot shown at `cell`
    ///
    /// Empty or out-of-range cells are ignored.
    pub fn toggle_live_score(&self, state: &Arc<PlacementState>, cell: usize) -> Arc<PlacementState> {
        let Some(slot) = state.slot_at_cell(cell) else {
            tracing::debug!(cell = cell, "Live score toggle on empty cell ignored");
            return Arc::clone(state);
        };

        let mut next = PlacementState::clone(state);
        next.slot_live_score[slot] = !next.slot_live_score[slot];

        tracing::debug!(
            cell = cell,
            slot = slot,
            live_score = next.slot_live_score[slot],
            "Live score toggled"
        );
        Arc::new(next)
    }

    /// Switch to another layout
    ///
    /// Slots at or beyond the new cell count are evicted. Surviving slots keep
    /// their content and flags, and cells keep mappings to surviving slots.
    /// A surviving slot left without a cell (its cell no longer exists) is
    /// moved to the first empty cell.
    pub fn change_layout(
        &self,
        state: &Arc<PlacementState>,
        layout_id: LayoutId,
    ) -> Result<Arc<PlacementState>> {
        let num_cells = self
            .catalog
            .num_cells(layout_id)
            .ok_or(Error::LayoutNotFound(layout_id))?;

        if layout_id == state.layout_id {
            return Ok(Arc::clone(state));
        }

        let mut next = PlacementState::clone(state);
        next.layout_id = layout_id;

        for slot in allocator::evicted_slots(&next.slot_contents, num_cells) {
            if let Some(evicted) = next.vacate_slot(slot) {
                tracing::info!(
                    broadcast = %evicted,
                    slot = slot,
                    layout = %layout_id,
                    "Broadcast evicted by layout change"
                );
            }
        }

        next.cell_to_slot.resize(num_cells, None);

        let orphans: Vec<usize> = (0..num_cells)
            .filter(|&slot| next.slot_contents[slot].is_some() && next.cell_of_slot(slot).is_none())
            .collect();
        for slot in orphans {
            if let Some(cell) = allocator::auto_place_index(&next.cell_to_slot, num_cells) {
                next.cell_to_slot[cell] = Some(slot);
            }
        }

        tracing::info!(
            from = %state.layout_id,
            to = %layout_id,
            cells = num_cells,
            displayed = next.displayed_order.len(),
            "Layout changed"
        );
        Ok(Arc::new(next))
    }

    /// Remove every broadcast, keeping the layout
    pub fn clear(&self, state: &Arc<PlacementState>) -> Arc<PlacementState> {
        if state.is_empty() {
            return Arc::clone(state);
        }

        tracing::info!(removed = state.displayed_order.len(), "All broadcasts removed");
        Arc::new(PlacementState::empty(state.layout_id, state.num_cells()))
    }
}

fn check_cell(state: &PlacementState, cell: usize) -> Result<()> {
    if cell < state.num_cells() {
        Ok(())
    } else {
        Err(Error::CellOutOfRange {
            cell,
            num_cells: state.num_cells(),
        })
    }
}

fn place(state: &PlacementState, id: &BroadcastId, slot: usize, cell: usize) -> PlacementState {
    let mut next = state.clone();
    next.slot_contents[slot] = Some(id.clone());
    next.cell_to_slot[cell] = Some(slot);
    next.displayed_order.push(id.clone());

    tracing::info!(broadcast = %id, slot = slot, cell = cell, "Broadcast placed");
    next
}
