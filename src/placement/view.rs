//! Rendering view of a placement
//!
//! What the rendering layer needs to mount embeds: one entry per occupied
//! visible cell, keyed by slot.

use crate::broadcast::{BroadcastDescriptor, BroadcastRegistry};
use crate::layout::{CellGeometry, LayoutCatalog};

use super::state::PlacementState;

/// An occupied cell ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell<'a> {
    /// Cell in the active layout
    pub cell: usize,
    /// Stable rendering identity; mount one embed per slot
    pub slot: usize,
    pub geometry: CellGeometry,
    pub descriptor: &'a BroadcastDescriptor,
    pub live_score_on: bool,
}

/// List the occupied visible cells, ordered by slot
///
/// Ordering by slot keeps the renderer's embed list stable when cells are
/// swapped. An unknown layout renders nothing; broadcasts missing from the
/// registry are skipped.
pub fn rendered_cells<'a>(
    state: &PlacementState,
    catalog: &LayoutCatalog,
    registry: &'a BroadcastRegistry,
) -> Vec<RenderedCell<'a>> {
    let Some(layout) = catalog.layout_by_id(state.layout_id()) else {
        return Vec::new();
    };

    let mut cells: Vec<RenderedCell<'a>> = state
        .cell_to_slot()
        .iter()
        .enumerate()
        .filter_map(|(cell, mapped)| {
            let slot = (*mapped)?;
            let id = state.slot_contents()[slot].as_ref()?;
            let Some(descriptor) = registry.get(id) else {
                tracing::warn!(broadcast = %id, cell = cell, "Displayed broadcast not in registry");
                return None;
            };

            Some(RenderedCell {
                cell,
                slot,
                geometry: *layout.cell(cell)?,
                descriptor,
                live_score_on: state.live_score_on(slot),
            })
        })
        .collect();

    cells.sort_by_key(|rendered| rendered.slot);
    cells
}
