//! Slot and cell allocation policy
//!
//! Decides which slot a newly added broadcast receives, which cell auto
//! placement picks, and which slots a smaller layout evicts. Kept separate
//! from the transitions so the rules can be read and tested on their own.

use crate::broadcast::BroadcastId;

/// Lowest-indexed empty slot
pub fn lowest_free_slot(slots: &[Option<BroadcastId>]) -> Option<usize> {
    slots.iter().position(Option::is_none)
}

/// Index an auto-placed item lands at: the first gap, else the end, capped
///
/// Returns `None` when there is no gap and `entries` already holds `cap`
/// items.
pub fn auto_place_index<T>(entries: &[Option<T>], cap: usize) -> Option<usize> {
    match entries.iter().position(Option::is_none) {
        Some(gap) if gap < cap => Some(gap),
        Some(_) => None,
        None if entries.len() < cap => Some(entries.len()),
        None => None,
    }
}

/// Layout-agnostic auto placement over a plain array
///
/// Fills the first gap, otherwise appends while below `cap`. A full array is
/// returned unchanged.
pub fn auto_place<T: Clone>(entries: &[Option<T>], item: T, cap: usize) -> Vec<Option<T>> {
    let mut placed = entries.to_vec();

    match auto_place_index(entries, cap) {
        Some(index) if index < placed.len() => placed[index] = Some(item),
        Some(_) => placed.push(Some(item)),
        None => {}
    }

    placed
}

/// Occupied slots a layout with `num_cells` cells cannot keep
///
/// Eviction is by slot index: every occupied slot at or beyond `num_cells`
/// goes, whichever cell currently shows it.
pub fn evicted_slots(slots: &[Option<BroadcastId>], num_cells: usize) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .skip(num_cells)
        .filter(|(_, content)| content.is_some())
        .map(|(slot, _)| slot)
        .collect()
}
