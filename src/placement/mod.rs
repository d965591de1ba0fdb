//! Placement of broadcasts into the grid
//!
//! Two index spaces are kept apart on purpose:
//!
//! ```text
//!    cells (where it is drawn)          slots (what is playing)
//!   ┌────────┬────────┐               ┌────┬────┬────┬─────┐
//!   │ cell 0 │ cell 1 │  cell_to_slot │ s0 │ s1 │ s2 │ ... │  slot_contents
//!   ├────────┼────────┤ ────────────► ├────┼────┼────┼─────┤
//!   │ cell 2 │ cell 3 │               │ id │ id │ -- │     │  slot_live_score
//!   └────────┴────────┘               └────┴────┴────┴─────┘
//! ```
//!
//! A slot is a stable rendering identity: the renderer mounts one embed per
//! slot and keeps it while the slot holds the same broadcast. Rearranging the
//! grid only rewrites `cell_to_slot`, so a swap never remounts an embed, and
//! the live-score flag travels with the slot.
//!
//! Transitions live on [`PlacementStore`] and are pure: they take a shared
//! `Arc<PlacementState>` and return a new one, or the same `Arc` when nothing
//! changed, so callers detect change with `Arc::ptr_eq`.

pub mod allocator;
pub mod state;
pub mod store;
pub mod view;

pub use state::PlacementState;
pub use store::PlacementStore;
pub use view::{rendered_cells, RenderedCell};

/// Number of stable rendering slots
///
/// Bounds the cell count of every layout in the catalog.
pub const MAX_SLOTS: usize = 9;
