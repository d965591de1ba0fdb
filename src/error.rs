//! Error types
//!
//! Placement transitions report failures through [`Error`]. Backend dispatch
//! failures have their own type in [`crate::subscription::BackendError`] and
//! never surface here.

use crate::broadcast::BroadcastId;
use crate::layout::LayoutId;

/// Error type for placement operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Every rendering slot is occupied, or no visible cell is free
    CapacityExceeded {
        /// Number of slots available
        max_slots: usize,
    },
    /// Cell index outside the current layout
    CellOutOfRange {
        /// Requested cell
        cell: usize,
        /// Cells in the current layout
        num_cells: usize,
    },
    /// Layout id not present in the catalog
    LayoutNotFound(LayoutId),
    /// Broadcast id not present in the registry
    UnknownBroadcast(BroadcastId),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::CapacityExceeded { max_slots } => {
                write!(f, "No more views available ({} in use)", max_slots)
            }
            Error::CellOutOfRange { cell, num_cells } => {
                write!(f, "Cell {} out of range (layout has {})", cell, num_cells)
            }
            Error::LayoutNotFound(id) => write!(f, "Layout not found: {}", id),
            Error::UnknownBroadcast(id) => write!(f, "Unknown broadcast: {}", id),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for placement operations
pub type Result<T> = std::result::Result<T, Error>;
