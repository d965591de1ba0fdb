//! Grid layouts
//!
//! A layout is a named grid with a fixed number of cells. Cell geometry is
//! expressed in percent of the viewing area so the rendering layer can size
//! embeds without knowing the screen.

pub mod catalog;

pub use catalog::LayoutCatalog;

/// Identifier of a layout in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub u8);

impl std::fmt::Display for LayoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and size of one cell, in percent of the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CellGeometry {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A selectable grid configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Catalog identifier
    pub id: LayoutId,
    /// Human-readable name shown in the layout picker
    pub name: &'static str,
    /// Position in the layout picker
    pub display_order: u8,
    /// One entry per cell
    pub cells: Vec<CellGeometry>,
}

impl Layout {
    /// Number of cells in this layout
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Geometry of a cell, if it exists
    pub fn cell(&self, cell: usize) -> Option<&CellGeometry> {
        self.cells.get(cell)
    }
}
