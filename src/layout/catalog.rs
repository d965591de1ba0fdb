//! Layout catalog
//!
//! Immutable lookup of every selectable layout, loaded once at startup.

use std::collections::BTreeMap;

use super::{CellGeometry, Layout, LayoutId};
use crate::placement::MAX_SLOTS;

const THIRD: f32 = 100.0 / 3.0;

/// Read-only set of layouts keyed by id
#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    layouts: BTreeMap<LayoutId, Layout>,
}

impl LayoutCatalog {
    /// Create a catalog from explicit layouts
    ///
    /// Layouts with more than `MAX_SLOTS` cells are dropped.
    pub fn new(layouts: impl IntoIterator<Item = Layout>) -> Self {
        let layouts = layouts
            .into_iter()
            .filter(|layout| {
                if layout.num_cells() > MAX_SLOTS {
                    tracing::warn!(
                        layout = %layout.id,
                        cells = layout.num_cells(),
                        max_slots = MAX_SLOTS,
                        "Layout exceeds slot capacity, skipping"
                    );
                    false
                } else {
                    true
                }
            })
            .map(|layout| (layout.id, layout))
            .collect();

        Self { layouts }
    }

    /// Look up a layout by id
    pub fn layout_by_id(&self, id: LayoutId) -> Option<&Layout> {
        self.layouts.get(&id)
    }

    /// Number of cells in a layout, if it exists
    pub fn num_cells(&self, id: LayoutId) -> Option<usize> {
        self.layout_by_id(id).map(Layout::num_cells)
    }

    /// Layouts in picker order
    pub fn ordered(&self) -> Vec<&Layout> {
        let mut layouts: Vec<&Layout> = self.layouts.values().collect();
        layouts.sort_by_key(|layout| layout.display_order);
        layouts
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl Default for LayoutCatalog {
    /// The built-in grids, from a single view up to 3x3
    fn default() -> Self {
        let g = CellGeometry::new;
        let layouts = vec![
            layout(0, "Single View", 0, vec![g(0.0, 0.0, 100.0, 100.0)]),
            layout(
                1,
                "Split View",
                1,
                vec![g(0.0, 0.0, 50.0, 100.0), g(50.0, 0.0, 50.0, 100.0)],
            ),
            layout(
                2,
                "One Large, Two Small",
                3,
                vec![
                    g(0.0, 0.0, 2.0 * THIRD, 100.0),
                    g(2.0 * THIRD, 0.0, THIRD, 50.0),
                    g(2.0 * THIRD, 50.0, THIRD, 50.0),
                ],
            ),
            layout(
                3,
                "Quad View",
                4,
                vec![
                    g(0.0, 0.0, 50.0, 50.0),
                    g(50.0, 0.0, 50.0, 50.0),
                    g(0.0, 50.0, 50.0, 50.0),
                    g(50.0, 50.0, 50.0, 50.0),
                ],
            ),
            layout(
                4,
                "One Large, Three Small",
                5,
                vec![
                    g(0.0, 0.0, 100.0, 2.0 * THIRD),
                    g(0.0, 2.0 * THIRD, THIRD, THIRD),
                    g(THIRD, 2.0 * THIRD, THIRD, THIRD),
                    g(2.0 * THIRD, 2.0 * THIRD, THIRD, THIRD),
                ],
            ),
            layout(
                5,
                "Five View",
                6,
                vec![
                    g(0.0, 0.0, 50.0, 50.0),
                    g(50.0, 0.0, 50.0, 50.0),
                    g(0.0, 50.0, THIRD, 50.0),
                    g(THIRD, 50.0, THIRD, 50.0),
                    g(2.0 * THIRD, 50.0, THIRD, 50.0),
                ],
            ),
            layout(6, "Hex View", 7, grid(3, 2)),
            layout(7, "Nine View", 8, grid(3, 3)),
            layout(8, "Three Column View", 2, grid(3, 1)),
        ];

        Self::new(layouts)
    }
}

fn layout(id: u8, name: &'static str, display_order: u8, cells: Vec<CellGeometry>) -> Layout {
    Layout {
        id: LayoutId(id),
        name,
        display_order,
        cells,
    }
}

/// Uniform grid, row-major
fn grid(columns: usize, rows: usize) -> Vec<CellGeometry> {
    let width = 100.0 / columns as f32;
    let height = 100.0 / rows as f32;

    (0..rows)
        .flat_map(|row| {
            (0..columns).map(move |col| {
                CellGeometry::new(col as f32 * width, row as f32 * height, width, height)
            })
        })
        .collect()
}
