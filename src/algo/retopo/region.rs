//! Lattice regions touched by each loop operation.
//!
//! A [`Region`] names, in lattice cells, which faces an operation replaces,
//! which edges it removes and which vertices it tidies up afterwards. Cells
//! are resolved to vertex handles only once a lattice has been harvested.

use super::grid::{Cell, GridShape};

/// Lattice cells an operation works on.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    /// Smallest harvest (in steps) the operation can work with.
    pub minimum: GridShape,

    /// Vertex subsets. A face whose corners all belong to one subset is
    /// replaced by the operation.
    pub enclosed: &'static [&'static [Cell]],

    /// Edges between lattice cells. Reductions merge the faces on either
    /// side; expansions delete them (with their faces) when dissolving.
    pub rails: &'static [(Cell, Cell)],

    /// Vertices dissolved at the end when dissolving is requested. Empty
    /// for operations whose leftovers belong to the new faces.
    pub cleanup: &'static [Cell],
}

/// The single quad every expansion replaces, and its four sides.
pub const EXPAND: Region = Region {
    minimum: GridShape::new(1, 1),
    enclosed: &[&[(0, 0), (0, 1), (1, 0), (1, 1)]],
    rails: &[
        ((0, 0), (0, 1)),
        ((0, 0), (1, 0)),
        ((1, 0), (1, 1)),
        ((0, 1), (1, 1)),
    ],
    cleanup: &[],
};

/// `2to1`: the triangle left by the connect and the quad above it.
pub const TWO_TO_ONE: Region = Region {
    minimum: GridShape::new(3, 2),
    enclosed: &[&[(2, 0), (2, 2), (2, 1)], &[(1, 1), (2, 1), (2, 2), (1, 2)]],
    rails: &[((2, 1), (3, 1))],
    cleanup: &[(3, 1)],
};

/// `3to1`: only rails; the strip is split by a connect.
pub const THREE_TO_ONE: Region = Region {
    minimum: GridShape::new(3, 3),
    enclosed: &[],
    rails: &[((2, 1), (3, 1)), ((2, 2), (3, 2))],
    cleanup: &[(3, 1), (3, 2)],
};

/// `4to1`
pub const FOUR_TO_ONE: Region = Region {
    minimum: GridShape::new(3, 4),
    enclosed: &[],
    rails: &[((2, 1), (3, 1)), ((2, 2), (3, 2)), ((2, 3), (3, 3))],
    cleanup: &[(3, 1), (3, 2), (3, 3)],
};

/// `4to2`: the two hexagons produced by the rail merges.
pub const FOUR_TO_TWO: Region = Region {
    minimum: GridShape::new(3, 4),
    enclosed: &[
        &[(3, 0), (2, 0), (2, 1), (2, 2), (3, 2), (3, 1)],
        &[(3, 2), (2, 2), (3, 4), (2, 3), (2, 4), (3, 3)],
    ],
    rails: &[((2, 1), (3, 1)), ((2, 3), (3, 3))],
    cleanup: &[],
};

/// `5to3`: two hexagons and the quad between them.
pub const FIVE_TO_THREE: Region = Region {
    minimum: GridShape::new(3, 5),
    enclosed: &[
        &[(3, 0), (2, 0), (2, 1), (2, 2), (3, 2), (3, 1)],
        &[(2, 2), (2, 3), (3, 3), (3, 2)],
        &[(2, 3), (2, 4), (2, 5), (3, 5), (3, 4), (3, 3)],
    ],
    rails: &[((2, 1), (3, 1)), ((2, 4), (3, 4))],
    cleanup: &[(3, 1), (3, 4)],
};

impl Region {
    /// Every cell the region mentions must lie inside its minimum lattice.
    pub fn is_consistent(&self) -> bool {
        let rows = self.minimum.lattice_rows();
        let columns = self.minimum.lattice_columns();
        let inside = |&(r, c): &Cell| r < rows && c < columns;
        self.enclosed.iter().all(|set| set.iter().all(inside))
            && self.rails.iter().all(|(a, b)| inside(a) && inside(b))
            && self.cleanup.iter().all(inside)
    }
}
