//! Harvesting a rectangular vertex lattice from a mesh.
//!
//! Starting from a seed vertex, the harvester walks the mesh greedily: each
//! row steps along the *across* axis, and each new row starts one step along
//! the *down* axis from the first vertex of the previous row. Every step
//! takes the edge neighbour that lies furthest ahead along the axis.
//!
//! The walk does not check that the result is a proper grid; on irregular
//! topology it still yields a lattice, just not a meaningful one.

use std::fmt;

use super::axis::{furthest_neighbor, Axis};
use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, PolyMesh, VertexId};

/// Size of a lattice in steps.
///
/// A shape of `rows × columns` steps harvests `(rows + 1) × (columns + 1)`
/// vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridShape {
    /// Steps along the down axis.
    pub rows: usize,
    /// Steps along the across axis.
    pub columns: usize,
}

impl GridShape {
    /// Create a shape from step counts.
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    /// Number of lattice rows (vertices along the down axis).
    pub const fn lattice_rows(self) -> usize {
        self.rows + 1
    }

    /// Number of lattice columns (vertices along the across axis).
    pub const fn lattice_columns(self) -> usize {
        self.columns + 1
    }

    /// Whether this shape is at least `other` in both directions.
    pub const fn covers(self, other: GridShape) -> bool {
        self.rows >= other.rows && self.columns >= other.columns
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// A lattice cell `(row, column)`.
pub type Cell = (usize, usize);

/// Rows of harvested vertex handles.
///
/// `[0][0]` is the seed; the row index grows along the down axis and the
/// column index along the across axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice<I: MeshIndex = u32> {
    rows: Vec<Vec<VertexId<I>>>,
}

impl<I: MeshIndex> Lattice<I> {
    /// Wrap rows of vertex handles. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<VertexId<I>>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            if let Some(bad) = rows.iter().position(|r| r.len() != first.len()) {
                return Err(MeshError::invalid_param(
                    "lattice",
                    format!("row {} has {} entries", bad, rows[bad].len()),
                    "rows must have equal length",
                ));
            }
        }
        Ok(Self { rows })
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// The handle at `(row, column)`.
    pub fn at(&self, row: usize, column: usize) -> Result<VertexId<I>> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .ok_or_else(|| {
                MeshError::invalid_param(
                    "cell",
                    format!("({}, {})", row, column),
                    "outside the harvested lattice",
                )
            })
    }

    /// Resolve a list of cells to vertex handles.
    pub fn resolve(&self, cells: &[Cell]) -> Result<Vec<VertexId<I>>> {
        cells.iter().map(|&(r, c)| self.at(r, c)).collect()
    }

    /// The rows of handles.
    pub fn rows(&self) -> &[Vec<VertexId<I>>] {
        &self.rows
    }

    /// All handles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Whether the lattice can serve a reducer needing `shape`.
    pub fn fits(&self, shape: GridShape) -> bool {
        self.num_rows() >= shape.lattice_rows() && self.num_columns() >= shape.lattice_columns()
    }
}

/// Harvest a lattice from the single selected vertex.
///
/// On success every lattice vertex is selected; on failure the mesh,
/// selection included, is left as it was.
pub fn harvest<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    shape: GridShape,
    across: Axis,
    down: Axis,
) -> Result<Lattice<I>> {
    let seed = mesh.single_selected()?;
    harvest_from(mesh, seed, shape, across, down)
}

/// Harvest a lattice starting at `seed`, ignoring the current selection.
///
/// Lattice vertices are added to the selection on success.
pub fn harvest_from<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    seed: VertexId<I>,
    shape: GridShape,
    across: Axis,
    down: Axis,
) -> Result<Lattice<I>> {
    let lattice = trace(mesh, seed, shape, across, down)?;
    for v in lattice.iter() {
        mesh.set_selected(v, true)?;
    }
    log::debug!(
        "harvested {}x{} lattice from vertex {} ({} across, {} down)",
        lattice.num_rows(),
        lattice.num_columns(),
        seed,
        across,
        down
    );
    Ok(lattice)
}

/// Walk the lattice from `seed` without touching the mesh.
///
/// This is the traversal behind [`harvest_from`], usable as a dry run to
/// check whether an operation can be applied at a vertex.
pub fn trace<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    seed: VertexId<I>,
    shape: GridShape,
    across: Axis,
    down: Axis,
) -> Result<Lattice<I>> {
    mesh.vertex(seed)?;
    let mut rows = Vec::with_capacity(shape.lattice_rows());
    let mut current = seed;

    for r in 0..shape.lattice_rows() {
        let mut row = Vec::with_capacity(shape.lattice_columns());
        row.push(current);
        for c in 1..shape.lattice_columns() {
            current = furthest_neighbor(mesh, current, across)?.ok_or_else(|| {
                MeshError::PatchTooSmall {
                    row: r,
                    column: c,
                    axis: across.to_string(),
                }
            })?;
            row.push(current);
        }
        let first = row[0];
        rows.push(row);

        if r + 1 < shape.lattice_rows() {
            current = furthest_neighbor(mesh, first, down)?.ok_or_else(|| {
                MeshError::PatchTooSmall {
                    row: r + 1,
                    column: 0,
                    axis: down.to_string(),
                }
            })?;
        }
    }

    Ok(Lattice { rows })
}
