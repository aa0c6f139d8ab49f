//! Edge-loop retopology on quad grids.
//!
//! A loop operation rewrites a small rectangular patch of a quad mesh so
//! that the number of face strips running through it changes: the
//! expansions (`1to2`, `1to3`, `1to4`) split one strip into several, the
//! reductions (`2to1`, `3to1`, `4to1`, `4to2`, `5to3`) merge several into
//! fewer. Faces outside the patch keep their vertex loops.
//!
//! Every operation runs in two stages:
//!
//! 1. **Harvest**: starting from the single selected vertex, walk the mesh
//!    along two axes to collect a lattice of vertex handles.
//! 2. **Reduce**: delete, merge, split and create faces at fixed lattice
//!    cells, then orient the new faces against their surroundings.
//!
//! # Example
//!
//! ```
//! use retopo::algo::retopo::{retopologize, LoopOp, RetopoOptions};
//! use retopo::mesh::{build_grid, PolyMesh, VertexId};
//!
//! let mut mesh: PolyMesh = build_grid(3, 3, 1.0).unwrap();
//! mesh.select_only(VertexId::new(5)).unwrap();
//!
//! let report = retopologize(&mut mesh, LoopOp::OneToTwo, &RetopoOptions::default()).unwrap();
//! assert_eq!(report.edit.created_vertices.len(), 8);
//! assert_eq!(mesh.num_faces(), 15);
//! ```

mod axis;
mod expand;
mod grid;
mod patch;
mod reduce;
mod region;

pub use axis::{furthest, furthest_neighbor, Axis};
pub use expand::{one_to_four, one_to_three, one_to_two};
pub use grid::{harvest, harvest_from, trace, Cell, GridShape, Lattice};
pub use patch::{lerp, PatchEdit};
pub use reduce::{five_to_three, four_to_one, four_to_two, three_to_one, two_to_one};
pub use region::Region;

use std::fmt;
use std::str::FromStr;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, PolyMesh};

// ==================== Operations ====================

/// The loop operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopOp {
    /// One strip into two.
    OneToTwo,
    /// One strip into three.
    OneToThree,
    /// One strip into four.
    OneToFour,
    /// Two strips into one.
    TwoToOne,
    /// Three strips into one.
    ThreeToOne,
    /// Four strips into one.
    FourToOne,
    /// Four strips into two.
    FourToTwo,
    /// Five strips into three.
    FiveToThree,
}

impl LoopOp {
    /// Every operation, expansions first.
    pub const ALL: [LoopOp; 8] = [
        LoopOp::OneToTwo,
        LoopOp::OneToThree,
        LoopOp::OneToFour,
        LoopOp::TwoToOne,
        LoopOp::ThreeToOne,
        LoopOp::FourToOne,
        LoopOp::FourToTwo,
        LoopOp::FiveToThree,
    ];

    /// The short name, e.g. `"4to2"`.
    pub fn name(self) -> &'static str {
        match self {
            LoopOp::OneToTwo => "1to2",
            LoopOp::OneToThree => "1to3",
            LoopOp::OneToFour => "1to4",
            LoopOp::TwoToOne => "2to1",
            LoopOp::ThreeToOne => "3to1",
            LoopOp::FourToOne => "4to1",
            LoopOp::FourToTwo => "4to2",
            LoopOp::FiveToThree => "5to3",
        }
    }

    /// The lattice cells the operation works on.
    pub fn region(self) -> &'static Region {
        match self {
            LoopOp::OneToTwo | LoopOp::OneToThree | LoopOp::OneToFour => &region::EXPAND,
            LoopOp::TwoToOne => &region::TWO_TO_ONE,
            LoopOp::ThreeToOne => &region::THREE_TO_ONE,
            LoopOp::FourToOne => &region::FOUR_TO_ONE,
            LoopOp::FourToTwo => &region::FOUR_TO_TWO,
            LoopOp::FiveToThree => &region::FIVE_TO_THREE,
        }
    }

    /// Smallest harvest the operation accepts.
    pub fn minimum_shape(self) -> GridShape {
        self.region().minimum
    }

    /// Whether the operation adds strips rather than removing them.
    pub fn is_expansion(self) -> bool {
        matches!(self, LoopOp::OneToTwo | LoopOp::OneToThree | LoopOp::OneToFour)
    }

    fn slot(self) -> usize {
        self as usize
    }

    /// Rewrite the patch covered by `lattice`.
    ///
    /// The lattice must be at least [`minimum_shape`](Self::minimum_shape);
    /// cells beyond it are ignored.
    pub fn run<I: MeshIndex>(
        self,
        mesh: &mut PolyMesh<I>,
        lattice: &Lattice<I>,
        dissolve: bool,
    ) -> Result<PatchEdit<I>> {
        let minimum = self.minimum_shape();
        if !lattice.fits(minimum) {
            return Err(MeshError::invalid_param(
                "lattice",
                format!("{}x{} vertices", lattice.num_rows(), lattice.num_columns()),
                "smaller than the operation needs",
            ));
        }
        match self {
            LoopOp::OneToTwo => one_to_two(mesh, lattice, dissolve),
            LoopOp::OneToThree => one_to_three(mesh, lattice, dissolve),
            LoopOp::OneToFour => one_to_four(mesh, lattice, dissolve),
            LoopOp::TwoToOne => two_to_one(mesh, lattice, dissolve),
            LoopOp::ThreeToOne => three_to_one(mesh, lattice, dissolve),
            LoopOp::FourToOne => four_to_one(mesh, lattice, dissolve),
            LoopOp::FourToTwo => four_to_two(mesh, lattice, dissolve),
            LoopOp::FiveToThree => five_to_three(mesh, lattice, dissolve),
        }
    }
}

impl fmt::Display for LoopOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LoopOp {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        LoopOp::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MeshError::UnknownOperation(s.to_string()))
    }
}

// ==================== Configuration ====================

/// Harvest shape used for each operation.
///
/// The default table uses every operation's minimum shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTable {
    shapes: [GridShape; 8],
}

impl Default for OperationTable {
    fn default() -> Self {
        Self {
            shapes: LoopOp::ALL.map(LoopOp::minimum_shape),
        }
    }
}

impl OperationTable {
    /// Harvest `shape` for `op` instead of its minimum.
    pub fn with_shape(mut self, op: LoopOp, shape: GridShape) -> Result<Self> {
        if !shape.covers(op.minimum_shape()) {
            return Err(MeshError::invalid_param(
                "shape",
                format!("{} for {}", shape, op),
                "smaller than the operation's minimum",
            ));
        }
        self.shapes[op.slot()] = shape;
        Ok(self)
    }

    /// Shape harvested for `op`.
    pub fn shape(&self, op: LoopOp) -> GridShape {
        self.shapes[op.slot()]
    }
}

/// Per-call options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetopoOptions {
    /// Axis followed along each lattice row.
    pub across: Axis,
    /// Axis followed from one row to the next.
    pub down: Axis,
    /// Also dissolve the edges and vertices left over by the operation.
    pub dissolve: bool,
}

impl Default for RetopoOptions {
    fn default() -> Self {
        Self {
            across: Axis::PosX,
            down: Axis::PosY,
            dissolve: false,
        }
    }
}

impl RetopoOptions {
    /// Options walking `across` then `down`, without dissolving.
    pub fn new(across: Axis, down: Axis) -> Self {
        Self {
            across,
            down,
            dissolve: false,
        }
    }

    /// Set whether leftovers are dissolved.
    pub fn with_dissolve(mut self, dissolve: bool) -> Self {
        self.dissolve = dissolve;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.across.component() == self.down.component() {
            return Err(MeshError::invalid_param(
                "axes",
                format!("{} / {}", self.across, self.down),
                "across and down must follow different coordinates",
            ));
        }
        Ok(())
    }
}

// ==================== Dispatch ====================

/// Outcome of one applied operation.
#[derive(Debug, Clone)]
pub struct RetopoReport<I: MeshIndex = u32> {
    /// The operation that ran.
    pub operation: LoopOp,
    /// The harvested lattice, in handles valid before the edit.
    pub lattice: Lattice<I>,
    /// What changed.
    pub edit: PatchEdit<I>,
}

/// Applies loop operations with a fixed [`OperationTable`].
#[derive(Debug, Clone, Default)]
pub struct Retopologizer {
    table: OperationTable,
}

impl Retopologizer {
    /// Create a dispatcher over `table`.
    pub fn new(table: OperationTable) -> Self {
        Self { table }
    }

    /// The shape table in use.
    pub fn table(&self) -> &OperationTable {
        &self.table
    }

    /// Harvest from the selected vertex and apply `op`.
    ///
    /// Selection and walk failures leave the mesh untouched. Once the
    /// rewrite has started, a failure may leave it partially edited.
    pub fn apply<I: MeshIndex>(
        &self,
        mesh: &mut PolyMesh<I>,
        op: LoopOp,
        options: &RetopoOptions,
    ) -> Result<RetopoReport<I>> {
        options.validate()?;
        let shape = self.table.shape(op);
        let lattice = harvest(mesh, shape, options.across, options.down)?;
        let edit = op.run(mesh, &lattice, options.dissolve)?;
        log::debug!(
            "{} on {} patch: +{} vertices, {:+} faces",
            op,
            shape,
            edit.created_vertices.len(),
            edit.face_delta()
        );
        Ok(RetopoReport {
            operation: op,
            lattice,
            edit,
        })
    }

    /// Like [`apply`](Self::apply), with the operation given by name.
    pub fn apply_named<I: MeshIndex>(
        &self,
        mesh: &mut PolyMesh<I>,
        name: &str,
        options: &RetopoOptions,
    ) -> Result<RetopoReport<I>> {
        let op: LoopOp = name.parse()?;
        self.apply(mesh, op, options)
    }

    /// Whether `op` could harvest its patch from the current selection.
    ///
    /// Only the walk is checked; the rewrite itself may still fail on
    /// irregular topology.
    pub fn can_apply<I: MeshIndex>(
        &self,
        mesh: &PolyMesh<I>,
        op: LoopOp,
        options: &RetopoOptions,
    ) -> bool {
        if options.validate().is_err() {
            return false;
        }
        match mesh.single_selected() {
            Ok(seed) => trace(mesh, seed, self.table.shape(op), options.across, options.down).is_ok(),
            Err(_) => false,
        }
    }
}

/// Apply `op` with the default operation table.
pub fn retopologize<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    op: LoopOp,
    options: &RetopoOptions,
) -> Result<RetopoReport<I>> {
    Retopologizer::default().apply(mesh, op, options)
}
