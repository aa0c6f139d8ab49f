//! # retopo
//!
//! Edge-loop retopology operators for polygon meshes.
//!
//! retopo rewrites small rectangular patches of a quad mesh so that the
//! number of face strips flowing through them changes, e.g. two strips merge
//! into one or one strip splits into three. Each operation harvests a vertex
//! lattice from a selected seed vertex, then replaces faces at fixed lattice
//! positions with a fixed new topology.
//!
//! ## Features
//!
//! - **Polygon mesh kernel**: stable typed handles, selection, and the
//!   editing primitives the operators are built from (delete, dissolve,
//!   connect, winding repair)
//! - **Eight loop operations**: `1to2`, `1to3`, `1to4`, `2to1`, `3to1`,
//!   `4to1`, `4to2`, `5to3`
//! - **File formats**: OBJ and PLY, keeping polygon arity
//!
//! ## Quick Start
//!
//! ```
//! use retopo::prelude::*;
//!
//! // A 3x3 quad grid on the XY plane, spacing 1.
//! let mut mesh: PolyMesh = build_grid(3, 3, 1.0).unwrap();
//!
//! // Seed the patch at grid coordinate (1, 1).
//! mesh.select_only(VertexId::new(5)).unwrap();
//!
//! let options = RetopoOptions::new(Axis::PosX, Axis::PosY);
//! let report = retopologize(&mut mesh, LoopOp::OneToThree, &options).unwrap();
//!
//! assert_eq!(report.edit.face_delta(), 7);
//! assert!(mesh.is_quad_mesh());
//! ```
//!
//! Operations can also be picked by name:
//!
//! ```
//! use retopo::prelude::*;
//!
//! let mut mesh: PolyMesh = build_grid(4, 3, 1.0).unwrap();
//! mesh.select_only(VertexId::new(0)).unwrap();
//!
//! let options = RetopoOptions::default().with_dissolve(true);
//! Retopologizer::default()
//!     .apply_named(&mut mesh, "4to2", &options)
//!     .unwrap();
//! assert_eq!(mesh.num_faces(), 12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use retopo::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::retopo::{
        retopologize, Axis, GridShape, LoopOp, OperationTable, RetopoOptions, Retopologizer,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_grid, EdgeId, FaceId, MeshIndex, PolyMesh, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_polygon_soup_to_patch() {
        // A 2x2 quad sheet written out by hand, then split in the first quad.
        let vertices: Vec<Point3<f64>> = (0..3)
            .flat_map(|r| (0..3).map(move |c| Point3::new(c as f64, r as f64, 0.0)))
            .collect();
        let faces = vec![
            vec![0, 1, 4, 3],
            vec![1, 2, 5, 4],
            vec![3, 4, 7, 6],
            vec![4, 5, 8, 7],
        ];
        let mut mesh: PolyMesh = build_from_polygons(&vertices, &faces).unwrap();
        mesh.select_only(VertexId::new(0)).unwrap();

        let report = retopologize(&mut mesh, LoopOp::OneToFour, &RetopoOptions::default()).unwrap();
        assert_eq!(report.edit.created_faces.len(), 9);
        assert_eq!(mesh.num_faces(), 4 - 1 + 9);
        assert!(mesh.is_valid());
    }
}
