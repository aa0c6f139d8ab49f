//! Shared machinery for rewriting a harvested patch.
//!
//! [`PatchEditor`] wraps the mesh and lattice for the duration of one
//! operation. It resolves lattice cells, performs the kernel edits the
//! operators are made of and keeps the bookkeeping needed for the final
//! [`PatchEdit`] and for orienting stitched faces.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};

use super::grid::{Cell, Lattice};
use super::region::Region;
use crate::error::{MeshError, Result};
use crate::mesh::{DeleteContext, DirectedEdges, FaceId, MeshIndex, PolyMesh, VertexId};

/// What a loop operation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchEdit<I: MeshIndex = u32> {
    /// Vertices synthesized by the operation.
    pub created_vertices: Vec<VertexId<I>>,
    /// Faces alive after the operation that did not exist before it.
    pub created_faces: Vec<FaceId<I>>,
    /// Number of faces alive before the operation that are gone now.
    pub removed_faces: usize,
}

impl<I: MeshIndex> PatchEdit<I> {
    /// Net change in face count.
    pub fn face_delta(&self) -> isize {
        self.created_faces.len() as isize - self.removed_faces as isize
    }
}

/// Point at parameter `t` on the segment from `a` to `b`.
#[inline]
pub fn lerp(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    a + (b - a) * t
}

/// Edit session over one harvested patch.
pub(crate) struct PatchEditor<'a, I: MeshIndex> {
    mesh: &'a mut PolyMesh<I>,
    lattice: &'a Lattice<I>,
    operation: &'static str,
    faces_before: HashSet<FaceId<I>>,
    created_vertices: Vec<VertexId<I>>,
    reference: DirectedEdges<I>,
}

impl<'a, I: MeshIndex> PatchEditor<'a, I> {
    pub fn new(mesh: &'a mut PolyMesh<I>, lattice: &'a Lattice<I>, operation: &'static str) -> Self {
        let faces_before = mesh.face_ids().collect();
        Self {
            mesh,
            lattice,
            operation,
            faces_before,
            created_vertices: Vec::new(),
            reference: DirectedEdges::default(),
        }
    }

    // ==================== Cells ====================

    pub fn vertex(&self, cell: Cell) -> Result<VertexId<I>> {
        self.lattice.at(cell.0, cell.1)
    }

    /// The first `len` handles of lattice row `row`.
    pub fn lattice_row(&self, row: usize, len: usize) -> Result<Vec<VertexId<I>>> {
        (0..len).map(|c| self.vertex((row, c))).collect()
    }

    pub fn position(&self, cell: Cell) -> Result<Point3<f64>> {
        self.mesh.position(self.vertex(cell)?)
    }

    pub fn set_position(&mut self, cell: Cell, p: Point3<f64>) -> Result<()> {
        let v = self.vertex(cell)?;
        self.mesh.set_position(v, p)
    }

    pub fn translate(&mut self, cell: Cell, offset: Vector3<f64>) -> Result<()> {
        let p = self.position(cell)?;
        self.set_position(cell, p + offset)
    }

    /// Move `cell` half-way toward the cell one row up.
    pub fn lift(&mut self, cell: Cell) -> Result<()> {
        let (r, c) = cell;
        let above = r.checked_sub(1).ok_or_else(|| {
            MeshError::invalid_param("cell", format!("({}, {})", r, c), "has no row above")
        })?;
        let target = self.position((above, c))?;
        let p = self.position(cell)?;
        self.set_position(cell, lerp(&p, &target, 0.5))
    }

    /// Position of a vertex handle, created or harvested.
    pub fn position_of(&self, v: VertexId<I>) -> Result<Point3<f64>> {
        self.mesh.position(v)
    }

    pub fn add_vertex(&mut self, p: Point3<f64>) -> VertexId<I> {
        let v = self.mesh.add_vertex(p);
        self.created_vertices.push(v);
        v
    }

    // ==================== Topology ====================

    /// Merge the faces across each rail edge.
    pub fn dissolve_rails(&mut self, rails: &[(Cell, Cell)]) -> Result<()> {
        for &(a, b) in rails {
            let (va, vb) = (self.vertex(a)?, self.vertex(b)?);
            let e = self.mesh.find_edge(va, vb).ok_or(MeshError::MissingEdge {
                v0: va.index(),
                v1: vb.index(),
            })?;
            self.mesh.dissolve_edge(e)?;
        }
        log::debug!("{}: dissolved {} rail(s)", self.operation, rails.len());
        Ok(())
    }

    pub fn dissolve_vertex(&mut self, cell: Cell) -> Result<()> {
        let v = self.vertex(cell)?;
        self.mesh.dissolve_vertex(v)
    }

    pub fn connect(&mut self, a: Cell, b: Cell) -> Result<()> {
        let (va, vb) = (self.vertex(a)?, self.vertex(b)?);
        self.mesh.connect_vertices(va, vb).map(|_| ())
    }

    /// Faces whose corners all lie in one of the vertex subsets.
    fn enclosed_faces(&self, subsets: &[&[Cell]]) -> Result<Vec<FaceId<I>>> {
        let mut out = Vec::new();
        for cells in subsets {
            let members: HashSet<VertexId<I>> = self.lattice.resolve(cells)?.into_iter().collect();
            for &v in &members {
                for f in self.mesh.vertex_faces(v)? {
                    if out.contains(&f) {
                        continue;
                    }
                    if self.mesh.face(f)?.vertices().iter().all(|w| members.contains(w)) {
                        out.push(f);
                    }
                }
            }
        }
        out.sort();
        Ok(out)
    }

    /// Delete the faces enclosed by the region, recording their winding.
    ///
    /// With `sides`, the region's rail edges are deleted too, together with
    /// every face using them.
    pub fn excise(&mut self, region: &Region, sides: bool) -> Result<usize> {
        let faces = self.enclosed_faces(region.enclosed)?;
        if faces.is_empty() {
            return Err(MeshError::MissingFaces {
                operation: self.operation,
            });
        }
        self.reference.extend(self.mesh.directed_edges_of(&faces)?);

        let deleted = if sides {
            let mut edges = Vec::with_capacity(region.rails.len());
            for &(a, b) in region.rails {
                let (va, vb) = (self.vertex(a)?, self.vertex(b)?);
                edges.push(self.mesh.find_edge(va, vb).ok_or(MeshError::MissingEdge {
                    v0: va.index(),
                    v1: vb.index(),
                })?);
            }
            self.mesh.delete(&edges, &faces, DeleteContext::EdgesFaces)?
        } else {
            self.mesh
                .delete(&[], &faces, DeleteContext::FacesKeepBoundary)?
        };

        log::debug!(
            "{}: excised {} face(s) ({} enclosed)",
            self.operation,
            deleted.faces.len(),
            faces.len()
        );
        Ok(deleted.faces.len())
    }

    /// Add replacement faces and orient them against their surroundings.
    pub fn stitch(&mut self, loops: &[&[VertexId<I>]]) -> Result<Vec<FaceId<I>>> {
        let mut faces = Vec::with_capacity(loops.len());
        for corners in loops {
            faces.push(self.mesh.add_face(corners)?);
        }
        self.mesh.recalc_winding(&faces, &self.reference)?;
        log::debug!("{}: stitched {} face(s)", self.operation, faces.len());
        Ok(faces)
    }

    /// Dissolve the region's cleanup vertices.
    pub fn cleanup(&mut self, region: &Region) -> Result<()> {
        for &cell in region.cleanup {
            let v = self.vertex(cell)?;
            if !self.mesh.contains_vertex(v) {
                log::warn!(
                    "{}: cleanup vertex {} is already gone",
                    self.operation,
                    v
                );
                continue;
            }
            self.mesh.dissolve_vertex(v)?;
        }
        Ok(())
    }

    /// Close the session and summarize the changes.
    pub fn finish(self) -> PatchEdit<I> {
        let mut created_faces: Vec<_> = self
            .mesh
            .face_ids()
            .filter(|f| !self.faces_before.contains(f))
            .collect();
        created_faces.sort();
        let removed_faces = self
            .faces_before
            .iter()
            .filter(|&&f| !self.mesh.contains_face(f))
            .count();
        let created_vertices = self
            .created_vertices
            .into_iter()
            .filter(|&v| self.mesh.contains_vertex(v))
            .collect();
        PatchEdit {
            created_vertices,
            created_faces,
            removed_faces,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::retopo::grid::{harvest_from, GridShape};
    use crate::algo::retopo::region;
    use crate::algo::retopo::Axis;
    use crate::mesh::build_grid;

    #[test]
    fn test_lerp() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, -3.0, 6.0);
        assert!((lerp(&a, &b, 1.0 / 3.0) - Point3::new(1.0, -1.0, 2.0)).norm() < 1e-10);
        assert!((lerp(&a, &b, 0.0) - a).norm() < 1e-10);
    }

    #[test]
    fn test_excise_and_stitch() {
        let mut mesh = build_grid::<u32>(3, 3, 1.0).unwrap();
        let seed = VertexId::new(4 + 1);
        let lattice = harvest_from(&mut mesh, seed, GridShape::new(1, 1), Axis::PosX, Axis::PosY)
            .unwrap();

        let mut editor = PatchEditor::new(&mut mesh, &lattice, "test");
        assert_eq!(editor.excise(&region::EXPAND, false).unwrap(), 1);
        let a = editor.vertex((0, 0)).unwrap();
        let b = editor.vertex((0, 1)).unwrap();
        let c = editor.vertex((1, 0)).unwrap();
        let d = editor.vertex((1, 1)).unwrap();
        // Wound backwards on purpose; the recorded quad corrects it.
        editor.stitch(&[&[a, c, d], &[a, d, b]]).unwrap();
        let edit = editor.finish();

        assert_eq!(edit.created_faces.len(), 2);
        assert_eq!(edit.removed_faces, 1);
        assert_eq!(edit.face_delta(), 1);
        assert!(edit.created_vertices.is_empty());
        let up = Vector3::new(0.0, 0.0, 1.0);
        for f in edit.created_faces {
            assert!((mesh.face_normal(f).unwrap() - up).norm() < 1e-10);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_excise_without_match_fails() {
        let mut mesh = build_grid::<u32>(3, 3, 1.0).unwrap();
        let lattice = harvest_from(
            &mut mesh,
            VertexId::new(0),
            GridShape::new(3, 2),
            Axis::PosX,
            Axis::PosY,
        )
        .unwrap();
        let mut editor = PatchEditor::new(&mut mesh, &lattice, "2to1");
        // Only the quad above the rail matches; once it is gone nothing does.
        assert_eq!(editor.excise(&region::TWO_TO_ONE, false).unwrap(), 1);
        assert!(matches!(
            editor.excise(&region::TWO_TO_ONE, false),
            Err(MeshError::MissingFaces { operation: "2to1" })
        ));
    }
}
