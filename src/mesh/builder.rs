//! Mesh construction utilities.
//!
//! This module provides functions for building polygon meshes from
//! face-vertex lists as commonly found in mesh file formats, converting them
//! back, and generating planar quad grids.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{MeshIndex, VertexId};
use super::polymesh::PolyMesh;
use crate::error::{MeshError, Result};

/// Build a polygon mesh from vertices and faces of any size.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of faces, each a loop of vertex indices in winding order
///
/// # Returns
/// A polygon mesh, or an error if the input is invalid.
///
/// # Example
/// ```
/// use retopo::mesh::{build_from_polygons, PolyMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.5, 1.5, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3], vec![3, 2, 4]];
///
/// let mesh: PolyMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_edges(), 6);
/// ```
pub fn build_from_polygons<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[Vec<usize>],
) -> Result<PolyMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    // Validate vertex indices up front so the error names the input face
    for (fi, face) in faces.iter().enumerate() {
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
        }
        for (i, vi) in face.iter().enumerate() {
            if face[i + 1..].contains(vi) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
    }

    let mut mesh = PolyMesh::with_capacity(vertices.len(), faces.len());
    let vertex_ids: Vec<VertexId<I>> = vertices
        .iter()
        .map(|&pos| mesh.add_vertex(pos))
        .collect();

    let mut corners = Vec::new();
    for face in faces {
        corners.clear();
        corners.extend(face.iter().map(|&vi| vertex_ids[vi]));
        mesh.add_face(&corners)?;
    }

    Ok(mesh)
}

/// Build a polygon mesh from vertices and quad faces.
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<PolyMesh<I>> {
    let faces: Vec<Vec<usize>> = faces.iter().map(|f| f.to_vec()).collect();
    build_from_polygons(vertices, &faces)
}

/// Convert a polygon mesh back to a face-vertex representation.
///
/// Deleted slots are skipped, so the returned indices are dense and may
/// differ from the handles' slot numbers.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(mesh: &PolyMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let mut remap: HashMap<VertexId<I>, usize> = HashMap::with_capacity(mesh.num_vertices());
    let mut vertices = Vec::with_capacity(mesh.num_vertices());
    for (id, v) in mesh.vertices() {
        remap.insert(id, vertices.len());
        vertices.push(v.position);
    }

    let faces = mesh
        .faces()
        .map(|(_, f)| f.vertices().iter().map(|v| remap[v]).collect())
        .collect();

    (vertices, faces)
}

/// Build a planar grid of `columns × rows` unit quads in the XY plane.
///
/// Vertex `(c, r)` sits at `(c·spacing, r·spacing, 0)` and has slot
/// `r·(columns+1) + c`. Faces are wound counter-clockwise seen from +Z and
/// are added row by row, so each vertex lists its edges in a fixed order.
pub fn build_grid<I: MeshIndex>(columns: usize, rows: usize, spacing: f64) -> Result<PolyMesh<I>> {
    if columns == 0 {
        return Err(MeshError::invalid_param("columns", columns, "must be at least 1"));
    }
    if rows == 0 {
        return Err(MeshError::invalid_param("rows", rows, "must be at least 1"));
    }
    if !(spacing > 0.0 && spacing.is_finite()) {
        return Err(MeshError::invalid_param(
            "spacing",
            spacing,
            "must be positive and finite",
        ));
    }

    let stride = columns + 1;
    let mut vertices = Vec::with_capacity(stride * (rows + 1));
    for r in 0..=rows {
        for c in 0..=columns {
            vertices.push(Point3::new(c as f64 * spacing, r as f64 * spacing, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(columns * rows);
    for r in 0..rows {
        for c in 0..columns {
            let v00 = r * stride + c;
            faces.push([v00, v00 + 1, v00 + stride + 1, v00 + stride]);
        }
    }

    build_from_quads(&vertices, &faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_quads() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        // Two quads sharing an edge (1-2)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2, 3], [1, 4, 5, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_build_from_quads_two_quads() {
        let (vertices, faces) = two_quads();
        let mesh: PolyMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 7);
        assert!(mesh.is_valid());
        assert!(mesh.is_quad_mesh());

        let shared = mesh.find_edge(VertexId::new(1), VertexId::new(2)).unwrap();
        assert_eq!(mesh.edge(shared).unwrap().faces().len(), 2);
    }

    #[test]
    fn test_mixed_polygons() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 2.0, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3, 4], vec![4, 3, 5]];
        let mesh: PolyMesh<u32> = build_from_polygons(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_faces(), 2);
        assert!(!mesh.is_quad_mesh());
        assert!(!mesh.is_triangle_mesh());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_quads();
        let mesh: PolyMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(out_faces, vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]]);
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_to_face_vertex_compacts_deleted_slots() {
        let (vertices, faces) = two_quads();
        let mut mesh: PolyMesh<u32> = build_from_quads(&vertices, &faces).unwrap();
        let first = mesh.face_ids().next().unwrap();
        mesh.delete(&[], &[first], crate::mesh::DeleteContext::FacesKeepBoundary)
            .unwrap();
        // Vertices 0 and 3 keep their edges, so all six survive.
        let e = mesh.find_edge(VertexId::new(0), VertexId::new(3)).unwrap();
        mesh.delete(&[e], &[], crate::mesh::DeleteContext::EdgesFaces)
            .unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);
        assert_eq!(out_verts.len(), 6);
        assert_eq!(out_faces, vec![vec![1, 4, 5, 2]]);
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![vec![0, 1, 2]];

        let result: Result<PolyMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = two_quads();
        // Degenerate: v0 == v2 (diagonal vertices the same)
        let faces = vec![[0, 1, 0, 3]];

        let result: Result<PolyMesh<u32>> = build_from_quads(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));

        let short = vec![vec![0, 1]];
        let result: Result<PolyMesh<u32>> = build_from_polygons(&vertices, &short);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_grid() {
        let mesh: PolyMesh<u32> = build_grid(3, 2, 0.5).unwrap();

        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(mesh.num_faces(), 6);
        // 3 horizontal edges per vertex row, 4 vertical per face row
        assert_eq!(mesh.num_edges(), 3 * 3 + 4 * 2);
        assert!(mesh.is_valid());

        let v = VertexId::new(2 * 4 + 3);
        assert!((mesh.position(v).unwrap() - Point3::new(1.5, 1.0, 0.0)).norm() < 1e-10);

        let up = nalgebra::Vector3::new(0.0, 0.0, 1.0);
        for f in mesh.face_ids() {
            assert!((mesh.face_normal(f).unwrap() - up).norm() < 1e-10);
            assert!((mesh.face_area(f).unwrap() - 0.25).abs() < 1e-10);
        }
    }

    #[test]
    fn test_build_grid_rejects_bad_parameters() {
        assert!(build_grid::<u32>(0, 2, 1.0).is_err());
        assert!(build_grid::<u32>(2, 0, 1.0).is_err());
        assert!(matches!(
            build_grid::<u32>(2, 2, -1.0),
            Err(MeshError::InvalidParameter { name: "spacing", .. })
        ));
    }
}
