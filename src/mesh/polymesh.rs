//! Polygon mesh with explicit vertex, edge and face records.
//!
//! This module provides the editable mesh used by the retopology operators.
//! Unlike a half-edge structure it tolerates any polygon size, wire edges,
//! T-junctions and faces being deleted out from under their edges, which is
//! what localized topology surgery needs.
//!
//! # Structure
//!
//! - Each **vertex** stores its position, a selection flag and the list of
//!   incident edges (in insertion order; this order drives traversal)
//! - Each **edge** stores its two endpoints and the faces using it
//! - Each **face** stores its vertex loop in winding order
//!
//! # Adjacency invariant
//!
//! Every edge is listed by both of its endpoints and every face is listed by
//! each edge on its loop. All mutating operations in this module and in the
//! editing operations keep that invariant; [`PolyMesh::is_valid`] checks it.
//!
//! # Stable handles
//!
//! Elements live in slot vectors. Deleting an element empties its slot but
//! never shifts or reuses it, so handles held by a caller (for example a
//! harvested lattice) stay meaningful for the whole edit session.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// A vertex of the polygon mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Whether the vertex is part of the current selection.
    pub selected: bool,

    /// Incident edges, for traversal only.
    pub(crate) edges: Vec<EdgeId<I>>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new, unselected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            selected: false,
            edges: Vec::new(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Incident edges, in the order they were attached.
    pub fn edges(&self) -> &[EdgeId<I>] {
        &self.edges
    }

    /// Number of incident edges.
    #[inline]
    pub fn valence(&self) -> usize {
        self.edges.len()
    }
}

/// An undirected edge between two vertices.
#[derive(Debug, Clone)]
pub struct Edge<I: MeshIndex = u32> {
    pub(crate) vertices: [VertexId<I>; 2],
    pub(crate) faces: Vec<FaceId<I>>,
}

impl<I: MeshIndex> Edge<I> {
    /// The two endpoints.
    #[inline]
    pub fn vertices(&self) -> [VertexId<I>; 2] {
        self.vertices
    }

    /// Faces whose loop runs along this edge.
    pub fn faces(&self) -> &[FaceId<I>] {
        &self.faces
    }

    /// Whether `v` is one of the endpoints.
    #[inline]
    pub fn contains(&self, v: VertexId<I>) -> bool {
        self.vertices[0] == v || self.vertices[1] == v
    }

    /// The endpoint opposite to `v`, or `None` if `v` is not an endpoint.
    #[inline]
    pub fn other(&self, v: VertexId<I>) -> Option<VertexId<I>> {
        if self.vertices[0] == v {
            Some(self.vertices[1])
        } else if self.vertices[1] == v {
            Some(self.vertices[0])
        } else {
            None
        }
    }

    /// Whether the edge connects exactly the vertices `a` and `b`.
    #[inline]
    pub fn connects(&self, a: VertexId<I>, b: VertexId<I>) -> bool {
        (self.vertices[0] == a && self.vertices[1] == b)
            || (self.vertices[0] == b && self.vertices[1] == a)
    }

    /// Whether exactly one face uses this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.faces.len() == 1
    }

    /// Whether no face uses this edge.
    #[inline]
    pub fn is_wire(&self) -> bool {
        self.faces.is_empty()
    }
}

/// A polygonal face, stored as a closed vertex loop.
#[derive(Debug, Clone)]
pub struct Face<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<VertexId<I>>,
}

impl<I: MeshIndex> Face<I> {
    /// The vertex loop in winding order.
    pub fn vertices(&self) -> &[VertexId<I>] {
        &self.vertices
    }

    /// Number of corners.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Faces always have at least three corners.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether `v` is a corner of this face.
    pub fn contains(&self, v: VertexId<I>) -> bool {
        self.vertices.contains(&v)
    }

    /// Position of `v` in the loop.
    pub fn position_of(&self, v: VertexId<I>) -> Option<usize> {
        self.vertices.iter().position(|&w| w == v)
    }

    /// Directed edges `(from, to)` in winding order.
    pub fn directed_edges(&self) -> impl Iterator<Item = (VertexId<I>, VertexId<I>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Whether the loop walks from `a` directly to `b`.
    pub fn has_directed_edge(&self, a: VertexId<I>, b: VertexId<I>) -> bool {
        self.directed_edges().any(|(u, w)| u == a && w == b)
    }
}

/// An editable polygon mesh.
///
/// Elements are addressed by stable handles; see the [module docs](self).
#[derive(Debug, Clone)]
pub struct PolyMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Option<Vertex<I>>>,
    pub(crate) edges: Vec<Option<Edge<I>>>,
    pub(crate) faces: Vec<Option<Face<I>>>,
}

impl<I: MeshIndex> Default for PolyMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> PolyMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        // Quad-dominant meshes have roughly two edges per face.
        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_faces * 2 + num_vertices),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.iter().flatten().count()
    }

    /// Number of live edges.
    pub fn num_edges(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Number of live faces.
    pub fn num_faces(&self) -> usize {
        self.faces.iter().flatten().count()
    }

    /// Whether the handle refers to a live vertex.
    pub fn contains_vertex(&self, v: VertexId<I>) -> bool {
        matches!(self.vertices.get(v.index()), Some(Some(_)))
    }

    /// Whether the handle refers to a live edge.
    pub fn contains_edge(&self, e: EdgeId<I>) -> bool {
        matches!(self.edges.get(e.index()), Some(Some(_)))
    }

    /// Whether the handle refers to a live face.
    pub fn contains_face(&self, f: FaceId<I>) -> bool {
        matches!(self.faces.get(f.index()), Some(Some(_)))
    }

    /// Get a vertex by handle.
    pub fn vertex(&self, v: VertexId<I>) -> Result<&Vertex<I>> {
        self.vertices
            .get(v.index())
            .and_then(Option::as_ref)
            .ok_or(MeshError::DeadElement {
                kind: "vertex",
                index: v.index(),
            })
    }

    pub(crate) fn vertex_mut(&mut self, v: VertexId<I>) -> Result<&mut Vertex<I>> {
        self.vertices
            .get_mut(v.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::DeadElement {
                kind: "vertex",
                index: v.index(),
            })
    }

    /// Get an edge by handle.
    pub fn edge(&self, e: EdgeId<I>) -> Result<&Edge<I>> {
        self.edges
            .get(e.index())
            .and_then(Option::as_ref)
            .ok_or(MeshError::DeadElement {
                kind: "edge",
                index: e.index(),
            })
    }

    pub(crate) fn edge_mut(&mut self, e: EdgeId<I>) -> Result<&mut Edge<I>> {
        self.edges
            .get_mut(e.index())
            .and_then(Option::as_mut)
            .ok_or(MeshError::DeadElement {
                kind: "edge",
                index: e.index(),
            })
    }

    /// Get a face by handle.
    pub fn face(&self, f: FaceId<I>) -> Result<&Face<I>> {
        self.faces
            .get(f.index())
            .and_then(Option::as_ref)
            .ok_or(MeshError::DeadElement {
                kind: "face",
                index: f.index(),
            })
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> Result<Point3<f64>> {
        Ok(self.vertex(v)?.position)
    }

    /// Set the position of a vertex.
    pub fn set_position(&mut self, v: VertexId<I>, pos: Point3<f64>) -> Result<()> {
        self.vertex_mut(v)?.position = pos;
        Ok(())
    }

    // ==================== Selection ====================

    /// Whether a vertex is selected.
    pub fn is_selected(&self, v: VertexId<I>) -> Result<bool> {
        Ok(self.vertex(v)?.selected)
    }

    /// Set the selection flag of a vertex.
    pub fn set_selected(&mut self, v: VertexId<I>, selected: bool) -> Result<()> {
        self.vertex_mut(v)?.selected = selected;
        Ok(())
    }

    /// Deselect every vertex.
    pub fn clear_selection(&mut self) {
        for v in self.vertices.iter_mut().flatten() {
            v.selected = false;
        }
    }

    /// Make `v` the only selected vertex.
    pub fn select_only(&mut self, v: VertexId<I>) -> Result<()> {
        // Validate first so a stale handle leaves the selection untouched.
        self.vertex(v)?;
        self.clear_selection();
        self.set_selected(v, true)
    }

    /// Iterate over the selected vertices.
    pub fn selected_vertices(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices().filter(|(_, v)| v.selected).map(|(id, _)| id)
    }

    /// The single selected vertex, or [`MeshError::SelectionCount`].
    pub fn single_selected(&self) -> Result<VertexId<I>> {
        let mut selected = self.selected_vertices();
        match (selected.next(), selected.next()) {
            (Some(v), None) => Ok(v),
            (None, _) => Err(MeshError::SelectionCount { count: 0 }),
            (Some(_), Some(_)) => Err(MeshError::SelectionCount {
                count: 2 + selected.count(),
            }),
        }
    }

    // ==================== Iteration ====================

    /// Iterate over all live vertex handles.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices().map(|(id, _)| id)
    }

    /// Iterate over all live vertices with their handles.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (VertexId::new(i), v)))
    }

    /// Iterate over all live edge handles.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.edges().map(|(id, _)| id)
    }

    /// Iterate over all live edges with their handles.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeId::new(i), e)))
    }

    /// Iterate over all live face handles.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces().map(|(id, _)| id)
    }

    /// Iterate over all live faces with their handles.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<I>)> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.as_ref().map(|f| (FaceId::new(i), f)))
    }

    // ==================== Topology Queries ====================

    /// Incident edges of a vertex.
    pub fn vertex_edges(&self, v: VertexId<I>) -> Result<&[EdgeId<I>]> {
        Ok(&self.vertex(v)?.edges)
    }

    /// Vertices sharing an edge with `v`, in incident-edge order.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> Result<Vec<VertexId<I>>> {
        self.vertex(v)?
            .edges
            .iter()
            .map(|&e| {
                let edge = self.edge(e)?;
                edge.other(v).ok_or_else(|| MeshError::NonManifold {
                    details: format!("edge {} is listed by vertex {} but does not touch it", e, v),
                })
            })
            .collect()
    }

    /// Faces having `v` as a corner, without duplicates, in incident-edge order.
    pub fn vertex_faces(&self, v: VertexId<I>) -> Result<Vec<FaceId<I>>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for &e in &self.vertex(v)?.edges {
            for &f in &self.edge(e)?.faces {
                if seen.insert(f) {
                    out.push(f);
                }
            }
        }
        Ok(out)
    }

    /// Compute the valence (number of incident edges) of a vertex.
    pub fn valence(&self, v: VertexId<I>) -> Result<usize> {
        Ok(self.vertex(v)?.valence())
    }

    /// The edge connecting `a` and `b`, if any.
    pub fn find_edge(&self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        let va = self.vertex(a).ok()?;
        va.edges.iter().copied().find(|&e| {
            self.edge(e)
                .map(|edge| edge.connects(a, b))
                .unwrap_or(false)
        })
    }

    /// The vertex loop of a face.
    pub fn face_vertices(&self, f: FaceId<I>) -> Result<&[VertexId<I>]> {
        Ok(&self.face(f)?.vertices)
    }

    /// The edges along a face loop, in winding order.
    pub fn face_edges(&self, f: FaceId<I>) -> Result<Vec<EdgeId<I>>> {
        self.face(f)?
            .directed_edges()
            .map(|(a, b)| {
                self.find_edge(a, b).ok_or(MeshError::MissingEdge {
                    v0: a.index(),
                    v1: b.index(),
                })
            })
            .collect()
    }

    /// A live face whose corners are exactly the given set, if any.
    pub fn find_face(&self, corners: &[VertexId<I>]) -> Option<FaceId<I>> {
        let first = *corners.first()?;
        let wanted: HashSet<VertexId<I>> = corners.iter().copied().collect();
        self.vertex_faces(first).ok()?.into_iter().find(|&f| {
            self.face(f)
                .map(|face| {
                    face.len() == wanted.len() && face.vertices.iter().all(|v| wanted.contains(v))
                })
                .unwrap_or(false)
        })
    }

    /// Check whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.faces().all(|(_, f)| f.len() == 4)
    }

    /// Check whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.faces().all(|(_, f)| f.len() == 3)
    }

    // ==================== Geometry ====================

    /// Area-weighted face normal (Newell's method), not normalized.
    pub fn face_normal_raw(&self, f: FaceId<I>) -> Result<Vector3<f64>> {
        let face = self.face(f)?;
        let mut n = Vector3::zeros();
        for (a, b) in face.directed_edges() {
            let p = self.position(a)?;
            let q = self.position(b)?;
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        Ok(n)
    }

    /// Unit normal of a face; zero for degenerate faces.
    pub fn face_normal(&self, f: FaceId<I>) -> Result<Vector3<f64>> {
        let n = self.face_normal_raw(f)?;
        let len = n.norm();
        Ok(if len > 1e-300 { n / len } else { Vector3::zeros() })
    }

    /// Area of a (planar) face.
    pub fn face_area(&self, f: FaceId<I>) -> Result<f64> {
        Ok(0.5 * self.face_normal_raw(f)?.norm())
    }

    /// Average of the face corners.
    pub fn face_centroid(&self, f: FaceId<I>) -> Result<Point3<f64>> {
        let face = self.face(f)?;
        let mut sum = Vector3::zeros();
        for &v in &face.vertices {
            sum += self.position(v)?.coords;
        }
        Ok(Point3::from(sum / face.len() as f64))
    }

    /// Length of an edge.
    pub fn edge_length(&self, e: EdgeId<I>) -> Result<f64> {
        let [a, b] = self.edge(e)?.vertices;
        Ok((self.position(b)? - self.position(a)?).norm())
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.vertices().map(|(_, v)| v.position);
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }

    /// Total area of all faces.
    pub fn surface_area(&self) -> f64 {
        self.face_ids()
            .filter_map(|f| self.face_area(f).ok())
            .sum()
    }

    // ==================== Construction ====================

    /// Add a new unselected vertex and return its handle.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Some(Vertex::new(position)));
        id
    }

    /// Return the edge between `a` and `b`, creating it if needed.
    pub fn add_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> Result<EdgeId<I>> {
        self.vertex(a)?;
        self.vertex(b)?;
        if a == b {
            return Err(MeshError::NonManifold {
                details: format!("edge from vertex {} to itself", a),
            });
        }
        if let Some(e) = self.find_edge(a, b) {
            return Ok(e);
        }
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Some(Edge {
            vertices: [a, b],
            faces: Vec::new(),
        }));
        self.vertex_mut(a)?.edges.push(id);
        self.vertex_mut(b)?.edges.push(id);
        Ok(id)
    }

    /// Add a face over the given vertex loop, creating missing edges.
    ///
    /// Fails if the loop has fewer than three corners, repeats a corner,
    /// references a dead vertex, or duplicates an existing face.
    pub fn add_face(&mut self, corners: &[VertexId<I>]) -> Result<FaceId<I>> {
        let slot = self.faces.len();
        if corners.len() < 3 {
            return Err(MeshError::DegenerateFace { face: slot });
        }
        let mut unique = HashSet::with_capacity(corners.len());
        for &v in corners {
            self.vertex(v)?;
            if !unique.insert(v) {
                return Err(MeshError::DegenerateFace { face: slot });
            }
        }
        if let Some(existing) = self.find_face(corners) {
            return Err(MeshError::NonManifold {
                details: format!("face {} already spans these vertices", existing),
            });
        }

        let id = FaceId::new(slot);
        let n = corners.len();
        let mut loop_edges = Vec::with_capacity(n);
        for i in 0..n {
            loop_edges.push(self.add_edge(corners[i], corners[(i + 1) % n])?);
        }
        for e in loop_edges {
            self.edge_mut(e)?.faces.push(id);
        }
        self.faces.push(Some(Face {
            vertices: corners.to_vec(),
        }));
        Ok(id)
    }

    /// Detach a face from its edges and free its slot.
    pub(crate) fn unlink_face(&mut self, f: FaceId<I>) -> Result<Face<I>> {
        let edges = self.face_edges(f)?;
        for e in edges {
            self.edge_mut(e)?.faces.retain(|&g| g != f);
        }
        self.faces[f.index()].take().ok_or(MeshError::DeadElement {
            kind: "face",
            index: f.index(),
        })
    }

    /// Detach a face-less edge from its endpoints and free its slot.
    pub(crate) fn unlink_edge(&mut self, e: EdgeId<I>) -> Result<Edge<I>> {
        let edge = self.edge(e)?;
        if !edge.faces.is_empty() {
            return Err(MeshError::NonManifold {
                details: format!("edge {} is still used by {} face(s)", e, edge.faces.len()),
            });
        }
        let [a, b] = edge.vertices;
        self.vertex_mut(a)?.edges.retain(|&x| x != e);
        self.vertex_mut(b)?.edges.retain(|&x| x != e);
        self.edges[e.index()].take().ok_or(MeshError::DeadElement {
            kind: "edge",
            index: e.index(),
        })
    }

    /// Free the slot of a vertex that has no edges left.
    pub(crate) fn unlink_vertex(&mut self, v: VertexId<I>) -> Result<Vertex<I>> {
        let valence = self.valence(v)?;
        if valence != 0 {
            return Err(MeshError::not_dissolvable(
                v.index(),
                format!("still has {} edge(s)", valence),
            ));
        }
        self.vertices[v.index()].take().ok_or(MeshError::DeadElement {
            kind: "vertex",
            index: v.index(),
        })
    }

    // ==================== Validation ====================

    /// Check the adjacency invariant between vertices, edges and faces.
    pub fn is_valid(&self) -> bool {
        for (vid, v) in self.vertices() {
            for &e in &v.edges {
                match self.edge(e) {
                    Ok(edge) if edge.contains(vid) => {}
                    _ => return false,
                }
            }
        }

        for (eid, e) in self.edges() {
            let [a, b] = e.vertices;
            if a == b {
                return false;
            }
            for v in [a, b] {
                match self.vertex(v) {
                    Ok(vert) if vert.edges.contains(&eid) => {}
                    _ => return false,
                }
            }
            for &f in &e.faces {
                match self.face(f) {
                    Ok(face) if face.has_directed_edge(a, b) || face.has_directed_edge(b, a) => {}
                    _ => return false,
                }
            }
        }

        for (fid, f) in self.faces() {
            if f.len() < 3 {
                return false;
            }
            for (a, b) in f.directed_edges() {
                match self.find_edge(a, b).and_then(|e| self.edge(e).ok()) {
                    Some(edge) if edge.faces.contains(&fid) => {}
                    _ => return false,
                }
            }
        }

        true
    }
}
