//! Topology editing operations on [`PolyMesh`].
//!
//! These are the building blocks of the loop operators: deleting regions,
//! merging faces across an edge, removing vertices from their surroundings,
//! splitting a face between two of its corners and making face windings
//! agree after faces have been replaced.

use std::collections::{HashMap, HashSet, VecDeque};

use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use super::polymesh::PolyMesh;
use crate::error::{MeshError, Result};

/// A set of directed edges `(from, to)`, used as winding reference.
pub type DirectedEdges<I = u32> = HashSet<(VertexId<I>, VertexId<I>)>;

/// How [`PolyMesh::delete`] treats the neighbourhood of deleted elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteContext {
    /// Delete the faces only. Edges interior to the deleted region (used by
    /// two or more deleted faces and by nothing else) go with them, as do
    /// vertices left without edges. Region boundary edges survive.
    FacesKeepBoundary,

    /// Delete the edges together with every face using them. Vertices are
    /// kept, even if they end up without edges.
    EdgesFaces,
}

/// Elements removed by a [`PolyMesh::delete`] call.
#[derive(Debug, Clone)]
pub struct Deleted<I: MeshIndex = u32> {
    /// Removed faces.
    pub faces: Vec<FaceId<I>>,
    /// Removed edges.
    pub edges: Vec<EdgeId<I>>,
    /// Removed vertices.
    pub vertices: Vec<VertexId<I>>,
}

impl<I: MeshIndex> Default for Deleted<I> {
    fn default() -> Self {
        Self {
            faces: Vec::new(),
            edges: Vec::new(),
            vertices: Vec::new(),
        }
    }
}

impl<I: MeshIndex> PolyMesh<I> {
    // ==================== Deletion ====================

    /// Delete edges and faces.
    ///
    /// With [`DeleteContext::FacesKeepBoundary`] only `faces` is considered.
    /// With [`DeleteContext::EdgesFaces`] every listed edge is removed along
    /// with all faces that use it; listed faces are removed as well.
    pub fn delete(
        &mut self,
        edges: &[EdgeId<I>],
        faces: &[FaceId<I>],
        context: DeleteContext,
    ) -> Result<Deleted<I>> {
        let mut out = Deleted::default();
        match context {
            DeleteContext::FacesKeepBoundary => {
                let mut uses: HashMap<EdgeId<I>, usize> = HashMap::new();
                let mut corners = Vec::new();
                for &f in faces {
                    if !self.contains_face(f) || out.faces.contains(&f) {
                        continue;
                    }
                    for e in self.face_edges(f)? {
                        *uses.entry(e).or_insert(0) += 1;
                    }
                    corners.extend_from_slice(self.face_vertices(f)?);
                    self.unlink_face(f)?;
                    out.faces.push(f);
                }

                let mut interior: Vec<_> = uses
                    .into_iter()
                    .filter(|&(_, n)| n >= 2)
                    .map(|(e, _)| e)
                    .collect();
                interior.sort();
                for e in interior {
                    if self.edge(e)?.is_wire() {
                        self.unlink_edge(e)?;
                        out.edges.push(e);
                    }
                }

                for v in corners {
                    if self.contains_vertex(v) && self.valence(v)? == 0 {
                        self.unlink_vertex(v)?;
                        out.vertices.push(v);
                    }
                }
            }
            DeleteContext::EdgesFaces => {
                let mut doomed: Vec<FaceId<I>> = faces.to_vec();
                for &e in edges {
                    if let Ok(edge) = self.edge(e) {
                        doomed.extend_from_slice(&edge.faces);
                    }
                }
                for f in doomed {
                    if self.contains_face(f) {
                        self.unlink_face(f)?;
                        out.faces.push(f);
                    }
                }
                for &e in edges {
                    if self.contains_edge(e) {
                        self.unlink_edge(e)?;
                        out.edges.push(e);
                    }
                }
            }
        }

        log::trace!(
            "delete ({:?}): {} face(s), {} edge(s), {} vertex(es)",
            context,
            out.faces.len(),
            out.edges.len(),
            out.vertices.len()
        );
        Ok(out)
    }

    /// Remove a single face, keeping its edges and vertices.
    pub fn remove_face(&mut self, f: FaceId<I>) -> Result<()> {
        self.unlink_face(f).map(|_| ())
    }

    // ==================== Merging ====================

    /// Merge faces into a single face.
    ///
    /// Edges shared by two of the faces (walked in opposite directions)
    /// disappear; the remaining directed edges must chain into exactly one
    /// loop, which becomes the new face. Vertices left without edges are
    /// removed, except those listed in `keep`.
    fn merge_faces_keeping(
        &mut self,
        faces: &[FaceId<I>],
        keep: Option<VertexId<I>>,
    ) -> Result<FaceId<I>> {
        let mut directed: Vec<(VertexId<I>, VertexId<I>)> = Vec::new();
        let mut corners = Vec::new();
        for &f in faces {
            let face = self.face(f)?;
            directed.extend(face.directed_edges());
            corners.extend_from_slice(&face.vertices);
        }

        let all: DirectedEdges<I> = directed.iter().copied().collect();
        let boundary: Vec<_> = directed
            .iter()
            .copied()
            .filter(|&(a, b)| !all.contains(&(b, a)))
            .collect();

        let mut next: HashMap<VertexId<I>, VertexId<I>> = HashMap::new();
        for &(a, b) in &boundary {
            if next.insert(a, b).is_some() {
                return Err(MeshError::NonManifold {
                    details: format!("merged region touches itself at vertex {}", a),
                });
            }
        }

        let start = boundary.first().map(|&(a, _)| a).ok_or_else(|| {
            MeshError::NonManifold {
                details: "merged region has no boundary".to_string(),
            }
        })?;
        let mut merged = vec![start];
        let mut current = start;
        loop {
            let to = *next.get(&current).ok_or_else(|| MeshError::NonManifold {
                details: format!("merged boundary is open at vertex {}", current),
            })?;
            if to == start {
                break;
            }
            if merged.len() > boundary.len() {
                break;
            }
            merged.push(to);
            current = to;
        }
        if merged.len() != boundary.len() {
            return Err(MeshError::NonManifold {
                details: format!(
                    "merged boundary splits into several loops ({} of {} edges chained)",
                    merged.len(),
                    boundary.len()
                ),
            });
        }

        let interior: Vec<EdgeId<I>> = directed
            .iter()
            .filter(|&&(a, b)| all.contains(&(b, a)))
            .filter_map(|&(a, b)| self.find_edge(a, b))
            .collect();

        for &f in faces {
            self.unlink_face(f)?;
        }
        for e in interior {
            if self.contains_edge(e) && self.edge(e)?.is_wire() {
                self.unlink_edge(e)?;
            }
        }
        for v in corners {
            if Some(v) != keep && self.contains_vertex(v) && self.valence(v)? == 0 {
                self.unlink_vertex(v)?;
            }
        }

        self.add_face(&merged)
    }

    /// Merge faces into one, returning the new face.
    ///
    /// The faces must form an edge-connected, consistently wound region with
    /// a single boundary loop.
    pub fn merge_faces(&mut self, faces: &[FaceId<I>]) -> Result<FaceId<I>> {
        self.merge_faces_keeping(faces, None)
    }

    /// Remove an edge by merging the two faces on either side.
    pub fn dissolve_edge(&mut self, e: EdgeId<I>) -> Result<FaceId<I>> {
        let edge = self.edge(e)?;
        if edge.faces.len() != 2 {
            let [a, b] = edge.vertices;
            return Err(MeshError::NonManifold {
                details: format!(
                    "edge {}-{} has {} face(s), dissolving needs exactly two",
                    a,
                    b,
                    edge.faces.len()
                ),
            });
        }
        let pair = [edge.faces[0], edge.faces[1]];
        let f = self.merge_faces(&pair)?;
        log::trace!("dissolved edge {} into face {}", e, f);
        Ok(f)
    }

    /// Remove a vertex, healing the surrounding topology.
    ///
    /// A vertex with two edges is spliced out: its faces lose the corner and
    /// the two edges become one. Otherwise the faces around it are merged;
    /// the vertex then either vanishes with its edges or, on a boundary, is
    /// left with two edges and is spliced out.
    pub fn dissolve_vertex(&mut self, v: VertexId<I>) -> Result<()> {
        let valence = self.valence(v)?;
        if valence == 2 {
            return self.join_edges_at(v);
        }

        let faces = self.vertex_faces(v)?;
        if faces.len() < 2 {
            return Err(MeshError::not_dissolvable(
                v.index(),
                format!("{} edge(s) around {} face(s)", valence, faces.len()),
            ));
        }
        self.merge_faces_keeping(&faces, Some(v))?;

        match self.valence(v)? {
            0 => {
                self.unlink_vertex(v)?;
                Ok(())
            }
            2 => self.join_edges_at(v),
            n => Err(MeshError::not_dissolvable(
                v.index(),
                format!("{} edge(s) remain after merging its faces", n),
            )),
        }
    }

    /// Splice out a vertex with exactly two edges.
    fn join_edges_at(&mut self, v: VertexId<I>) -> Result<()> {
        let edges = self.vertex_edges(v)?.to_vec();
        let [e0, e1] = match edges.as_slice() {
            &[e0, e1] => [e0, e1],
            _ => {
                return Err(MeshError::not_dissolvable(
                    v.index(),
                    format!("joining needs two edges, found {}", edges.len()),
                ))
            }
        };
        let a = self.edge(e0)?.other(v).ok_or(MeshError::MissingEdge {
            v0: v.index(),
            v1: v.index(),
        })?;
        let b = self.edge(e1)?.other(v).ok_or(MeshError::MissingEdge {
            v0: v.index(),
            v1: v.index(),
        })?;

        let faces = self.vertex_faces(v)?;
        for &f in &faces {
            if self.face(f)?.len() <= 3 {
                return Err(MeshError::not_dissolvable(
                    v.index(),
                    format!("face {} would collapse", f),
                ));
            }
        }

        for e in [e0, e1] {
            self.edge_mut(e)?.faces.clear();
            self.unlink_edge(e)?;
        }
        self.unlink_vertex(v)?;

        let joined = self.add_edge(a, b)?;
        for &f in &faces {
            if let Some(Some(face)) = self.faces.get_mut(f.index()) {
                face.vertices.retain(|&w| w != v);
            }
            let edge = self.edge_mut(joined)?;
            if !edge.faces.contains(&f) {
                edge.faces.push(f);
            }
        }
        log::trace!("joined edges at vertex {} into {}-{}", v, a, b);
        Ok(())
    }

    // ==================== Splitting ====================

    /// Split a face by a new edge between two of its non-adjacent corners.
    ///
    /// The face is replaced by two faces that keep its winding.
    pub fn connect_vertices(&mut self, a: VertexId<I>, b: VertexId<I>) -> Result<EdgeId<I>> {
        let candidates = self.vertex_faces(a)?;
        let mut target = None;
        for f in candidates {
            let face = self.face(f)?;
            let (Some(i), Some(j)) = (face.position_of(a), face.position_of(b)) else {
                continue;
            };
            let n = face.len();
            if (i + 1) % n == j || (j + 1) % n == i {
                continue;
            }
            target = Some((f, i, j));
            break;
        }
        let (f, i, j) = target.ok_or(MeshError::NoSharedFace {
            v0: a.index(),
            v1: b.index(),
        })?;

        let loop_ = self.face(f)?.vertices.clone();
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let first: Vec<_> = loop_[lo..=hi].to_vec();
        let second: Vec<_> = loop_[hi..]
            .iter()
            .chain(loop_[..=lo].iter())
            .copied()
            .collect();

        self.unlink_face(f)?;
        self.add_face(&first)?;
        self.add_face(&second)?;
        log::trace!("split face {} between vertices {} and {}", f, a, b);
        self.find_edge(a, b).ok_or(MeshError::MissingEdge {
            v0: a.index(),
            v1: b.index(),
        })
    }

    // ==================== Winding ====================

    /// Reverse the vertex loop of a face.
    pub fn flip_face(&mut self, f: FaceId<I>) -> Result<()> {
        self.face(f)?;
        if let Some(Some(face)) = self.faces.get_mut(f.index()) {
            face.vertices.reverse();
        }
        Ok(())
    }

    /// Collect the directed edges of the given faces.
    ///
    /// Recording this before replacing faces gives
    /// [`recalc_winding`](Self::recalc_winding) its reference orientation.
    pub fn directed_edges_of(&self, faces: &[FaceId<I>]) -> Result<DirectedEdges<I>> {
        let mut out = DirectedEdges::default();
        for &f in faces {
            out.extend(self.face(f)?.directed_edges());
        }
        Ok(out)
    }

    /// Make the windings of `faces` agree with their surroundings.
    ///
    /// Each face is scored against `reference` (directed edges of the faces
    /// it replaced; a matching edge counts for the current winding, a
    /// reversed one against) and against surviving neighbours outside
    /// `faces` (which should walk shared edges the other way). Faces with a
    /// negative score are flipped; faces without evidence take the
    /// orientation of an edge-adjacent decided face. A group with no
    /// evidence at all keeps the winding of its first face.
    ///
    /// Returns the number of flipped faces.
    pub fn recalc_winding(
        &mut self,
        faces: &[FaceId<I>],
        reference: &DirectedEdges<I>,
    ) -> Result<usize> {
        let members: HashSet<FaceId<I>> = faces.iter().copied().collect();
        let mut flip: HashMap<FaceId<I>, bool> = HashMap::new();
        let mut queue = VecDeque::new();

        for &f in faces {
            let mut score = 0i64;
            for (a, b) in self.face(f)?.directed_edges() {
                if reference.contains(&(a, b)) {
                    score += 1;
                }
                if reference.contains(&(b, a)) {
                    score -= 1;
                }
                let Some(e) = self.find_edge(a, b) else {
                    continue;
                };
                for &g in &self.edge(e)?.faces {
                    if g == f || members.contains(&g) {
                        continue;
                    }
                    let other = self.face(g)?;
                    if other.has_directed_edge(a, b) {
                        score -= 1;
                    } else if other.has_directed_edge(b, a) {
                        score += 1;
                    }
                }
            }
            if score != 0 && !flip.contains_key(&f) {
                flip.insert(f, score < 0);
                queue.push_back(f);
            }
        }

        // Faces with evidence spread first; an undecided group is seeded
        // only once nothing decided can reach it.
        let mut seeds = faces.iter();
        loop {
            while let Some(f) = queue.pop_front() {
                let flip_f = flip.get(&f).copied().unwrap_or(false);
                for (a, b) in self.face(f)?.directed_edges() {
                    let Some(e) = self.find_edge(a, b) else {
                        continue;
                    };
                    for &g in &self.edge(e)?.faces {
                        if g == f || !members.contains(&g) || flip.contains_key(&g) {
                            continue;
                        }
                        let same = self.face(g)?.has_directed_edge(a, b);
                        flip.insert(g, flip_f ^ same);
                        queue.push_back(g);
                    }
                }
            }
            match seeds.find(|f| !flip.contains_key(*f)) {
                Some(&seed) => {
                    flip.insert(seed, false);
                    queue.push_back(seed);
                }
                None => break,
            }
        }

        let mut flipped = 0;
        for &f in faces {
            if flip.get(&f).copied().unwrap_or(false) {
                self.flip_face(f)?;
                flipped += 1;
            }
        }
        if flipped > 0 {
            log::debug!("recalc_winding flipped {} of {} face(s)", flipped, faces.len());
        }
        Ok(flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_grid;
    use nalgebra::Point3;

    /// Vertex at grid coordinate `(c, r)` of a grid built with unit spacing.
    fn at(columns: usize, c: usize, r: usize) -> VertexId {
        VertexId::new(r * (columns + 1) + c)
    }

    #[test]
    fn test_delete_faces_keep_boundary() {
        let mut mesh = build_grid::<u32>(2, 1, 1.0).unwrap();
        let faces: Vec<_> = mesh.face_ids().collect();
        let deleted = mesh
            .delete(&[], &faces, DeleteContext::FacesKeepBoundary)
            .unwrap();

        assert_eq!(deleted.faces.len(), 2);
        // Only the shared middle edge was interior to the region.
        assert_eq!(deleted.edges.len(), 1);
        assert!(deleted.vertices.is_empty());
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.find_edge(at(2, 1, 0), at(2, 1, 1)).is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_delete_edges_faces_keeps_vertices() {
        let mut mesh = build_grid::<u32>(2, 1, 1.0).unwrap();
        let middle = mesh.find_edge(at(2, 1, 0), at(2, 1, 1)).unwrap();
        let deleted = mesh
            .delete(&[middle], &[], DeleteContext::EdgesFaces)
            .unwrap();

        assert_eq!(deleted.faces.len(), 2);
        assert_eq!(deleted.edges, vec![middle]);
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_dissolve_edge() {
        let mut mesh = build_grid::<u32>(2, 1, 1.0).unwrap();
        let middle = mesh.find_edge(at(2, 1, 0), at(2, 1, 1)).unwrap();
        let f = mesh.dissolve_edge(middle).unwrap();

        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face(f).unwrap().len(), 6);
        assert!(!mesh.contains_edge(middle));
        // Both endpoints stay on the merged boundary.
        assert_eq!(mesh.valence(at(2, 1, 0)).unwrap(), 2);
        assert!(mesh.is_valid());

        let boundary = mesh.find_edge(at(2, 0, 0), at(2, 1, 0)).unwrap();
        assert!(mesh.dissolve_edge(boundary).is_err());
    }

    #[test]
    fn test_merge_keeps_winding() {
        let mut mesh = build_grid::<u32>(2, 1, 1.0).unwrap();
        let faces: Vec<_> = mesh.face_ids().collect();
        let n_before = mesh.face_normal(faces[0]).unwrap();
        let f = mesh.merge_faces(&faces).unwrap();
        let n_after = mesh.face_normal(f).unwrap();
        assert!((n_before - n_after).norm() < 1e-10);
    }

    #[test]
    fn test_dissolve_interior_vertex() {
        let mut mesh = build_grid::<u32>(2, 2, 1.0).unwrap();
        let center = at(2, 1, 1);
        mesh.dissolve_vertex(center).unwrap();

        assert!(!mesh.contains_vertex(center));
        assert_eq!(mesh.num_faces(), 1);
        let (_, face) = mesh.faces().next().unwrap();
        assert_eq!(face.len(), 8);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_dissolve_boundary_vertex() {
        let mut mesh = build_grid::<u32>(2, 1, 1.0).unwrap();
        // Bottom-middle vertex: three edges, two faces.
        let v = at(2, 1, 0);
        mesh.dissolve_vertex(v).unwrap();

        assert!(!mesh.contains_vertex(v));
        assert_eq!(mesh.num_faces(), 1);
        let (_, face) = mesh.faces().next().unwrap();
        assert_eq!(face.len(), 5);
        assert!(mesh.find_edge(at(2, 0, 0), at(2, 2, 0)).is_some());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_dissolve_valence_two_vertex() {
        let mut mesh = build_grid::<u32>(1, 1, 1.0).unwrap();
        let f = mesh.face_ids().next().unwrap();
        let a = at(1, 0, 0);
        let b = at(1, 1, 0);
        let mid = mesh.add_vertex(Point3::new(0.5, 0.0, 0.0));

        // Rebuild the quad with an extra corner on its bottom edge.
        let loop_ = mesh.face_vertices(f).unwrap().to_vec();
        mesh.delete(&[], &[f], DeleteContext::FacesKeepBoundary)
            .unwrap();
        let ab = mesh.find_edge(a, b).unwrap();
        mesh.delete(&[ab], &[], DeleteContext::EdgesFaces).unwrap();
        let mut with_mid = vec![loop_[0], mid];
        with_mid.extend_from_slice(&loop_[1..]);
        let g = mesh.add_face(&with_mid).unwrap();
        assert_eq!(mesh.face(g).unwrap().len(), 5);

        mesh.dissolve_vertex(mid).unwrap();
        assert!(!mesh.contains_vertex(mid));
        assert_eq!(mesh.face(g).unwrap().len(), 4);
        assert!(mesh.find_edge(a, b).is_some());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_dissolve_vertex_refuses_to_collapse_triangle() {
        let mut mesh = build_grid::<u32>(1, 1, 1.0).unwrap();
        // Splicing out a quad corner leaves a triangle.
        let corner = at(1, 0, 0);
        mesh.dissolve_vertex(corner).unwrap();
        assert_eq!(mesh.num_faces(), 1);
        let (_, face) = mesh.faces().next().unwrap();
        assert_eq!(face.len(), 3);

        // The triangle cannot lose another corner.
        let next = face.vertices()[0];
        assert!(matches!(
            mesh.dissolve_vertex(next),
            Err(MeshError::NotDissolvable { .. })
        ));
    }

    #[test]
    fn test_connect_vertices() {
        let mut mesh = build_grid::<u32>(1, 1, 1.0).unwrap();
        let a = at(1, 0, 0);
        let c = at(1, 1, 1);
        let n_before = mesh.face_normal(mesh.face_ids().next().unwrap()).unwrap();

        let e = mesh.connect_vertices(a, c).unwrap();
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.edge(e).unwrap().faces().len(), 2);
        for f in mesh.face_ids().collect::<Vec<_>>() {
            assert_eq!(mesh.face(f).unwrap().len(), 3);
            assert!((mesh.face_normal(f).unwrap() - n_before).norm() < 1e-10);
        }
        assert!(mesh.is_valid());

        // Adjacent corners cannot be connected.
        let b = at(1, 1, 0);
        assert!(matches!(
            mesh.connect_vertices(a, b),
            Err(MeshError::NoSharedFace { .. })
        ));
    }

    #[test]
    fn test_recalc_winding_from_reference() {
        let mut mesh = build_grid::<u32>(1, 1, 1.0).unwrap();
        let f = mesh.face_ids().next().unwrap();
        let reference = mesh.directed_edges_of(&[f]).unwrap();
        let mut loop_ = mesh.face_vertices(f).unwrap().to_vec();
        mesh.remove_face(f).unwrap();

        loop_.reverse();
        let g = mesh.add_face(&loop_).unwrap();
        let flipped = mesh.recalc_winding(&[g], &reference).unwrap();
        assert_eq!(flipped, 1);
        assert!(mesh.face(g).unwrap().has_directed_edge(at(1, 0, 0), at(1, 1, 0)));
    }

    #[test]
    fn test_recalc_winding_from_neighbours() {
        let mut mesh = build_grid::<u32>(3, 1, 1.0).unwrap();
        // Replace the middle quad by two triangles, one of them wound backwards.
        let middle = mesh.find_face(&[at(3, 1, 0), at(3, 2, 0), at(3, 2, 1), at(3, 1, 1)]).unwrap();
        mesh.remove_face(middle).unwrap();
        let t0 = mesh
            .add_face(&[at(3, 1, 0), at(3, 1, 1), at(3, 2, 0)])
            .unwrap();
        let t1 = mesh
            .add_face(&[at(3, 2, 0), at(3, 2, 1), at(3, 1, 1)])
            .unwrap();

        let flipped = mesh
            .recalc_winding(&[t0, t1], &DirectedEdges::default())
            .unwrap();
        assert_eq!(flipped, 1);

        let up = nalgebra::Vector3::new(0.0, 0.0, 1.0);
        for f in [t0, t1] {
            assert!((mesh.face_normal(f).unwrap() - up).norm() < 1e-10);
        }
    }

    #[test]
    fn test_recalc_winding_evidence_reaches_earlier_faces() {
        let mut mesh = build_grid::<u32>(3, 1, 1.0).unwrap();
        let middle = mesh.find_face(&[at(3, 1, 0), at(3, 2, 0), at(3, 2, 1), at(3, 1, 1)]).unwrap();
        let right = mesh.find_face(&[at(3, 2, 0), at(3, 3, 0), at(3, 3, 1), at(3, 2, 1)]).unwrap();
        mesh.delete(&[], &[middle, right], DeleteContext::FacesKeepBoundary)
            .unwrap();

        // Both wound backwards. The first only touches the second, so its
        // orientation has to come through the second's outside neighbour.
        let far = mesh
            .add_face(&[at(3, 2, 0), at(3, 2, 1), at(3, 3, 1), at(3, 3, 0)])
            .unwrap();
        let near = mesh
            .add_face(&[at(3, 1, 0), at(3, 1, 1), at(3, 2, 1), at(3, 2, 0)])
            .unwrap();

        let flipped = mesh
            .recalc_winding(&[far, near], &DirectedEdges::default())
            .unwrap();
        assert_eq!(flipped, 2);

        let up = nalgebra::Vector3::new(0.0, 0.0, 1.0);
        for f in [far, near] {
            assert!((mesh.face_normal(f).unwrap() - up).norm() < 1e-10);
        }
        assert!(mesh.is_valid());
    }
}
