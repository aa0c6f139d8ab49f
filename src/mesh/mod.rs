//! Core mesh data structures.
//!
//! This module provides the editable polygon mesh and the topology
//! operations the retopology operators are built from.
//!
//! # Overview
//!
//! The primary type is [`PolyMesh`], which stores vertices, edges and faces
//! in slot vectors with explicit adjacency lists. Faces may have any number
//! of corners, and elements can be deleted without invalidating the handles
//! of the elements that remain.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe handles:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an undirected edge
//! - [`FaceId`] - Identifies a face
//!
//! These handles are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! Meshes are typically constructed from file I/O, from face-vertex lists or
//! as a generated grid:
//!
//! ```
//! use retopo::mesh::{build_grid, PolyMesh};
//!
//! let mesh: PolyMesh = build_grid(4, 3, 1.0).unwrap();
//! assert_eq!(mesh.num_faces(), 12);
//! ```

mod builder;
mod edit;
mod index;
mod polymesh;

pub use builder::{build_from_polygons, build_from_quads, build_grid, to_face_vertex};
pub use edit::{DeleteContext, Deleted, DirectedEdges};
pub use index::{EdgeId, FaceId, MeshIndex, VertexId};
pub use polymesh::{Edge, Face, PolyMesh, Vertex};
