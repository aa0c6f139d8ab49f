//! Error types for retopo.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors fall into
//! three groups: precondition violations detected before the mesh is touched,
//! structural mismatches found while rewriting a patch (the mesh may already be
//! partially edited), and I/O failures of the host-side file formats.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three distinct vertices.
    #[error("face {face} is degenerate (fewer than three distinct vertices)")]
    DegenerateFace {
        /// The face index (position in the input, or slot of the face).
        face: usize,
    },

    /// A handle points at a deleted or never-allocated element.
    #[error("{kind} {index} does not exist")]
    DeadElement {
        /// Element kind ("vertex", "edge" or "face").
        kind: &'static str,
        /// Slot of the element.
        index: usize,
    },

    /// The mesh has topology the operation cannot handle.
    #[error("mesh has non-manifold topology: {details}")]
    NonManifold {
        /// Description of the non-manifold condition.
        details: String,
    },

    /// Exactly one vertex must be selected to seed a patch.
    #[error("exactly one vertex must be selected, found {count}")]
    SelectionCount {
        /// Number of selected vertices.
        count: usize,
    },

    /// The grid walk ran out of neighbours.
    #[error(
        "patch does not extend far enough in the requested direction \
         (row {row}, column {column}, axis {axis})"
    )]
    PatchTooSmall {
        /// Lattice row being built when the walk stopped.
        row: usize,
        /// Lattice column being built when the walk stopped.
        column: usize,
        /// Axis the probe was following.
        axis: String,
    },

    /// An axis code or name could not be parsed.
    #[error("invalid axis: {0} (expected one of +x, -x, +y, -y, +z, -z)")]
    InvalidAxis(String),

    /// An operation name is not one of the known loop operations.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// An edge the operation relies on is absent.
    #[error("expected an edge between vertex {v0} and vertex {v1}")]
    MissingEdge {
        /// First endpoint slot.
        v0: usize,
        /// Second endpoint slot.
        v1: usize,
    },

    /// None of the faces an operation expected to replace were found.
    #[error("{operation}: no faces matched the patch region")]
    MissingFaces {
        /// Operation being applied.
        operation: &'static str,
    },

    /// Two vertices expected to share a face do not.
    #[error("vertices {v0} and {v1} do not share a face that can be split")]
    NoSharedFace {
        /// First vertex slot.
        v0: usize,
        /// Second vertex slot.
        v1: usize,
    },

    /// A vertex could not be dissolved into its surroundings.
    #[error("vertex {vertex} cannot be dissolved: {reason}")]
    NotDissolvable {
        /// Vertex slot.
        vertex: usize,
        /// Why the dissolve was refused.
        reason: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a dissolve refusal for the given vertex slot.
    pub(crate) fn not_dissolvable(vertex: usize, reason: impl Into<String>) -> Self {
        MeshError::NotDissolvable {
            vertex,
            reason: reason.into(),
        }
    }

    /// Whether the error was raised before any mesh mutation took place.
    ///
    /// Structural mismatches can surface after faces have already been removed,
    /// so callers that need atomicity should work on a clone of the mesh.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MeshError::SelectionCount { .. }
                | MeshError::PatchTooSmall { .. }
                | MeshError::InvalidAxis(_)
                | MeshError::UnknownOperation(_)
                | MeshError::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_too_small_message() {
        let err = MeshError::PatchTooSmall {
            row: 2,
            column: 0,
            axis: "+y".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("does not extend far enough"));
        assert!(msg.contains("+y"));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_structural_errors_are_not_preconditions() {
        let err = MeshError::MissingEdge { v0: 1, v1: 5 };
        assert_eq!(err.to_string(), "expected an edge between vertex 1 and vertex 5");
        assert!(!err.is_precondition());
    }
}
