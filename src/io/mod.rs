//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Positions and polygon faces |
//! | PLY | `.ply` | ✓ | ✓ | ASCII or binary in, ASCII out |
//!
//! Both formats keep polygon arity, so a quad mesh round-trips as quads.
//!
//! ```no_run
//! use retopo::io::{load, save};
//! use retopo::mesh::PolyMesh;
//!
//! let mesh: PolyMesh = load("model.obj").unwrap();
//! save(&mesh, "model.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, PolyMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn require(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Load a mesh, picking the format from the file extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    let path = path.as_ref();
    let mesh = match Format::require(path)? {
        Format::Obj => obj::load(path)?,
        Format::Ply => ply::load(path)?,
    };
    log::debug!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Save a mesh, picking the format from the file extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::require(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/mesh.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("mesh.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.stl"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load::<_, u32>("mesh.glb").unwrap_err();
        assert!(matches!(
            err,
            MeshError::UnsupportedFormat { extension } if extension == "glb"
        ));
    }
}
