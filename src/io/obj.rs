//! Wavefront OBJ format support.
//!
//! Only positions (`v`) and polygon faces (`f`) are read; texture
//! coordinates, normals, groups and materials are skipped. Faces keep their
//! arity, so quads stay quads.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, MeshIndex, PolyMesh};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use retopo::io::obj;
/// use retopo::mesh::PolyMesh;
///
/// let mesh: PolyMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse(BufReader::new(file), path)
}

/// Parse OBJ text from `reader`. `path` is only used in error messages.
pub fn parse<R: BufRead, I: MeshIndex>(reader: R, path: &Path) -> Result<PolyMesh<I>> {
    let fail = |line: usize, message: String| MeshError::LoadError {
        path: path.to_path_buf(),
        message: format!("line {}: {}", line, message),
    };

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let number = n + 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut coords = [0.0; 3];
                for c in &mut coords {
                    let token = parts
                        .next()
                        .ok_or_else(|| fail(number, "vertex needs three coordinates".to_string()))?;
                    *c = token
                        .parse()
                        .map_err(|e| fail(number, format!("bad coordinate {:?}: {}", token, e)))?;
                }
                vertices.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            Some("f") => {
                let mut face = Vec::new();
                for token in parts {
                    face.push(resolve_index(token, vertices.len()).map_err(|m| fail(number, m))?);
                }
                if face.len() < 3 {
                    return Err(fail(number, "face needs at least three corners".to_string()));
                }
                faces.push(face);
            }
            _ => {}
        }
    }

    build_from_polygons(&vertices, &faces)
}

/// Turn an `f` token (`7`, `7/2`, `7//3`, `-1`) into a zero-based index.
fn resolve_index(token: &str, count: usize) -> std::result::Result<usize, String> {
    let head = token.split('/').next().unwrap_or(token);
    let raw: i64 = head
        .parse()
        .map_err(|e| format!("bad face index {:?}: {}", token, e))?;
    let index = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as i64 + raw
    } else {
        return Err("face index 0 is not valid".to_string());
    };
    if index < 0 || index as usize >= count {
        return Err(format!("face index {} out of range ({} vertices)", raw, count));
    }
    Ok(index as usize)
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ text. Dead slots are compacted away.
pub fn write<W: Write, I: MeshIndex>(mesh: &PolyMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# retopo")?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        write!(writer, "f")?;
        for &i in f {
            write!(writer, " {}", i + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
