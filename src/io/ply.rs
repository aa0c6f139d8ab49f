//! PLY (Stanford polygon) format support.
//!
//! Faces are read and written with their full arity. Any binary or ASCII
//! PLY that `ply-rs` understands can be loaded; saving writes ASCII.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, MeshIndex, PolyMesh};

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use retopo::io::ply;
/// use retopo::mesh::PolyMesh;
///
/// let mesh: PolyMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<PolyMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse(BufReader::new(file), path)
}

/// Parse PLY data from `reader`. `path` is only used in error messages.
pub fn parse<R: BufRead, I: MeshIndex>(mut reader: R, path: &Path) -> Result<PolyMesh<I>> {
    let fail = |message: &str| MeshError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| fail(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| fail("no vertex element"))?;
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let mut p = Point3::origin();
        for (k, name) in ["x", "y", "z"].into_iter().enumerate() {
            p[k] = get_float_property(vertex, name)
                .ok_or_else(|| fail(&format!("vertex missing {} coordinate", name)))?;
        }
        vertices.push(p);
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| fail("no face element"))?;
    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| fail("face missing vertex_indices property"))?;
        if indices.len() < 3 {
            log::warn!("skipping PLY face with {} corner(s)", indices.len());
            continue;
        }
        faces.push(indices);
    }

    build_from_polygons(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &PolyMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as ASCII PLY.
pub fn write<W: Write, I: MeshIndex>(mesh: &PolyMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by retopo")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        write!(writer, "{}", f.len())?;
        for i in f {
            write!(writer, " {}", i)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_grid;
    use std::io::Cursor;

    #[test]
    fn test_write_then_parse_keeps_quads() {
        let mesh = build_grid::<u32>(3, 2, 1.0).unwrap();
        let mut out = Vec::new();
        write(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("element face 6"));
        assert!(text.contains("4 0 1 5 4"));

        let back: PolyMesh<u32> = parse(Cursor::new(text), Path::new("grid.ply")).unwrap();
        assert_eq!(back.num_vertices(), 12);
        assert_eq!(back.num_faces(), 6);
        assert!(back.is_quad_mesh());
    }

    #[test]
    fn test_missing_faces() {
        let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n0 0 0\n";
        let err = parse::<_, u32>(Cursor::new(text), Path::new("points.ply")).unwrap_err();
        assert!(matches!(err, MeshError::LoadError { .. }));
    }
}
