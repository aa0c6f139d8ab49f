//! Expansion operators: one face strip becomes two, three or four.
//!
//! Each operator replaces the single quad spanned by lattice cells
//! `A = [0][0]`, `B = [0][1]`, `C = [1][0]`, `D = [1][1]` with a fixed fan of
//! faces. New vertices are placed by interpolating the quad's sides: the
//! strips split the `A-B` side evenly and are pulled into a loop at one and
//! two thirds of the way from `A-B` to `C-D`.
//!
//! The quad's sides are left in place, so the neighbours across them keep
//! their original edges and now meet the new faces in T-junctions. With
//! `dissolve`, the sides are deleted together with those neighbours.

use nalgebra::Point3;

use super::grid::Lattice;
use super::patch::{lerp, PatchEdit, PatchEditor};
use super::region::EXPAND;
use crate::error::Result;
use crate::mesh::{MeshIndex, PolyMesh, VertexId};

/// The patch corners, as handles and positions.
struct Corners<I: MeshIndex> {
    ids: [VertexId<I>; 4],
    a: Point3<f64>,
    b: Point3<f64>,
    c: Point3<f64>,
    d: Point3<f64>,
}

fn open_patch<I: MeshIndex>(editor: &mut PatchEditor<'_, I>, dissolve: bool) -> Result<Corners<I>> {
    let ids = [
        editor.vertex((0, 0))?,
        editor.vertex((0, 1))?,
        editor.vertex((1, 0))?,
        editor.vertex((1, 1))?,
    ];
    let corners = Corners {
        ids,
        a: editor.position((0, 0))?,
        b: editor.position((0, 1))?,
        c: editor.position((1, 0))?,
        d: editor.position((1, 1))?,
    };
    editor.excise(&EXPAND, dissolve)?;
    Ok(corners)
}

/// `1to2`: one strip becomes two, meeting in a triangle at the middle.
pub fn one_to_two<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    dissolve: bool,
) -> Result<PatchEdit<I>> {
    let mut editor = PatchEditor::new(mesh, lattice, "1to2");
    let k = open_patch(&mut editor, dissolve)?;
    let [a, b, c, d] = k.ids;
    let across = k.b - k.a;

    let p2 = lerp(&k.a, &k.c, 1.0 / 3.0);
    let p4 = lerp(&k.b, &k.d, 1.0 / 3.0);
    let p5 = lerp(&k.a, &k.c, 0.66);
    let lift = (p2 - p5) / 2.0;

    let v1 = editor.add_vertex(lerp(&k.a, &k.b, 0.5));
    let v2 = editor.add_vertex(p2);
    let v4 = editor.add_vertex(p4);
    let v3 = editor.add_vertex(lerp(&p2, &p4, 0.5));
    let v5 = editor.add_vertex(p5);
    let v6 = editor.add_vertex(lerp(&k.b, &k.d, 0.66));
    let v7 = editor.add_vertex(p5 + across / 3.0 + lift);
    let v8 = editor.add_vertex(p5 + across * 0.66 + lift);

    editor.stitch(&[
        &[a, v1, v3, v2],
        &[v1, b, v4, v3],
        &[v2, v3, v7, v5],
        &[v3, v4, v6, v8],
        &[v3, v7, v8],
        &[v7, v8, v6, v5],
        &[v5, v6, d, c],
    ])?;
    Ok(editor.finish())
}

/// `1to3`: one strip becomes three.
pub fn one_to_three<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    dissolve: bool,
) -> Result<PatchEdit<I>> {
    let mut editor = PatchEditor::new(mesh, lattice, "1to3");
    let k = open_patch(&mut editor, dissolve)?;
    let [a, b, c, d] = k.ids;
    let across = k.b - k.a;

    let p3 = lerp(&k.a, &k.c, 1.0 / 3.0);
    let p6 = lerp(&k.b, &k.d, 1.0 / 3.0);
    let p7 = lerp(&k.a, &k.c, 0.66);
    let lift = (p3 - p7) / 2.0;

    let v1 = editor.add_vertex(lerp(&k.a, &k.b, 0.33));
    let v2 = editor.add_vertex(lerp(&k.a, &k.b, 0.66));
    let v3 = editor.add_vertex(p3);
    let v6 = editor.add_vertex(p6);
    let v4 = editor.add_vertex(lerp(&p3, &p6, 0.33));
    let v5 = editor.add_vertex(lerp(&p3, &p6, 0.66));
    let v7 = editor.add_vertex(p7);
    let v10 = editor.add_vertex(lerp(&k.b, &k.d, 0.66));
    let v8 = editor.add_vertex(p7 + across / 3.0 + lift);
    let v9 = editor.add_vertex(p7 + across * 0.66 + lift);

    editor.stitch(&[
        &[a, v1, v4, v3],
        &[v1, v2, v5, v4],
        &[v2, b, v6, v5],
        &[v3, v4, v8, v7],
        &[v4, v5, v9, v8],
        &[v5, v6, v10, v9],
        &[v7, v8, v9, v10],
        &[v7, v10, d, c],
    ])?;
    Ok(editor.finish())
}

/// `1to4`: one strip becomes four, gathered by a pentagon in the middle.
pub fn one_to_four<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    dissolve: bool,
) -> Result<PatchEdit<I>> {
    let mut editor = PatchEditor::new(mesh, lattice, "1to4");
    let k = open_patch(&mut editor, dissolve)?;
    let [a, b, c, d] = k.ids;

    let p4 = lerp(&k.a, &k.c, 1.0 / 3.0);
    let p8 = lerp(&k.b, &k.d, 1.0 / 3.0);
    let p9 = lerp(&k.a, &k.c, 0.66);
    let p13 = lerp(&k.b, &k.d, 0.66);
    let lift = (p4 - p9) / 2.0;

    let v1 = editor.add_vertex(lerp(&k.a, &k.b, 0.25));
    let v2 = editor.add_vertex(lerp(&k.a, &k.b, 0.5));
    let v3 = editor.add_vertex(lerp(&k.a, &k.b, 0.75));
    let v4 = editor.add_vertex(p4);
    let v8 = editor.add_vertex(p8);
    let v5 = editor.add_vertex(lerp(&p4, &p8, 0.25));
    let v6 = editor.add_vertex(lerp(&p4, &p8, 0.5));
    let v7 = editor.add_vertex(lerp(&p4, &p8, 0.75));
    let v9 = editor.add_vertex(p9);
    let v13 = editor.add_vertex(p13);
    let v10 = editor.add_vertex(lerp(&p9, &p13, 0.35) + lift);
    let v12 = editor.add_vertex(lerp(&p9, &p13, 0.65) + lift);

    editor.stitch(&[
        &[a, v1, v5, v4],
        &[v1, v2, v6, v5],
        &[v2, v3, v7, v6],
        &[v3, b, v8, v7],
        &[v4, v5, v10, v9],
        &[v5, v6, v7, v12, v10],
        &[v7, v8, v13, v12],
        &[v9, v10, v12, v13],
        &[v9, v13, d, c],
    ])?;
    Ok(editor.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::retopo::grid::{harvest_from, GridShape};
    use crate::algo::retopo::Axis;
    use crate::mesh::{build_grid, FaceId};
    use nalgebra::Vector3;

    /// 3x3 grid with a 1x1 lattice on the centre quad.
    fn centre_patch() -> (PolyMesh<u32>, Lattice<u32>) {
        let mut mesh = build_grid::<u32>(3, 3, 1.0).unwrap();
        let seed = VertexId::new(4 + 1);
        let lattice =
            harvest_from(&mut mesh, seed, GridShape::new(1, 1), Axis::PosX, Axis::PosY).unwrap();
        (mesh, lattice)
    }

    fn assert_all_up(mesh: &PolyMesh<u32>, faces: &[FaceId]) {
        let up = Vector3::new(0.0, 0.0, 1.0);
        for &f in faces {
            let n = mesh.face_normal(f).unwrap();
            assert!((n - up).norm() < 1e-10, "face {:?} has normal {:?}", f, n);
        }
    }

    fn assert_inside_patch(mesh: &PolyMesh<u32>, edit: &PatchEdit<u32>) {
        for &v in &edit.created_vertices {
            let p = mesh.position(v).unwrap();
            assert!(p.x >= 1.0 - 1e-10 && p.x <= 2.0 + 1e-10);
            assert!(p.y >= 1.0 - 1e-10 && p.y <= 2.0 + 1e-10);
            assert!(p.z.abs() < 1e-10);
        }
    }

    #[test]
    fn test_one_to_two() {
        let (mut mesh, lattice) = centre_patch();
        let edit = one_to_two(&mut mesh, &lattice, false).unwrap();

        assert_eq!(edit.created_vertices.len(), 8);
        assert_eq!(edit.created_faces.len(), 7);
        assert_eq!(edit.removed_faces, 1);
        assert_eq!(mesh.num_faces(), 9 - 1 + 7);
        assert_all_up(&mesh, &edit.created_faces);
        assert_inside_patch(&mesh, &edit);
        assert!(mesh.is_valid());

        let triangles = edit
            .created_faces
            .iter()
            .filter(|&&f| mesh.face(f).unwrap().len() == 3)
            .count();
        assert_eq!(triangles, 1);
    }

    #[test]
    fn test_one_to_two_positions() {
        let (mut mesh, lattice) = centre_patch();
        let edit = one_to_two(&mut mesh, &lattice, false).unwrap();
        let p = |i: usize| mesh.position(edit.created_vertices[i]).unwrap();

        // v1 sits mid-way along the top side.
        assert!((p(0) - Point3::new(1.5, 1.0, 0.0)).norm() < 1e-10);
        // v3 is mid-way between v2 and v4.
        assert!((p(3) - Point3::new(1.5, 1.0 + 1.0 / 3.0, 0.0)).norm() < 1e-10);
        // v7 is lifted half-way from the 0.66 loop toward the 1/3 loop.
        let y = 1.66 + (1.0 / 3.0 - 0.66) / 2.0;
        assert!((p(6) - Point3::new(1.0 + 1.0 / 3.0, y, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_one_to_three() {
        let (mut mesh, lattice) = centre_patch();
        let edit = one_to_three(&mut mesh, &lattice, false).unwrap();

        assert_eq!(edit.created_vertices.len(), 10);
        assert_eq!(edit.created_faces.len(), 8);
        assert_eq!(edit.face_delta(), 7);
        assert!(mesh.is_quad_mesh());
        assert_all_up(&mesh, &edit.created_faces);
        assert_inside_patch(&mesh, &edit);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_one_to_four() {
        let (mut mesh, lattice) = centre_patch();
        let edit = one_to_four(&mut mesh, &lattice, false).unwrap();

        assert_eq!(edit.created_vertices.len(), 12);
        assert_eq!(edit.created_faces.len(), 9);
        let pentagons = edit
            .created_faces
            .iter()
            .filter(|&&f| mesh.face(f).unwrap().len() == 5)
            .count();
        assert_eq!(pentagons, 1);
        assert_all_up(&mesh, &edit.created_faces);
        assert_inside_patch(&mesh, &edit);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_expansion_keeps_outside_faces() {
        let (mut mesh, lattice) = centre_patch();
        let before: Vec<_> = mesh
            .faces()
            .map(|(f, face)| (f, face.vertices().to_vec()))
            .collect();
        let corners: Vec<_> = lattice
            .iter()
            .map(|v| (v, mesh.position(v).unwrap()))
            .collect();

        one_to_three(&mut mesh, &lattice, false).unwrap();

        let survivors = before
            .iter()
            .filter(|(f, loop_)| {
                mesh.face(*f)
                    .map(|face| face.vertices() == loop_.as_slice())
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(survivors, 8);
        for (v, p) in corners {
            assert!((mesh.position(v).unwrap() - p).norm() < 1e-10);
        }
    }

    #[test]
    fn test_dissolve_removes_neighbours_across_sides() {
        let (mut mesh, lattice) = centre_patch();
        let edit = one_to_two(&mut mesh, &lattice, true).unwrap();

        // The patch quad and its four edge-neighbours go; the corners stay.
        assert_eq!(edit.removed_faces, 5);
        assert_eq!(mesh.num_faces(), 9 - 5 + 7);
        for v in lattice.iter() {
            assert!(mesh.contains_vertex(v));
        }
        assert_all_up(&mesh, &edit.created_faces);
        assert!(mesh.is_valid());
    }
}
