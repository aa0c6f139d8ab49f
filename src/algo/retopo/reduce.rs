//! Reduction operators: several face strips merge into fewer.
//!
//! All reductions work on a lattice of four rows. Row 1 stays where it is,
//! row 2 is pulled half-way up toward it and the rails between rows 2 and 3
//! are dissolved, so the strips that ran across rows 2-3 collapse into a
//! smaller number of wider faces. Some operators then split or replace
//! those faces with a fixed topology.
//!
//! With `dissolve`, the vertices left at the foot of the rails (row 3) are
//! dissolved as well. `4to2` is the exception: its rail feet are corners of
//! the two new pentagons and always stay.

use super::grid::Lattice;
use super::patch::{lerp, PatchEdit, PatchEditor};
use super::region::{FIVE_TO_THREE, FOUR_TO_ONE, FOUR_TO_TWO, THREE_TO_ONE, TWO_TO_ONE};
use crate::error::Result;
use crate::mesh::{MeshIndex, PolyMesh};

/// `2to1`: two strips become one, with a triangle absorbing the difference.
pub fn two_to_one<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    dissolve: bool,
) -> Result<PatchEdit<I>> {
    let region = &TWO_TO_ONE;
    let mut editor = PatchEditor::new(mesh, lattice, "2to1");
    editor.dissolve_rails(region.rails)?;

    let shift = (editor.position((1, 0))? - editor.position((1, 1))?) / 3.0;
    editor.lift((2, 1))?;
    editor.translate((2, 1), shift)?;
    editor.connect((2, 0), (2, 2))?;
    editor.excise(region, false)?;

    let p = editor.position((2, 1))? - shift * 2.0;
    let n = editor.add_vertex(p);
    let l11 = editor.vertex((1, 1))?;
    let l12 = editor.vertex((1, 2))?;
    let l20 = editor.vertex((2, 0))?;
    let l21 = editor.vertex((2, 1))?;
    let l22 = editor.vertex((2, 2))?;
    editor.stitch(&[&[l20, l21, n, l22], &[l11, l21, n], &[l11, l12, l22, n]])?;

    if dissolve {
        editor.cleanup(region)?;
    }
    Ok(editor.finish())
}

/// `3to1`: three strips become one.
pub fn three_to_one<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    dissolve: bool,
) -> Result<PatchEdit<I>> {
    let region = &THREE_TO_ONE;
    let mut editor = PatchEditor::new(mesh, lattice, "3to1");
    editor.dissolve_rails(region.rails)?;
    editor.lift((2, 1))?;
    editor.lift((2, 2))?;
    editor.connect((2, 0), (2, 3))?;

    if dissolve {
        editor.cleanup(region)?;
    }
    Ok(editor.finish())
}

/// `4to1`: four strips become one.
///
/// The middle vertex of row 2 is dissolved, and its two neighbours are
/// drawn toward each other and joined by a new edge.
pub fn four_to_one<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    dissolve: bool,
) -> Result<PatchEdit<I>> {
    let region = &FOUR_TO_ONE;
    let mut editor = PatchEditor::new(mesh, lattice, "4to1");
    editor.dissolve_rails(region.rails)?;
    editor.dissolve_vertex((2, 2))?;

    editor.lift((2, 1))?;
    editor.lift((2, 3))?;
    let left = editor.position((2, 1))?;
    let right = editor.position((2, 3))?;
    editor.set_position((2, 1), lerp(&left, &right, 0.25))?;
    editor.set_position((2, 3), lerp(&right, &left, 0.25))?;

    editor.connect((2, 0), (2, 4))?;
    editor.connect((2, 1), (2, 3))?;

    if dissolve {
        editor.cleanup(region)?;
    }
    Ok(editor.finish())
}

/// `4to2`: four strips become two, meeting at a vertex in the middle of
/// row 2.
///
/// `dissolve` has no effect here.
pub fn four_to_two<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    _dissolve: bool,
) -> Result<PatchEdit<I>> {
    let region = &FOUR_TO_TWO;
    let mut editor = PatchEditor::new(mesh, lattice, "4to2");
    editor.dissolve_rails(region.rails)?;
    for c in 1..=3 {
        editor.lift((2, c))?;
    }
    editor.excise(region, false)?;

    let mid = lerp(&editor.position((2, 0))?, &editor.position((2, 4))?, 0.5);
    let n = editor.add_vertex(mid);
    let l2 = editor.lattice_row(2, 5)?;
    let l3 = editor.lattice_row(3, 5)?;
    editor.stitch(&[
        &[l3[0], l2[0], n, l3[2], l3[1]],
        &[l3[2], n, l2[4], l3[4], l3[3]],
        &[l2[0], l2[1], l2[2], n],
        &[l2[2], l2[3], l2[4], n],
    ])?;
    Ok(editor.finish())
}

/// `5to3`: five strips become three.
///
/// Row 3 is redistributed so that its two inner vertices split the row in
/// thirds, matching two new vertices on row 2.
pub fn five_to_three<I: MeshIndex>(
    mesh: &mut PolyMesh<I>,
    lattice: &Lattice<I>,
    dissolve: bool,
) -> Result<PatchEdit<I>> {
    let region = &FIVE_TO_THREE;
    let mut editor = PatchEditor::new(mesh, lattice, "5to3");
    editor.dissolve_rails(region.rails)?;
    for c in 1..=4 {
        editor.lift((2, c))?;
    }
    editor.excise(region, false)?;

    let (start, end) = (editor.position((3, 0))?, editor.position((3, 5))?);
    editor.set_position((3, 2), lerp(&start, &end, 0.33))?;
    editor.set_position((3, 3), lerp(&start, &end, 0.66))?;

    let (start, end) = (editor.position((2, 0))?, editor.position((2, 5))?);
    let n1 = editor.add_vertex(lerp(&start, &end, 0.33));
    let n2 = editor.add_vertex(lerp(&start, &end, 0.66));

    let l2 = editor.lattice_row(2, 6)?;
    let l3 = editor.lattice_row(3, 6)?;
    editor.stitch(&[
        &[l2[0], l2[1], l2[2], n1],
        &[l2[2], l2[3], n2, n1],
        &[l2[3], l2[4], l2[5], n2],
        &[n2, l2[5], l3[5], l3[3]],
        &[n1, n2, l3[3], l3[2]],
        &[l2[0], n1, l3[2], l3[0]],
    ])?;

    if dissolve {
        editor.cleanup(region)?;
    }
    Ok(editor.finish())
}
