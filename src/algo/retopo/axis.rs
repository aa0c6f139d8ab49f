//! Signed coordinate axes and the directional neighbour probe.

use std::fmt;
use std::str::FromStr;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, PolyMesh, VertexId};

/// One of the six signed coordinate directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// +X
    PosX,
    /// -X
    NegX,
    /// +Y
    PosY,
    /// -Y
    NegY,
    /// +Z
    PosZ,
    /// -Z
    NegZ,
}

impl Axis {
    /// All axes, positive before negative.
    pub const ALL: [Axis; 6] = [
        Axis::PosX,
        Axis::NegX,
        Axis::PosY,
        Axis::NegY,
        Axis::PosZ,
        Axis::NegZ,
    ];

    /// Decode an integer axis code: magnitude 1..=3 selects x/y/z, the sign
    /// selects the direction.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(Axis::PosX),
            -1 => Ok(Axis::NegX),
            2 => Ok(Axis::PosY),
            -2 => Ok(Axis::NegY),
            3 => Ok(Axis::PosZ),
            -3 => Ok(Axis::NegZ),
            _ => Err(MeshError::InvalidAxis(code.to_string())),
        }
    }

    /// The integer code of this axis.
    pub fn code(self) -> i32 {
        let magnitude = self.component() as i32 + 1;
        magnitude * self.sign() as i32
    }

    /// Coordinate component (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn component(self) -> usize {
        match self {
            Axis::PosX | Axis::NegX => 0,
            Axis::PosY | Axis::NegY => 1,
            Axis::PosZ | Axis::NegZ => 2,
        }
    }

    /// Direction along the component, `1.0` or `-1.0`.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Axis::PosX | Axis::PosY | Axis::PosZ => 1.0,
            Axis::NegX | Axis::NegY | Axis::NegZ => -1.0,
        }
    }

    /// The axis pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Axis::PosX => Axis::NegX,
            Axis::NegX => Axis::PosX,
            Axis::PosY => Axis::NegY,
            Axis::NegY => Axis::PosY,
            Axis::PosZ => Axis::NegZ,
            Axis::NegZ => Axis::PosZ,
        }
    }

    /// Signed displacement of `to` relative to `from` along this axis.
    #[inline]
    pub fn displacement(self, from: &nalgebra::Point3<f64>, to: &nalgebra::Point3<f64>) -> f64 {
        let c = self.component();
        self.sign() * (to[c] - from[c])
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::PosX => "+x",
            Axis::NegX => "-x",
            Axis::PosY => "+y",
            Axis::NegY => "-y",
            Axis::PosZ => "+z",
            Axis::NegZ => "-z",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = MeshError;

    /// Accepts `+x`, `-y`, `z` (case-insensitive) or integer codes like `2`, `-3`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i32>() {
            return Axis::from_code(code);
        }
        let lower = trimmed.to_ascii_lowercase();
        let (negative, letter) = match lower.as_bytes() {
            [b'+', rest @ ..] => (false, rest),
            [b'-', rest @ ..] => (true, rest),
            rest => (false, rest),
        };
        let axis = match letter {
            b"x" => Axis::PosX,
            b"y" => Axis::PosY,
            b"z" => Axis::PosZ,
            _ => return Err(MeshError::InvalidAxis(s.to_string())),
        };
        Ok(if negative { axis.opposite() } else { axis })
    }
}

/// Pick the candidate furthest from `origin` along `axis`.
///
/// Only candidates strictly ahead of the origin (positive signed
/// displacement) qualify. On ties the earliest candidate wins.
pub fn furthest<I, C>(
    mesh: &PolyMesh<I>,
    origin: VertexId<I>,
    axis: Axis,
    candidates: C,
) -> Result<Option<VertexId<I>>>
where
    I: MeshIndex,
    C: IntoIterator<Item = VertexId<I>>,
{
    let from = mesh.position(origin)?;
    let mut best = None;
    let mut best_distance = 0.0;
    for v in candidates {
        let distance = axis.displacement(&from, &mesh.position(v)?);
        if distance > best_distance {
            best_distance = distance;
            best = Some(v);
        }
    }
    Ok(best)
}

/// [`furthest`] over the edge neighbours of `origin`, in incident-edge order.
pub fn furthest_neighbor<I: MeshIndex>(
    mesh: &PolyMesh<I>,
    origin: VertexId<I>,
    axis: Axis,
) -> Result<Option<VertexId<I>>> {
    let neighbors = mesh.vertex_neighbors(origin)?;
    furthest(mesh, origin, axis, neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn star() -> (PolyMesh<u32>, VertexId, [VertexId; 4]) {
        let mut mesh = PolyMesh::new();
        let o = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let right = mesh.add_vertex(Point3::new(1.0, 0.1, 0.0));
        let left = mesh.add_vertex(Point3::new(-1.0, 0.0, 0.0));
        let up = mesh.add_vertex(Point3::new(0.2, 1.0, 0.0));
        let far_right = mesh.add_vertex(Point3::new(2.0, -0.5, 0.0));
        for v in [right, left, up, far_right] {
            mesh.add_edge(o, v).unwrap();
        }
        (mesh, o, [right, left, up, far_right])
    }

    #[test]
    fn test_axis_codes() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_code(axis.code()).unwrap(), axis);
        }
        assert_eq!(Axis::NegY.code(), -2);
        assert!(matches!(Axis::from_code(0), Err(MeshError::InvalidAxis(_))));
        assert!(Axis::from_code(4).is_err());
    }

    #[test]
    fn test_axis_parsing() {
        assert_eq!("+x".parse::<Axis>().unwrap(), Axis::PosX);
        assert_eq!("-Y".parse::<Axis>().unwrap(), Axis::NegY);
        assert_eq!("z".parse::<Axis>().unwrap(), Axis::PosZ);
        assert_eq!("-3".parse::<Axis>().unwrap(), Axis::NegZ);
        assert_eq!("1".parse::<Axis>().unwrap(), Axis::PosX);
        assert!("w".parse::<Axis>().is_err());
        assert!("+".parse::<Axis>().is_err());
        assert_eq!(Axis::NegZ.to_string(), "-z");
    }

    #[test]
    fn test_furthest_ahead() {
        let (mesh, o, [_, left, up, far_right]) = star();
        assert_eq!(furthest_neighbor(&mesh, o, Axis::PosX).unwrap(), Some(far_right));
        assert_eq!(furthest_neighbor(&mesh, o, Axis::NegX).unwrap(), Some(left));
        assert_eq!(furthest_neighbor(&mesh, o, Axis::PosY).unwrap(), Some(up));
        assert_eq!(furthest_neighbor(&mesh, o, Axis::NegY).unwrap(), Some(far_right));
    }

    #[test]
    fn test_furthest_none_when_all_behind() {
        let (mesh, o, _) = star();
        // Everything lies in the z = 0 plane.
        assert_eq!(furthest_neighbor(&mesh, o, Axis::PosZ).unwrap(), None);

        let (mesh, o, [right, _, _, far_right]) = star();
        let behind = [right, far_right];
        assert_eq!(furthest(&mesh, o, Axis::NegX, behind).unwrap(), None);
    }

    #[test]
    fn test_furthest_tie_keeps_first() {
        let mut mesh = PolyMesh::<u32>::new();
        let o = mesh.add_vertex(Point3::origin());
        let a = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        let b = mesh.add_vertex(Point3::new(1.0, -1.0, 0.0));
        assert_eq!(furthest(&mesh, o, Axis::PosX, [a, b]).unwrap(), Some(a));
        assert_eq!(furthest(&mesh, o, Axis::PosX, [b, a]).unwrap(), Some(b));
    }
}
