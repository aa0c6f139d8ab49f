//! Stable handles for mesh elements.
//!
//! Vertices, edges and faces of a [`PolyMesh`](super::PolyMesh) are addressed by
//! type-safe handles. A handle stays valid for as long as its element lives;
//! slots of deleted elements are never recycled, so a stale handle can be
//! detected instead of silently aliasing a newer element.
//!
//! Handles are generic over the underlying integer width ([`MeshIndex`]) so
//! that small editing sessions can use `u16` storage and huge scans `u64`.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Integer types usable as the storage of element handles.
pub trait MeshIndex:
    Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static
{
    /// Largest slot number this width can address.
    const MAX_SLOT: usize;

    /// Convert a slot number into the index type.
    ///
    /// # Panics
    /// Panics in debug builds if the slot does not fit.
    fn from_usize(v: usize) -> Self;

    /// Convert back into a slot number.
    fn to_usize(self) -> usize;
}

macro_rules! impl_mesh_index {
    ($($ty:ty),*) => {
        $(
            impl MeshIndex for $ty {
                const MAX_SLOT: usize = <$ty>::MAX as usize;

                #[inline]
                fn from_usize(v: usize) -> Self {
                    debug_assert!(
                        v <= Self::MAX_SLOT,
                        "slot {} does not fit in {}",
                        v,
                        stringify!($ty)
                    );
                    v as $ty
                }

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_mesh_index!(u16, u32, u64);

/// Handle of a vertex.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// Handle of an (undirected) edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct EdgeId<I: MeshIndex = u32>(I);

/// Handle of a face.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_handle {
    ($name:ident, $tag:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a handle for the given slot.
            #[inline]
            pub fn new(slot: usize) -> Self {
                Self(I::from_usize(slot))
            }

            /// Slot number of this handle.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Raw integer value.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $tag, self.index())
            }
        }

        impl<I: MeshIndex> fmt::Display for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.index())
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(slot: usize) -> Self {
                Self::new(slot)
            }
        }
    };
}

impl_handle!(VertexId, "V");
impl_handle!(EdgeId, "E");
impl_handle!(FaceId, "F");
