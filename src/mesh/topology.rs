use crate::index::Index;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vertex groups, meshes and objects are all identified by plain positions in the tables that
/// own them. The newtypes below keep those positions from being mixed up.
macro_rules! impl_index_type {
    ($index_type:ident) => {
        /// Define index type
        #[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $index_type(usize);

        impl $index_type {
            #[inline]
            pub fn into_inner(self) -> usize {
                self.0
            }
        }

        impl From<$index_type> for Index {
            #[inline]
            fn from(i: $index_type) -> Self {
                Index::new(i.0)
            }
        }

        impl From<$index_type> for usize {
            #[inline]
            fn from(i: $index_type) -> usize {
                i.0
            }
        }

        impl From<usize> for $index_type {
            #[inline]
            fn from(i: usize) -> Self {
                $index_type(i)
            }
        }

        impl std::fmt::Display for $index_type {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// Index within a collection of meshes or objects owned by a host.
impl_index_type!(MeshIndex);
impl_index_type!(ObjectIndex);

// Index of a vertex group within the group table of its mesh.
impl_index_type!(GroupIndex);

pub trait NumVertices {
    fn num_vertices(&self) -> usize;
}

pub trait NumFaces {
    fn num_faces(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_index_conversions() {
        let g = GroupIndex::from(3);
        assert_eq!(usize::from(g), 3);
        assert_eq!(Index::from(g), Index::new(3));
        assert_eq!(g.to_string(), "3");
    }
}
