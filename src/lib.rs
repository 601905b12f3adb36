//! Vertex group filtering, batch renaming and separation for polygon meshes.
//!
//! # Overview
//!
//! Vertex groups are named, weighted subsets of a mesh's vertices. This library finds groups by a
//! case-insensitive name query, renames the matches by substring substitution, and separates
//! selected groups into new mesh objects, rebuilding the group tables of every resulting mesh and
//! pruning groups left empty on the source.
//!
//! The meshes themselves belong to a host application. All access goes through the
//! [`host::MeshReader`] and [`host::MeshWriter`] traits; [`host::memory::MemoryHost`] implements
//! both on top of [`mesh::GroupedMesh`].
//!
//! ```
//! use vgroupx::algo::{separate, GroupFilterIndex, SeparateOptions};
//! use vgroupx::host::memory::MemoryHost;
//! use vgroupx::mesh::GroupedMesh;
//!
//! let mesh = GroupedMesh::new(
//!     "Body",
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
//!     &[3, 0, 1, 2, 3, 1, 2, 3],
//! )
//! .with_group("Head", [(0, 1.0), (1, 1.0), (2, 1.0)])
//! .with_group("Torso", [(3, 1.0)]);
//!
//! let mut host = MemoryHost::new();
//! let (_, body) = host.add_object(mesh);
//!
//! let mut index = GroupFilterIndex::new();
//! index.filter(&host, body, "head").unwrap();
//! index.select_all();
//!
//! let report = separate(&mut host, body, &index.selected(), SeparateOptions::default());
//! assert!(report.is_success());
//! assert_eq!(host.mesh(body).unwrap().group_names(), vec!["Torso"]);
//! ```

pub mod index;

pub mod algo;
pub mod error;
pub mod host;
pub mod mesh;

// public re-exports
pub use self::error::{Error, Result};
pub use self::index::Index;

/// Plain old data trait. Types that implement this trait contain no references and can be copied
/// with `memcpy`. The additional `Any` trait lets us inspect the type more easily.
pub trait Pod: 'static + Copy + Sized + Send + Sync + std::any::Any {}
impl<T> Pod for T where T: 'static + Copy + Sized + Send + Sync + std::any::Any {}

/// Scalar type of vertex positions.
pub trait Real:
    math::ComplexField + num_traits::Float + ::std::fmt::Debug + std::iter::Sum + Pod
{
}
impl<T> Real for T where
    T: math::ComplexField + num_traits::Float + ::std::fmt::Debug + std::iter::Sum + Pod
{
}
