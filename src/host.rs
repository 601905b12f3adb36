//! Collaborator interfaces to the application that owns the meshes.
//!
//! The engine never holds references into host-owned memory. Everything it knows about a mesh
//! comes through [`MeshReader`], and every change it makes goes through [`MeshWriter`] as an
//! explicit call with a return value. [`memory::MemoryHost`] is a self-contained implementation
//! backed by [`GroupedMesh`](crate::mesh::GroupedMesh).

use crate::error::{Error, HostWriteError};
use crate::mesh::topology::{GroupIndex, MeshIndex, ObjectIndex};
use crate::Real;

pub mod memory;

/// Handle to a mesh data block owned by the host.
pub type MeshHandle = MeshIndex;
/// Handle to a scene object owned by the host.
pub type ObjectHandle = ObjectIndex;

/// A vertex group as seen through [`MeshReader::groups`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupInfo {
    pub index: GroupIndex,
    pub name: String,
}

/// Read access to host meshes.
///
/// Queries on a handle the host does not know about return empty results.
pub trait MeshReader {
    type Scalar: Real;

    fn vertex_count(&self, mesh: MeshHandle) -> usize;

    /// Vertex groups of `mesh` in their native order.
    fn groups(&self, mesh: MeshHandle) -> Vec<GroupInfo>;

    /// Member `(vertex, weight)` pairs of a group in ascending vertex order.
    fn membership(&self, mesh: MeshHandle, group: GroupIndex) -> Vec<(usize, f32)>;

    /// Faces (and loose edges) as lists of vertex indices.
    fn faces(&self, mesh: MeshHandle) -> Vec<Vec<usize>>;

    fn vertex_positions(&self, mesh: MeshHandle) -> Vec<[Self::Scalar; 3]>;

    /// Per-vertex selection flags.
    fn vertex_selection(&self, mesh: MeshHandle) -> Vec<bool>;

    /// Look up a group by its exact name.
    fn group_by_name(&self, mesh: MeshHandle, name: &str) -> Option<GroupIndex> {
        self.groups(mesh)
            .into_iter()
            .find(|g| g.name == name)
            .map(|g| g.index)
    }
}

/// Write access to host meshes.
pub trait MeshWriter: MeshReader {
    /// Create a new mesh data block. `None` lets the host pick a default name; a requested name
    /// that is already in use is disambiguated by the host.
    fn create_mesh(
        &mut self,
        name: Option<&str>,
        positions: Vec<[Self::Scalar; 3]>,
        faces: Vec<Vec<usize>>,
    ) -> Result<MeshHandle, HostWriteError>;

    /// Replace the geometry of an existing mesh. The group table is kept but all memberships
    /// are cleared, since old vertex indices no longer apply.
    fn replace_geometry(
        &mut self,
        mesh: MeshHandle,
        positions: Vec<[Self::Scalar; 3]>,
        faces: Vec<Vec<usize>>,
    ) -> Result<(), HostWriteError>;

    /// Set the members of the group called `group_name`, creating the group if needed.
    fn set_group_membership(
        &mut self,
        mesh: MeshHandle,
        group_name: &str,
        entries: &[(usize, f32)],
    ) -> Result<GroupIndex, HostWriteError>;

    /// Remove a group. Groups after it move down by one.
    fn delete_group(&mut self, mesh: MeshHandle, group: GroupIndex) -> Result<(), HostWriteError>;

    /// Rename a group. Fails with [`Error::NameCollision`] if another group on the mesh already
    /// uses `new_name`.
    fn rename_group(
        &mut self,
        mesh: MeshHandle,
        group: GroupIndex,
        new_name: &str,
    ) -> Result<(), Error>;

    fn create_object_from_mesh(
        &mut self,
        mesh: MeshHandle,
        name: Option<&str>,
    ) -> Result<ObjectHandle, HostWriteError>;

    fn set_vertex_selection(
        &mut self,
        mesh: MeshHandle,
        selection: &[bool],
    ) -> Result<(), HostWriteError>;
}
