//!
//! An in-memory host that owns meshes and objects directly.
//!
//! Names of new meshes and objects are disambiguated the way most DCC applications do it:
//! a taken name `Head` becomes `Head.001`, then `Head.002` and so on.
//!

use ahash::AHashSet as HashSet;
use log::{debug, trace};

use super::{GroupInfo, MeshHandle, MeshReader, MeshWriter, ObjectHandle};
use crate::error::{Error, HostWriteError, NameCollisionError};
use crate::mesh::topology::*;
use crate::mesh::GroupedMesh;
use crate::Real;

const DEFAULT_MESH_NAME: &str = "Mesh";

/// A scene object referencing one mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub name: String,
    pub mesh: MeshHandle,
}

/// Host backed by plain vectors of meshes and objects.
#[derive(Clone, Debug)]
pub struct MemoryHost<T: Real> {
    meshes: Vec<GroupedMesh<T>>,
    objects: Vec<Object>,
    /// Mesh names for which `create_mesh` fails.
    rejected_mesh_names: HashSet<String>,
    /// Meshes that refuse every write.
    locked_meshes: HashSet<MeshHandle>,
}

impl<T: Real> Default for MemoryHost<T> {
    fn default() -> Self {
        MemoryHost {
            meshes: Vec::new(),
            objects: Vec::new(),
            rejected_mesh_names: HashSet::default(),
            locked_meshes: HashSet::default(),
        }
    }
}

impl<T: Real> MemoryHost<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a mesh and wrap it in an object of the same name.
    pub fn add_object(&mut self, mesh: GroupedMesh<T>) -> (ObjectHandle, MeshHandle) {
        let name = mesh.name.clone();
        let handle = MeshHandle::from(self.meshes.len());
        self.meshes.push(mesh);
        let object = ObjectHandle::from(self.objects.len());
        self.objects.push(Object { name, mesh: handle });
        (object, handle)
    }

    pub fn mesh(&self, mesh: MeshHandle) -> Option<&GroupedMesh<T>> {
        self.meshes.get(usize::from(mesh))
    }

    pub fn object(&self, object: ObjectHandle) -> Option<&Object> {
        self.objects.get(usize::from(object))
    }

    pub fn num_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Make `create_mesh` fail whenever the final mesh name equals `name`.
    pub fn reject_mesh_name(&mut self, name: impl Into<String>) {
        self.rejected_mesh_names.insert(name.into());
    }

    /// Make every write to `mesh` fail.
    pub fn lock_mesh(&mut self, mesh: MeshHandle) {
        self.locked_meshes.insert(mesh);
    }

    pub fn unlock_mesh(&mut self, mesh: MeshHandle) {
        self.locked_meshes.remove(&mesh);
    }

    fn mesh_mut(&mut self, mesh: MeshHandle) -> Result<&mut GroupedMesh<T>, HostWriteError> {
        if self.locked_meshes.contains(&mesh) {
            return Err(HostWriteError::new(format!("mesh {} is locked", mesh)));
        }
        self.meshes
            .get_mut(usize::from(mesh))
            .ok_or_else(|| HostWriteError::new(format!("no mesh with handle {}", mesh)))
    }
}

/// Return `base` if it is free, otherwise the first free `base.NNN`.
pub fn unique_name(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{}.{:03}", base, suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

fn validate_faces(num_vertices: usize, faces: &[Vec<usize>]) -> Result<(), HostWriteError> {
    match faces.iter().flatten().find(|&&v| v >= num_vertices) {
        Some(&v) => Err(HostWriteError::new(format!(
            "face references vertex {} but the mesh has {} vertices",
            v, num_vertices
        ))),
        None => Ok(()),
    }
}

impl<T: Real> MeshReader for MemoryHost<T> {
    type Scalar = T;

    fn vertex_count(&self, mesh: MeshHandle) -> usize {
        self.mesh(mesh).map_or(0, |m| m.num_vertices())
    }

    fn groups(&self, mesh: MeshHandle) -> Vec<GroupInfo> {
        self.mesh(mesh).map_or_else(Vec::new, |m| {
            m.groups
                .iter()
                .enumerate()
                .map(|(i, g)| GroupInfo {
                    index: GroupIndex::from(i),
                    name: g.name.clone(),
                })
                .collect()
        })
    }

    fn membership(&self, mesh: MeshHandle, group: GroupIndex) -> Vec<(usize, f32)> {
        self.mesh(mesh)
            .and_then(|m| m.groups.get(usize::from(group)))
            .map_or_else(Vec::new, |g| g.entries().collect())
    }

    fn faces(&self, mesh: MeshHandle) -> Vec<Vec<usize>> {
        self.mesh(mesh).map_or_else(Vec::new, GroupedMesh::faces)
    }

    fn vertex_positions(&self, mesh: MeshHandle) -> Vec<[T; 3]> {
        self.mesh(mesh)
            .map_or_else(Vec::new, |m| m.vertex_positions.clone())
    }

    fn vertex_selection(&self, mesh: MeshHandle) -> Vec<bool> {
        self.mesh(mesh).map_or_else(Vec::new, |m| m.selection.clone())
    }
}

impl<T: Real> MeshWriter for MemoryHost<T> {
    fn create_mesh(
        &mut self,
        name: Option<&str>,
        positions: Vec<[T; 3]>,
        faces: Vec<Vec<usize>>,
    ) -> Result<MeshHandle, HostWriteError> {
        validate_faces(positions.len(), &faces)?;
        let base = name.unwrap_or(DEFAULT_MESH_NAME);
        let name = unique_name(base, |n| self.meshes.iter().any(|m| m.name == n));
        if self.rejected_mesh_names.contains(&name) {
            return Err(HostWriteError::new(format!(
                "mesh name '{}' is not allowed",
                name
            )));
        }
        let handle = MeshHandle::from(self.meshes.len());
        debug!(
            "creating mesh {} '{}' with {} vertices",
            handle,
            name,
            positions.len()
        );
        self.meshes
            .push(GroupedMesh::from_faces(name, positions, &faces));
        Ok(handle)
    }

    fn replace_geometry(
        &mut self,
        mesh: MeshHandle,
        positions: Vec<[T; 3]>,
        faces: Vec<Vec<usize>>,
    ) -> Result<(), HostWriteError> {
        validate_faces(positions.len(), &faces)?;
        let target = self.mesh_mut(mesh)?;
        let mut replacement = GroupedMesh::from_faces(target.name.clone(), positions, &faces);
        replacement.groups = std::mem::take(&mut target.groups);
        for group in replacement.groups.iter_mut() {
            group.weights.clear();
        }
        *target = replacement;
        Ok(())
    }

    fn set_group_membership(
        &mut self,
        mesh: MeshHandle,
        group_name: &str,
        entries: &[(usize, f32)],
    ) -> Result<GroupIndex, HostWriteError> {
        let target = self.mesh_mut(mesh)?;
        let num_vertices = target.num_vertices();
        if let Some(&(v, _)) = entries.iter().find(|&&(v, _)| v >= num_vertices) {
            return Err(HostWriteError::new(format!(
                "group '{}' references vertex {} but the mesh has {} vertices",
                group_name, v, num_vertices
            )));
        }
        let idx = match target.group_index(group_name) {
            Some(idx) => idx,
            None => {
                target
                    .groups
                    .push(crate::mesh::VertexGroup::new(group_name));
                GroupIndex::from(target.groups.len() - 1)
            }
        };
        target.groups[usize::from(idx)].set_entries(entries.iter().copied());
        trace!("set {} members on group '{}'", entries.len(), group_name);
        Ok(idx)
    }

    fn delete_group(&mut self, mesh: MeshHandle, group: GroupIndex) -> Result<(), HostWriteError> {
        let target = self.mesh_mut(mesh)?;
        let idx = usize::from(group);
        if idx >= target.groups.len() {
            return Err(HostWriteError::new(format!(
                "mesh {} has no vertex group {}",
                mesh, group
            )));
        }
        let removed = target.groups.remove(idx);
        debug!("deleted vertex group '{}' from mesh {}", removed.name, mesh);
        Ok(())
    }

    fn rename_group(
        &mut self,
        mesh: MeshHandle,
        group: GroupIndex,
        new_name: &str,
    ) -> Result<(), Error> {
        let target = self.mesh_mut(mesh)?;
        let idx = usize::from(group);
        let current = target
            .groups
            .get(idx)
            .map(|g| g.name.clone())
            .ok_or_else(|| Error::MissingGroup(group.to_string()))?;
        let collides = target
            .groups
            .iter()
            .enumerate()
            .any(|(i, g)| i != idx && g.name == new_name);
        if collides {
            return Err(NameCollisionError {
                from: current,
                to: new_name.to_string(),
            }
            .into());
        }
        target.groups[idx].name = new_name.to_string();
        Ok(())
    }

    fn create_object_from_mesh(
        &mut self,
        mesh: MeshHandle,
        name: Option<&str>,
    ) -> Result<ObjectHandle, HostWriteError> {
        let mesh_name = self
            .mesh(mesh)
            .map(|m| m.name.clone())
            .ok_or_else(|| HostWriteError::new(format!("no mesh with handle {}", mesh)))?;
        let base = name.unwrap_or(mesh_name.as_str());
        let name = unique_name(base, |n| self.objects.iter().any(|o| o.name == n));
        let handle = ObjectHandle::from(self.objects.len());
        self.objects.push(Object { name, mesh });
        Ok(handle)
    }

    fn set_vertex_selection(
        &mut self,
        mesh: MeshHandle,
        selection: &[bool],
    ) -> Result<(), HostWriteError> {
        let target = self.mesh_mut(mesh)?;
        if selection.len() != target.num_vertices() {
            return Err(HostWriteError::new(format!(
                "selection has {} entries but the mesh has {} vertices",
                selection.len(),
                target.num_vertices()
            )));
        }
        target.selection.copy_from_slice(selection);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with_quad() -> (MemoryHost<f64>, MeshHandle) {
        let mesh = GroupedMesh::new(
            "Body",
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            &[4, 0, 1, 2, 3],
        )
        .with_group("Head", [(0, 1.0), (1, 0.5)])
        .with_group("Torso", [(2, 1.0)]);
        let mut host = MemoryHost::new();
        let (_, handle) = host.add_object(mesh);
        (host, handle)
    }

    #[test]
    fn unique_names_get_numeric_suffixes() {
        let taken = ["Head", "Head.001"];
        assert_eq!(unique_name("Torso", |n| taken.contains(&n)), "Torso");
        assert_eq!(unique_name("Head", |n| taken.contains(&n)), "Head.002");
    }

    #[test]
    fn reader_reports_groups_in_native_order() {
        let (host, mesh) = host_with_quad();
        let names: Vec<_> = host.groups(mesh).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["Head", "Torso"]);
        assert_eq!(host.membership(mesh, GroupIndex::from(0)), vec![(0, 1.0), (1, 0.5)]);
        assert_eq!(host.group_by_name(mesh, "Torso"), Some(GroupIndex::from(1)));
        assert_eq!(host.vertex_count(mesh), 4);
        assert_eq!(host.faces(mesh), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn unknown_handles_read_as_empty() {
        let (host, _) = host_with_quad();
        let missing = MeshHandle::from(7);
        assert_eq!(host.vertex_count(missing), 0);
        assert!(host.groups(missing).is_empty());
        assert!(host.membership(missing, GroupIndex::from(0)).is_empty());
    }

    #[test]
    fn rename_rejects_collisions() {
        let (mut host, mesh) = host_with_quad();
        let err = host.rename_group(mesh, GroupIndex::from(0), "Torso").unwrap_err();
        assert!(matches!(err, Error::NameCollision(_)));
        host.rename_group(mesh, GroupIndex::from(0), "Skull").unwrap();
        assert_eq!(host.mesh(mesh).unwrap().group_names(), vec!["Skull", "Torso"]);
        // Renaming a group to its own name is not a collision.
        host.rename_group(mesh, GroupIndex::from(1), "Torso").unwrap();
    }

    #[test]
    fn delete_group_shifts_later_groups() {
        let (mut host, mesh) = host_with_quad();
        host.delete_group(mesh, GroupIndex::from(0)).unwrap();
        assert_eq!(host.group_by_name(mesh, "Torso"), Some(GroupIndex::from(0)));
        assert!(host.delete_group(mesh, GroupIndex::from(5)).is_err());
    }

    #[test]
    fn created_meshes_and_objects_are_disambiguated() {
        let (mut host, _) = host_with_quad();
        let a = host
            .create_mesh(Some("Body"), vec![[0.0; 3]], vec![])
            .unwrap();
        assert_eq!(host.mesh(a).unwrap().name, "Body.001");
        let obj = host.create_object_from_mesh(a, None).unwrap();
        assert_eq!(host.object(obj).unwrap().name, "Body.001");
        let obj = host.create_object_from_mesh(a, Some("Body")).unwrap();
        assert_eq!(host.object(obj).unwrap().name, "Body.002");
        let b = host.create_mesh(None, vec![], vec![]).unwrap();
        assert_eq!(host.mesh(b).unwrap().name, "Mesh");
    }

    #[test]
    fn write_faults_are_reported() {
        let (mut host, mesh) = host_with_quad();
        host.reject_mesh_name("Bad");
        assert!(host.create_mesh(Some("Bad"), vec![], vec![]).is_err());
        assert!(host
            .create_mesh(None, vec![[0.0; 3]], vec![vec![0, 1]])
            .is_err());

        host.lock_mesh(mesh);
        assert_eq!(
            host.delete_group(mesh, GroupIndex::from(0)),
            Err(HostWriteError::new("mesh 0 is locked"))
        );
        host.unlock_mesh(mesh);
        assert!(host.delete_group(mesh, GroupIndex::from(0)).is_ok());
    }

    #[test]
    fn replace_geometry_keeps_group_table_but_clears_members() {
        let (mut host, mesh) = host_with_quad();
        host.replace_geometry(mesh, vec![[0.0; 3]; 2], vec![vec![0, 1]])
            .unwrap();
        let m = host.mesh(mesh).unwrap();
        assert_eq!(m.group_names(), vec!["Head", "Torso"]);
        assert!(m.groups.iter().all(|g| g.is_empty()));
        assert_eq!(m.selection, vec![false, false]);
        assert_eq!(m.name, "Body");
    }

    #[test]
    fn set_group_membership_creates_missing_groups() {
        let (mut host, mesh) = host_with_quad();
        let idx = host
            .set_group_membership(mesh, "Arm", &[(3, 1.0)])
            .unwrap();
        assert_eq!(idx, GroupIndex::from(2));
        assert_eq!(host.membership(mesh, idx), vec![(3, 1.0)]);
        assert!(host.set_group_membership(mesh, "Arm", &[(4, 1.0)]).is_err());
    }
}
