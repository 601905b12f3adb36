//!
//! Grouped mesh module. This module defines a polygon mesh that carries a table of named vertex
//! groups and a per-vertex selection flag, the data a vertex group editor works on.
//!

use crate::mesh::topology::*;
use crate::mesh::vertex_group::VertexGroup;
use crate::Real;

/// Mesh with arbitrarily shaped faces and a table of vertex groups.
///
/// Faces are stored as in a flat `indices` array with `offsets` delimiting individual faces.
/// Faces with two vertices are loose edges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupedMesh<T: Real> {
    /// Name of the mesh data block.
    pub name: String,
    /// Vertex positions.
    pub vertex_positions: Vec<[T; 3]>,
    /// Indices into `vertex_positions` representing face vertices.
    pub indices: Vec<usize>,
    /// Offsets into `indices` representing individual faces. The last element in this `Vec` is
    /// always the length of `indices` for convenience.
    pub offsets: Vec<usize>,
    /// Vertex groups in their native order.
    pub groups: Vec<VertexGroup>,
    /// Per-vertex selection state.
    pub selection: Vec<bool>,
}

impl<T: Real> GroupedMesh<T> {
    /// Construct a `GroupedMesh` from an array of vertices and an array of sizes and indices.
    ///
    /// The `faces` array contains the indices into the vertex array for each face preceeded by the
    /// number of vertices in the corresponding face:
    /// ```verbatim
    ///     n i_1 i_2 ... i_n m j_1 j_2 ... j_m ...
    /// ```
    ///
    /// # Examples
    /// ```
    /// use vgroupx::mesh::GroupedMesh;
    /// let points = vec![
    ///     [0.0, 0.0, 0.0],
    ///     [1.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0],
    ///     [1.0, 1.0, 0.0]];
    /// let faces = vec![3, 0, 1, 2, // first triangle
    ///                  2, 1, 3];   // loose edge
    ///
    /// let mesh = GroupedMesh::new("Body", points, &faces);
    ///
    /// assert_eq!(mesh.indices, [0, 1, 2, 1, 3]);
    /// assert_eq!(mesh.offsets, [0, 3, 5]);
    /// ```
    pub fn new(name: impl Into<String>, verts: Vec<[T; 3]>, faces: &[usize]) -> GroupedMesh<T> {
        let mut indices = Vec::new();
        let mut offsets = Vec::new();
        let mut i = 0;
        while i < faces.len() {
            let n = faces[i];
            offsets.push(indices.len());
            i += 1;
            indices.extend_from_slice(&faces[i..(i + n).min(faces.len())]);
            i += n;
        }
        offsets.push(indices.len());

        let selection = vec![false; verts.len()];
        GroupedMesh {
            name: name.into(),
            vertex_positions: verts,
            indices,
            offsets,
            groups: Vec::new(),
            selection,
        }
    }

    /// Construct a mesh from a list of faces, each given as a list of vertex indices.
    pub fn from_faces(name: impl Into<String>, verts: Vec<[T; 3]>, faces: &[Vec<usize>]) -> Self {
        let mut indices = Vec::new();
        let mut offsets = vec![0];
        for face in faces {
            indices.extend_from_slice(face);
            offsets.push(indices.len());
        }
        let selection = vec![false; verts.len()];
        GroupedMesh {
            name: name.into(),
            vertex_positions: verts,
            indices,
            offsets,
            groups: Vec::new(),
            selection,
        }
    }

    /// Append a vertex group with the given `(vertex, weight)` entries.
    pub fn with_group(
        mut self,
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (usize, f32)>,
    ) -> Self {
        self.groups.push(VertexGroup::with_entries(name, entries));
        self
    }

    pub fn face_iter(&self) -> DynamicIndexSliceIter {
        DynamicIndexSliceIter {
            indices: &self.indices,
            offsets: &self.offsets,
        }
    }

    /// Faces as owned index lists.
    pub fn faces(&self) -> Vec<Vec<usize>> {
        self.face_iter().map(<[usize]>::to_vec).collect()
    }

    /// Find a vertex group by its exact name.
    pub fn group_index(&self, name: &str) -> Option<GroupIndex> {
        self.groups
            .iter()
            .position(|g| g.name == name)
            .map(GroupIndex::from)
    }

    pub fn group(&self, name: &str) -> Option<&VertexGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    /// Indices of currently selected vertices.
    pub fn selected_vertices(&self) -> Vec<usize> {
        self.selection
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| if s { Some(i) } else { None })
            .collect()
    }
}

impl<T: Real> Default for GroupedMesh<T> {
    /// Produce an empty mesh.
    fn default() -> Self {
        GroupedMesh::new("Mesh", vec![], &[])
    }
}

impl<T: Real> NumVertices for GroupedMesh<T> {
    #[inline]
    fn num_vertices(&self) -> usize {
        self.vertex_positions.len()
    }
}

impl<T: Real> NumFaces for GroupedMesh<T> {
    #[inline]
    fn num_faces(&self) -> usize {
        self.offsets.len() - 1
    }
}

pub struct DynamicIndexSliceIter<'a> {
    /// Vertex indices of a non-uniform mesh.
    indices: &'a [usize],
    /// Face offsets into the `indices` array as in `GroupedMesh`.
    offsets: &'a [usize],
}

impl<'a> Iterator for DynamicIndexSliceIter<'a> {
    type Item = &'a [usize];

    fn next(&mut self) -> Option<&'a [usize]> {
        let (head, tail) = self.offsets.split_first()?;
        let next = *tail.first()?;
        self.offsets = tail;
        let (l, r) = self.indices.split_at(next - *head);
        self.indices = r;
        Some(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_mesh_test() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
        ];
        let faces = vec![
            3, 0, 1, 2, // first triangle
            3, 1, 3, 2, // second triangle
            4, 0, 1, 5, 4, // quadrilateral
        ];

        let mesh = GroupedMesh::<f64>::new("m", points, &faces)
            .with_group("a", [(0, 1.0), (1, 1.0)])
            .with_group("b", [(5, 0.5)]);
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.faces(), vec![vec![0, 1, 2], vec![1, 3, 2], vec![0, 1, 5, 4]]);
        assert_eq!(mesh.group_index("b"), Some(GroupIndex::from(1)));
        assert_eq!(mesh.group_index("c"), None);
        assert_eq!(mesh.group_names(), vec!["a", "b"]);
        assert_eq!(mesh.selection, vec![false; 6]);
    }

    #[test]
    fn from_faces_matches_sized_constructor() {
        let points = vec![[0.0f32; 3]; 4];
        let a = GroupedMesh::new("m", points.clone(), &[3, 0, 1, 2, 2, 2, 3]);
        let b = GroupedMesh::from_faces("m", points, &[vec![0, 1, 2], vec![2, 3]]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_mesh_has_no_faces() {
        let mesh = GroupedMesh::<f64>::default();
        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.face_iter().count(), 0);
    }
}
