//!
//! Vertex groups: named, weighted subsets of a mesh's vertices.
//!

use std::collections::BTreeMap;

/// A named, weighted subset of mesh vertices.
///
/// Weights are stored per vertex index in ascending vertex order. A vertex is a member of the group
/// only if it has a strictly positive weight; zero or negative weights are treated as absent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexGroup {
    /// Group name, unique within the owning mesh.
    pub name: String,
    /// Vertex weights keyed by vertex index.
    pub weights: BTreeMap<usize, f32>,
}

impl VertexGroup {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        VertexGroup {
            name: name.into(),
            weights: BTreeMap::new(),
        }
    }

    /// Create a group from `(vertex, weight)` pairs. Non-positive weights are dropped.
    ///
    /// # Examples
    /// ```
    /// use vgroupx::mesh::VertexGroup;
    /// let group = VertexGroup::with_entries("Head", [(0, 1.0), (2, 0.5), (3, 0.0)]);
    /// assert_eq!(group.num_members(), 2);
    /// assert!(!group.contains(3));
    /// ```
    pub fn with_entries(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (usize, f32)>,
    ) -> Self {
        let mut group = VertexGroup::new(name);
        group.set_entries(entries);
        group
    }

    /// Replace all entries of this group.
    pub fn set_entries(&mut self, entries: impl IntoIterator<Item = (usize, f32)>) {
        self.weights = entries.into_iter().filter(|&(_, w)| w > 0.0).collect();
    }

    /// Weight of the given vertex, if it is a member.
    #[inline]
    pub fn weight(&self, vtx: usize) -> Option<f32> {
        self.weights.get(&vtx).copied().filter(|&w| w > 0.0)
    }

    #[inline]
    pub fn contains(&self, vtx: usize) -> bool {
        self.weight(vtx).is_some()
    }

    /// Iterate over member `(vertex, weight)` pairs in ascending vertex order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.weights
            .iter()
            .map(|(&v, &w)| (v, w))
            .filter(|&(_, w)| w > 0.0)
    }

    pub fn num_members(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.num_members() == 0
    }

    /// Remove membership for vertices at or beyond `num_vertices`.
    pub fn truncate(&mut self, num_vertices: usize) {
        let _ = self.weights.split_off(&num_vertices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_weights_are_not_members() {
        let mut group = VertexGroup::new("g");
        group.weights.insert(0, 0.0);
        group.weights.insert(1, -1.0);
        group.weights.insert(2, 0.25);
        assert_eq!(group.entries().collect::<Vec<_>>(), vec![(2, 0.25)]);
        assert_eq!(group.weight(0), None);
        assert!(!group.is_empty());
    }

    #[test]
    fn truncate_drops_out_of_range_vertices() {
        let mut group = VertexGroup::with_entries("g", [(0, 1.0), (4, 1.0), (9, 1.0)]);
        group.truncate(5);
        assert_eq!(group.entries().map(|(v, _)| v).collect::<Vec<_>>(), vec![0, 4]);
    }
}
