/*!
 * Assignment of mesh vertices to output buckets ahead of a separate operation.
 *
 * Each target group gets a bucket holding every vertex with a positive weight in that group.
 * A vertex that belongs to several target groups is placed in all of their buckets; weights are
 * not compared to pick a single owner, so no vertex silently disappears from any output.
 * Vertices in none of the target groups form the remainder that stays on the source mesh.
 */

use log::{debug, warn};

use crate::host::{MeshHandle, MeshReader};
use crate::mesh::topology::GroupIndex;

/// Vertices assigned to one target group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    pub group: GroupIndex,
    pub name: String,
    /// Source vertex indices in ascending order.
    pub vertices: Vec<usize>,
}

impl Bucket {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Result of resolving group membership for a separate operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitPlan {
    /// Number of vertices on the source mesh when the plan was made.
    pub vertex_count: usize,
    /// One bucket per distinct target group, in target order.
    pub buckets: Vec<Bucket>,
    /// Vertices that belong to none of the target groups, in ascending order.
    pub remainder: Vec<usize>,
    /// Vertices placed in more than one bucket, in ascending order.
    pub shared: Vec<usize>,
}

impl SplitPlan {
    /// Number of buckets each vertex was placed in.
    pub fn placement_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.vertex_count];
        for bucket in self.buckets.iter() {
            for &v in bucket.vertices.iter() {
                counts[v] += 1;
            }
        }
        counts
    }
}

/// Compute the split plan for separating `targets` out of `mesh`.
///
/// Repeated targets are collapsed to their first occurrence. Membership entries referring to
/// vertices past the end of the mesh are ignored. Targets that are not groups of `mesh` end up
/// with empty buckets.
pub fn resolve<R: MeshReader + ?Sized>(
    reader: &R,
    mesh: MeshHandle,
    targets: &[GroupIndex],
) -> SplitPlan {
    let vertex_count = reader.vertex_count(mesh);
    let groups = reader.groups(mesh);

    let mut buckets: Vec<Bucket> = Vec::with_capacity(targets.len());
    for &group in targets {
        if buckets.iter().any(|b| b.group == group) {
            continue;
        }
        let name = groups
            .iter()
            .find(|g| g.index == group)
            .map_or_else(|| group.to_string(), |g| g.name.clone());
        buckets.push(Bucket {
            group,
            name,
            vertices: Vec::new(),
        });
    }

    // For each vertex, the buckets it belongs to. Membership lists are sorted by vertex, but
    // we do not rely on it and guard against repeated entries instead.
    let mut vertex_buckets: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for (bucket_idx, bucket) in buckets.iter().enumerate() {
        for (v, w) in reader.membership(mesh, bucket.group) {
            if w <= 0.0 || v >= vertex_count {
                continue;
            }
            if vertex_buckets[v].last() != Some(&bucket_idx) {
                vertex_buckets[v].push(bucket_idx);
            }
        }
    }

    let mut remainder = Vec::new();
    let mut shared = Vec::new();
    for (v, owners) in vertex_buckets.iter().enumerate() {
        match owners.len() {
            0 => remainder.push(v),
            1 => {}
            _ => shared.push(v),
        }
        for &b in owners.iter() {
            buckets[b].vertices.push(v);
        }
    }

    if !shared.is_empty() {
        warn!(
            "{} vertices belong to more than one selected group and will be duplicated",
            shared.len()
        );
    }
    debug!(
        "resolved {} buckets over {} vertices ({} remaining)",
        buckets.len(),
        vertex_count,
        remainder.len()
    );

    SplitPlan {
        vertex_count,
        buckets,
        remainder,
        shared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_utils::*;
    use crate::host::memory::MemoryHost;
    use crate::mesh::GroupedMesh;
    use proptest::prelude::*;

    #[test]
    fn single_group_plan() {
        let (host, mesh) = head_torso_host();
        let head = host.group_by_name(mesh, "Head").unwrap();
        let plan = resolve(&host, mesh, &[head]);
        assert_eq!(plan.buckets.len(), 1);
        assert_eq!(plan.buckets[0].name, "Head");
        assert_eq!(plan.buckets[0].vertices, vec![0, 1, 2]);
        assert_eq!(plan.remainder, vec![3, 4]);
        assert!(plan.shared.is_empty());
    }

    #[test]
    fn overlapping_groups_duplicate_vertices() {
        let (host, mesh) = head_torso_host();
        let head = host.group_by_name(mesh, "Head").unwrap();
        let detail = host.group_by_name(mesh, "head_detail").unwrap();
        let plan = resolve(&host, mesh, &[detail, head]);
        assert_eq!(plan.buckets[0].name, "head_detail");
        assert_eq!(plan.buckets[0].vertices, vec![2]);
        assert_eq!(plan.buckets[1].vertices, vec![0, 1, 2]);
        assert_eq!(plan.shared, vec![2]);
        assert_eq!(plan.placement_counts(), vec![1, 1, 2, 0, 0]);
    }

    #[test]
    fn repeated_targets_and_bad_entries_are_ignored() {
        let mut mesh = GroupedMesh::<f64>::new("m", vec![[0.0; 3]; 3], &[]);
        mesh = mesh.with_group("g", [(0, 1.0), (1, 0.0)]);
        mesh.groups[0].weights.insert(7, 1.0);
        let mut host = MemoryHost::new();
        let (_, mesh) = host.add_object(mesh);

        let g = GroupIndex::from(0);
        let plan = resolve(&host, mesh, &[g, g]);
        assert_eq!(plan.buckets.len(), 1);
        assert_eq!(plan.buckets[0].vertices, vec![0]);
        assert_eq!(plan.remainder, vec![1, 2]);
    }

    #[test]
    fn missing_target_gets_empty_bucket() {
        let (host, mesh) = head_torso_host();
        let plan = resolve(&host, mesh, &[GroupIndex::from(42)]);
        assert!(plan.buckets[0].is_empty());
        assert_eq!(plan.remainder.len(), 5);
    }

    proptest! {
        #[test]
        fn every_vertex_is_placed(
            g1 in proptest::collection::vec(any::<bool>(), 8),
            g2 in proptest::collection::vec(any::<bool>(), 8),
        ) {
            let members = |flags: &[bool]| -> Vec<(usize, f32)> {
                flags.iter().enumerate().filter(|(_, &f)| f).map(|(i, _)| (i, 1.0)).collect()
            };
            let mesh = GroupedMesh::<f64>::new("m", vec![[0.0; 3]; 8], &[])
                .with_group("G1", members(&g1))
                .with_group("G2", members(&g2));
            let mut host = MemoryHost::new();
            let (_, mesh) = host.add_object(mesh);

            let plan = resolve(&host, mesh, &[GroupIndex::from(0), GroupIndex::from(1)]);
            let mut counts = plan.placement_counts();
            for &v in plan.remainder.iter() {
                counts[v] += 1;
            }
            for v in 0..8 {
                prop_assert!(counts[v] >= 1);
                if g1[v] != g2[v] {
                    prop_assert_eq!(counts[v], 1);
                }
            }
        }
    }
}
