/*!
 * Removal of separated vertex groups that were left without members on the source mesh.
 */

use log::debug;

use crate::error::HostWriteError;
use crate::host::{MeshHandle, MeshWriter};

/// Which targeted groups were removed from the source mesh and which were kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: Vec<String>,
    pub retained: Vec<String>,
}

/// Delete every group named in `targets` that has no members left on `mesh`.
///
/// Groups are looked up by name right before each decision, since deleting a group shifts the
/// indices of the groups after it. Groups not named in `targets` are never touched, and target
/// names that no longer exist on the mesh are skipped.
pub fn prune<W: MeshWriter + ?Sized>(
    writer: &mut W,
    mesh: MeshHandle,
    targets: &[String],
) -> Result<PruneReport, HostWriteError> {
    let mut report = PruneReport::default();
    for name in targets {
        if report.deleted.contains(name) || report.retained.contains(name) {
            continue;
        }
        let Some(group) = writer.group_by_name(mesh, name) else {
            continue;
        };
        let remaining = writer.membership(mesh, group).len();
        if remaining == 0 {
            writer.delete_group(mesh, group)?;
            report.deleted.push(name.clone());
        } else {
            debug!("keeping group '{}' with {} vertices left", name, remaining);
            report.retained.push(name.clone());
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;
    use crate::host::MeshReader;
    use crate::mesh::GroupedMesh;

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn only_emptied_targets_are_deleted() {
        let mesh = GroupedMesh::<f64>::new("m", vec![[0.0; 3]; 2], &[])
            .with_group("a", std::iter::empty())
            .with_group("b", [(0, 1.0)])
            .with_group("c", std::iter::empty())
            .with_group("untouched", std::iter::empty());
        let mut host = MemoryHost::new();
        let (_, mesh) = host.add_object(mesh);

        // "a" and "c" straddle "b", so a stale index for "c" would delete the wrong group.
        let report = prune(&mut host, mesh, &targets(&["a", "b", "c", "gone"])).unwrap();
        assert_eq!(report.deleted, vec!["a", "c"]);
        assert_eq!(report.retained, vec!["b"]);
        let names: Vec<_> = host.groups(mesh).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["b", "untouched"]);
    }

    #[test]
    fn host_failures_stop_pruning() {
        let mesh = GroupedMesh::<f64>::new("m", vec![], &[]).with_group("a", std::iter::empty());
        let mut host = MemoryHost::new();
        let (_, mesh) = host.add_object(mesh);
        host.lock_mesh(mesh);
        assert!(prune(&mut host, mesh, &targets(&["a"])).is_err());
    }
}
