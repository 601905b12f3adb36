pub mod filter;
pub mod matcher;
pub mod membership;
pub mod prune;
pub mod separate;
pub mod split;

pub use self::filter::*;
pub use self::matcher::*;
pub use self::membership::*;
pub use self::prune::*;
pub use self::separate::*;
pub use self::split::*;


#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;
    use crate::host::MeshReader;

    // Filter, rename and separate on the same mesh, refreshing the filter after the group table
    // changed.
    #[test]
    fn filter_rename_then_separate() {
        let (mut host, mesh) = head_torso_host();
        let mut index = GroupFilterIndex::new();

        index.filter(&host, mesh, "head").unwrap();
        index.rename(&mut host, mesh, "head", "skull").unwrap();
        assert_eq!(
            host.mesh(mesh).unwrap().group_names(),
            vec!["skull", "skull_detail", "Torso"]
        );

        index.filter(&host, mesh, "skull").unwrap();
        let skull = host.group_by_name(mesh, "skull").unwrap();
        index.toggle(skull);
        let options = SeparateOptions {
            rename_separated: true,
        };
        let report = separate(&mut host, mesh, &index.selected(), options);
        assert!(report.is_success());
        index.clear();

        let object = report.succeeded().next().unwrap().object;
        assert_eq!(host.object(object).unwrap().name, "skull");
        index.filter(&host, mesh, "skull").unwrap();
        let remaining: Vec<_> = index.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(remaining, vec!["skull_detail"]);
    }
}
