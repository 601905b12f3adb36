/*!
 * The filtered list of vertex groups presented to the user, along with the subset of that list
 * the user has picked for further operations.
 */

use log::{debug, warn};

use super::matcher::{matches, substitute};
use crate::error::{EmptyQueryError, Error, NameCollisionError};
use crate::host::{MeshHandle, MeshReader, MeshWriter};
use crate::mesh::topology::GroupIndex;

/// One vertex group in the current filter result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupEntry {
    /// Index of the group on the filtered mesh.
    pub index: GroupIndex,
    /// Group name at the time it was last filtered or renamed.
    pub name: String,
    /// Whether the user has selected this group.
    pub selected: bool,
}

/// Outcome of renaming a single group.
#[derive(Clone, Debug, PartialEq)]
pub enum RenameOutcome {
    /// The group was renamed from `from` to `to`.
    Renamed { from: String, to: String },
    /// The substitution did not change the name.
    Unchanged { name: String },
    /// The group kept its name because of the given error.
    Failed { name: String, error: Error },
}

/// Per-group results of a batch rename.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenameReport {
    pub outcomes: Vec<RenameOutcome>,
}

impl RenameReport {
    pub fn renamed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RenameOutcome::Renamed { .. }))
            .count()
    }

    /// Groups that could not be renamed, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes.iter().filter_map(|o| match o {
            RenameOutcome::Failed { name, error } => Some((name.as_str(), error)),
            _ => None,
        })
    }
}

/// Ordered list of vertex groups matching the last filter query, with a selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupFilterIndex {
    query: String,
    entries: Vec<GroupEntry>,
    /// Position in `entries` of the most recently toggled group.
    active: Option<usize>,
}

impl GroupFilterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the match list for `query` on `mesh`.
    ///
    /// Groups are listed in the mesh's native order. Every successful call clears the selection.
    /// A blank query is rejected and leaves the current state as it was.
    pub fn filter<R: MeshReader + ?Sized>(
        &mut self,
        reader: &R,
        mesh: MeshHandle,
        query: &str,
    ) -> Result<&[GroupEntry], EmptyQueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EmptyQueryError);
        }

        self.query = query.to_string();
        self.active = None;
        self.entries = reader
            .groups(mesh)
            .into_iter()
            .filter(|g| matches(&g.name, query))
            .map(|g| GroupEntry {
                index: g.index,
                name: g.name,
                selected: false,
            })
            .collect();
        debug!("filter '{}' matched {} groups", query, self.entries.len());
        Ok(&self.entries)
    }

    /// The query that produced the current match list.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn entries(&self) -> &[GroupEntry] {
        &self.entries
    }

    /// The most recently toggled entry, if any.
    pub fn active(&self) -> Option<&GroupEntry> {
        self.active.and_then(|i| self.entries.get(i))
    }

    /// Indices of the selected groups in match order.
    pub fn selected(&self) -> Vec<GroupIndex> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.index)
            .collect()
    }

    /// Forget the match list, e.g. after the mesh's group table changed underneath it.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Flip the selection of `group`.
    ///
    /// Returns the new selection state, or `None` if `group` is not in the current result.
    pub fn toggle(&mut self, group: GroupIndex) -> Option<bool> {
        let pos = self.entries.iter().position(|e| e.index == group)?;
        let entry = &mut self.entries[pos];
        entry.selected = !entry.selected;
        self.active = Some(pos);
        Some(entry.selected)
    }

    /// Select every group in the current result.
    pub fn select_all(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.selected = true;
        }
    }

    /// Toggle `group` and mirror the change on the mesh's vertex selection: members of the
    /// group become selected when the group is selected and deselected otherwise.
    pub fn highlight_toggle<W: MeshWriter + ?Sized>(
        &mut self,
        writer: &mut W,
        mesh: MeshHandle,
        group: GroupIndex,
    ) -> Result<Option<bool>, Error> {
        let Some(selected) = self.toggle(group) else {
            return Ok(None);
        };
        let mut selection = writer.vertex_selection(mesh);
        for (v, _) in writer.membership(mesh, group) {
            if let Some(flag) = selection.get_mut(v) {
                *flag = selected;
            }
        }
        writer.set_vertex_selection(mesh, &selection)?;
        Ok(Some(selected))
    }

    /// Select every group in the current result and make the mesh's vertex selection exactly
    /// the union of their members.
    pub fn highlight_all<W: MeshWriter + ?Sized>(
        &mut self,
        writer: &mut W,
        mesh: MeshHandle,
    ) -> Result<(), Error> {
        self.select_all();
        let mut selection = vec![false; writer.vertex_count(mesh)];
        for entry in self.entries.iter() {
            for (v, _) in writer.membership(mesh, entry.index) {
                if let Some(flag) = selection.get_mut(v) {
                    *flag = true;
                }
            }
        }
        writer.set_vertex_selection(mesh, &selection)?;
        Ok(())
    }

    /// Substitute `replacement` for `query` in the name of every group in the current result.
    ///
    /// A group is renamed only if its name changes and the new name is not used by another
    /// group on the mesh. Failures are recorded per group and do not stop the batch.
    pub fn rename<W: MeshWriter + ?Sized>(
        &mut self,
        writer: &mut W,
        mesh: MeshHandle,
        query: &str,
        replacement: &str,
    ) -> Result<RenameReport, EmptyQueryError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EmptyQueryError);
        }

        let mut report = RenameReport::default();
        for entry in self.entries.iter_mut() {
            let new_name = substitute(&entry.name, query, replacement);
            if new_name == entry.name {
                report.outcomes.push(RenameOutcome::Unchanged {
                    name: entry.name.clone(),
                });
                continue;
            }

            let taken = writer
                .groups(mesh)
                .iter()
                .any(|g| g.index != entry.index && g.name == new_name);
            let result = if taken {
                Err(NameCollisionError {
                    from: entry.name.clone(),
                    to: new_name.clone(),
                }
                .into())
            } else {
                writer.rename_group(mesh, entry.index, &new_name)
            };

            match result {
                Ok(()) => {
                    let from = std::mem::replace(&mut entry.name, new_name.clone());
                    report.outcomes.push(RenameOutcome::Renamed { from, to: new_name });
                }
                Err(error) => {
                    warn!("could not rename vertex group '{}': {}", entry.name, error);
                    report.outcomes.push(RenameOutcome::Failed {
                        name: entry.name.clone(),
                        error,
                    });
                }
            }
        }
        debug!(
            "renamed {} of {} matched groups",
            report.renamed(),
            self.entries.len()
        );
        Ok(report)
    }
}
