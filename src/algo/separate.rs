/*!
 * The separate operation: resolve membership, split every selected group into its own object,
 * shrink the source mesh and prune its emptied groups.
 *
 * Groups are processed independently. A group that fails is recorded in the report and the
 * operation moves on; the run as a whole fails only if no group could be separated, or if the
 * source mesh could not be updated afterwards. Nothing is rolled back.
 */

use std::fmt;

use log::{debug, warn};

use super::membership::resolve;
use super::prune::{prune, PruneReport};
use super::split::{
    materialize, rewrite_source, SeparateOptions, Separated, SourceRewrite, SourceSnapshot,
};
use crate::error::{EmptyGroupError, Error};
use crate::host::{MeshHandle, MeshWriter};
use crate::mesh::topology::GroupIndex;

/// Progress of a single separate invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeparateState {
    Idle,
    Resolving,
    Splitting,
    Pruning,
    Done,
    Failed(String),
}

impl SeparateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SeparateState::Done | SeparateState::Failed(_))
    }
}

/// What happened to one selected group.
#[derive(Clone, Debug, PartialEq)]
pub enum GroupOutcome {
    Separated(Separated),
    Skipped(EmptyGroupError),
    Failed(Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupReport {
    pub name: String,
    pub outcome: GroupOutcome,
}

/// Summary of a separate invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct SeparateReport {
    /// Terminal state of the run.
    pub state: SeparateState,
    /// One entry per distinct selected group, in selection order.
    pub groups: Vec<GroupReport>,
    /// Source vertices that were copied into more than one new object.
    pub shared_vertices: Vec<usize>,
    /// The updated source mesh, if it was rewritten.
    pub source: Option<SourceRewrite>,
    pub pruned: PruneReport,
}

impl SeparateReport {
    fn new() -> Self {
        SeparateReport {
            state: SeparateState::Idle,
            groups: Vec::new(),
            shared_vertices: Vec::new(),
            source: None,
            pruned: PruneReport::default(),
        }
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &Separated> {
        self.groups.iter().filter_map(|g| match &g.outcome {
            GroupOutcome::Separated(s) => Some(s),
            _ => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &EmptyGroupError> {
        self.groups.iter().filter_map(|g| match &g.outcome {
            GroupOutcome::Skipped(e) => Some(e),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.groups.iter().filter_map(|g| match &g.outcome {
            GroupOutcome::Failed(e) => Some((g.name.as_str(), e)),
            _ => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.state == SeparateState::Done
    }
}

impl fmt::Display for SeparateReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let succeeded = self.succeeded().count();
        match &self.state {
            SeparateState::Failed(reason) => writeln!(f, "separate failed: {}", reason)?,
            _ => writeln!(
                f,
                "separated {} of {} groups",
                succeeded,
                self.groups.len()
            )?,
        }
        for group in self.groups.iter() {
            match &group.outcome {
                GroupOutcome::Separated(s) => writeln!(
                    f,
                    "  {}: separated into object {} ({} vertices)",
                    group.name, s.object, s.vertex_count
                )?,
                GroupOutcome::Skipped(e) => writeln!(f, "  {}: skipped ({})", group.name, e)?,
                GroupOutcome::Failed(e) => writeln!(f, "  {}: failed ({})", group.name, e)?,
            }
        }
        if !self.shared_vertices.is_empty() {
            writeln!(
                f,
                "  {} vertices shared by several groups were duplicated",
                self.shared_vertices.len()
            )?;
        }
        if !self.pruned.deleted.is_empty() {
            writeln!(
                f,
                "  removed from source: {}",
                self.pruned.deleted.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Runs separate operations with fixed options.
#[derive(Clone, Debug)]
pub struct Separator {
    options: SeparateOptions,
    state: SeparateState,
}

impl Separator {
    pub fn new(options: SeparateOptions) -> Self {
        Separator {
            options,
            state: SeparateState::Idle,
        }
    }

    pub fn options(&self) -> SeparateOptions {
        self.options
    }

    /// State reached by the last run, or `Idle` if nothing ran yet.
    pub fn state(&self) -> &SeparateState {
        &self.state
    }

    fn enter(&mut self, report: &mut SeparateReport, state: SeparateState) {
        debug!("separate: {:?} -> {:?}", self.state, state);
        self.state = state.clone();
        report.state = state;
    }

    /// Separate each of `targets` from `mesh` into a new object.
    ///
    /// Group indices refer to the group table of `mesh` as it is before the call. The table is
    /// usually different afterwards, so indices held by the caller should be refreshed.
    ///
    /// A group that failed to separate is still pruned from the source if all of its vertices
    /// were moved out by other groups.
    pub fn run<W: MeshWriter + ?Sized>(
        &mut self,
        writer: &mut W,
        mesh: MeshHandle,
        targets: &[GroupIndex],
    ) -> SeparateReport {
        let mut report = SeparateReport::new();
        self.state = SeparateState::Idle;

        self.enter(&mut report, SeparateState::Resolving);
        let plan = resolve(&*writer, mesh, targets);
        report.shared_vertices = plan.shared.clone();
        if plan.buckets.is_empty() {
            self.enter(
                &mut report,
                SeparateState::Failed("no vertex groups selected".to_string()),
            );
            return report;
        }
        let source = SourceSnapshot::read(&*writer, mesh);

        self.enter(&mut report, SeparateState::Splitting);
        let mut placed = vec![false; plan.vertex_count];
        for bucket in plan.buckets.iter() {
            let outcome = match materialize(writer, &source, bucket, self.options) {
                Ok(separated) => {
                    for &v in bucket.vertices.iter() {
                        placed[v] = true;
                    }
                    GroupOutcome::Separated(separated)
                }
                Err(Error::EmptyGroup(e)) => {
                    warn!("skipping vertex group '{}': {}", bucket.name, e);
                    GroupOutcome::Skipped(e)
                }
                Err(e) => {
                    warn!("could not separate vertex group '{}': {}", bucket.name, e);
                    GroupOutcome::Failed(e)
                }
            };
            report.groups.push(GroupReport {
                name: bucket.name.clone(),
                outcome,
            });
        }

        if report.succeeded().next().is_none() {
            self.enter(
                &mut report,
                SeparateState::Failed("no vertex group could be separated".to_string()),
            );
            return report;
        }

        // Vertices whose every bucket failed stay on the source.
        let keep: Vec<usize> = (0..plan.vertex_count).filter(|&v| !placed[v]).collect();
        match rewrite_source(writer, &source, &keep) {
            Ok(rewrite) => report.source = Some(rewrite),
            Err(e) => {
                self.enter(
                    &mut report,
                    SeparateState::Failed(format!("could not update source mesh: {}", e)),
                );
                return report;
            }
        }

        self.enter(&mut report, SeparateState::Pruning);
        // Groups skipped for being empty are left alone.
        let prune_targets: Vec<String> = report
            .groups
            .iter()
            .filter(|g| !matches!(g.outcome, GroupOutcome::Skipped(_)))
            .map(|g| g.name.clone())
            .collect();
        match prune(writer, mesh, &prune_targets) {
            Ok(pruned) => report.pruned = pruned,
            Err(e) => {
                self.enter(
                    &mut report,
                    SeparateState::Failed(format!("could not prune source groups: {}", e)),
                );
                return report;
            }
        }

        self.enter(&mut report, SeparateState::Done);
        report
    }
}

/// Separate `targets` from `mesh` with the given options.
pub fn separate<W: MeshWriter + ?Sized>(
    writer: &mut W,
    mesh: MeshHandle,
    targets: &[GroupIndex],
    options: SeparateOptions,
) -> SeparateReport {
    Separator::new(options).run(writer, mesh, targets)
}
