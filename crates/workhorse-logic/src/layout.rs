//! Workspace, Worker and Assignment records.
//!
//! `Workspace` and `Worker` are the live records owned by the engine.
//! `Assignment` is derived fresh from them at the instant of resolution and
//! never cached. `Layout` is a read-only indexed view over one snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{WorkerKind, WorkspaceKind};
use crate::grid::{Footprint, GridCell, GridSize};
use crate::ids::{WorkerId, WorkspaceId};

/// A grid-anchored rectangular slot holding at most one worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub kind: WorkspaceKind,
    pub footprint: Footprint,
}

impl Workspace {
    pub fn new(id: WorkspaceId, kind: WorkspaceKind, anchor: GridCell, size: GridSize) -> Self {
        Self {
            id,
            kind,
            footprint: Footprint::new(anchor, size),
        }
    }

    /// A 1×1 workspace.
    pub fn unit(id: WorkspaceId, kind: WorkspaceKind, anchor: GridCell) -> Self {
        Self::new(id, kind, anchor, GridSize::UNIT)
    }

    pub fn anchor(&self) -> GridCell {
        self.footprint.anchor
    }

    pub fn occupied_cells(&self) -> Vec<GridCell> {
        crate::grid::occupied_cells(&self.footprint)
    }
}

/// True iff any cell of `a` is a 4-neighbour of any cell of `b`.
pub fn workspaces_adjacent(a: &Workspace, b: &Workspace) -> bool {
    a.footprint.is_adjacent_to(&b.footprint)
}

/// Worker lifecycle with respect to work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkState {
    #[default]
    Idle,
    /// Held by the input layer; never counted as working.
    Dragging,
    Working,
}

/// An assignable worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub kind: WorkerKind,
    pub state: WorkState,
    pub assigned_workspace: Option<WorkspaceId>,
    /// Consecutive resolved turns spent assigned. Reset on unassignment.
    pub rounds_worked: u32,
    pub revealed: bool,
}

impl Worker {
    pub fn new(id: WorkerId, kind: WorkerKind) -> Self {
        Self {
            id,
            kind,
            state: WorkState::Idle,
            assigned_workspace: None,
            rounds_worked: 0,
            revealed: kind.always_revealed(),
        }
    }

    pub fn assign_to_workspace(&mut self, workspace: WorkspaceId) {
        self.assigned_workspace = Some(workspace);
        self.state = WorkState::Working;
    }

    pub fn unassign_from_workspace(&mut self) {
        self.assigned_workspace = None;
        self.rounds_worked = 0;
        self.state = WorkState::Idle;
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.state = if dragging {
            WorkState::Dragging
        } else if self.assigned_workspace.is_some() {
            WorkState::Working
        } else {
            WorkState::Idle
        };
    }

    /// Assigned and in the working state.
    pub fn is_working(&self) -> bool {
        self.state == WorkState::Working && self.assigned_workspace.is_some()
    }

    /// The assignment tuple for this worker, if it is working.
    pub fn assignment(&self) -> Option<Assignment> {
        if !self.is_working() {
            return None;
        }
        self.assigned_workspace.map(|workspace_id| Assignment {
            worker_id: self.id,
            workspace_id,
            kind: self.kind,
            rounds_worked: self.rounds_worked,
        })
    }
}

/// (worker, workspace, type, rounds) tuple for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub worker_id: WorkerId,
    pub workspace_id: WorkspaceId,
    pub kind: WorkerKind,
    pub rounds_worked: u32,
}

/// Build the assignment list from the live worker set.
pub fn build_assignments<'a>(workers: impl IntoIterator<Item = &'a Worker>) -> Vec<Assignment> {
    workers.into_iter().filter_map(Worker::assignment).collect()
}

/// Indexed read-only view of one workspace/assignment snapshot.
pub struct Layout<'a> {
    pub workspaces: &'a [Workspace],
    pub assignments: &'a [Assignment],
    by_id: HashMap<WorkspaceId, &'a Workspace>,
}

impl<'a> Layout<'a> {
    pub fn new(workspaces: &'a [Workspace], assignments: &'a [Assignment]) -> Self {
        let by_id = workspaces.iter().map(|w| (w.id, w)).collect();
        Self {
            workspaces,
            assignments,
            by_id,
        }
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<&'a Workspace> {
        self.by_id.get(&id).copied()
    }

    /// Workspace of an assignment; `None` if it no longer exists.
    pub fn workspace_of(&self, assignment: &Assignment) -> Option<&'a Workspace> {
        self.workspace(assignment.workspace_id)
    }

    /// Assignments whose workspace exists in this snapshot.
    pub fn placed(&self) -> impl Iterator<Item = (&'a Assignment, &'a Workspace)> + '_ {
        self.assignments
            .iter()
            .filter_map(move |a| self.workspace_of(a).map(|w| (a, w)))
    }

    /// Workspaces that hold a worker.
    pub fn occupied_workspaces(&self) -> Vec<&'a Workspace> {
        self.placed().map(|(_, w)| w).collect()
    }

    pub fn workers_adjacent(&self, a: &Assignment, b: &Assignment) -> bool {
        match (self.workspace_of(a), self.workspace_of(b)) {
            (Some(wa), Some(wb)) => workspaces_adjacent(wa, wb),
            _ => false,
        }
    }

    /// Whether any other assigned worker is adjacent to `me`.
    pub fn has_adjacent_worker(&self, me: &Assignment) -> bool {
        self.assignments
            .iter()
            .filter(|other| other.worker_id != me.worker_id)
            .any(|other| self.workers_adjacent(me, other))
    }

    pub fn count_kind(&self, kind: WorkerKind) -> usize {
        self.assignments.iter().filter(|a| a.kind == kind).count()
    }
}
