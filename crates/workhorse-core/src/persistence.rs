//! Save/Load functionality.
//!
//! Two formats:
//! - flat roster records (JSON) carried across level transitions, and
//! - a full engine snapshot (bincode) with a format version.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use workhorse_logic::constants::{WorkerKind, WorkspaceKind};
use workhorse_logic::economy::{Ledger, PlayerProgress};
use workhorse_logic::goals::GoalTracker;
use workhorse_logic::grid::{GridCell, GridSize};
use workhorse_logic::ids::{WorkerId, WorkspaceId};
use workhorse_logic::layout::{Worker, Workspace};
use workhorse_logic::level::LevelTracker;
use workhorse_logic::turn::TurnClock;

use crate::config::SimConfig;
use crate::error::{SaveError, SaveResult};

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// `{workspaceId, gridPosition}` plus the optional kind and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedWorkspace {
    pub id: WorkspaceId,
    pub grid_position: GridCell,
    #[serde(default)]
    pub kind: WorkspaceKind,
    #[serde(default)]
    pub size: GridSize,
}

impl From<&Workspace> for SavedWorkspace {
    fn from(ws: &Workspace) -> Self {
        Self {
            id: ws.id,
            grid_position: ws.anchor(),
            kind: ws.kind,
            size: ws.footprint.size,
        }
    }
}

impl SavedWorkspace {
    pub fn to_workspace(&self) -> Workspace {
        Workspace::new(self.id, self.kind, self.grid_position, self.size)
    }
}

/// `{workerId, type, assignedWorkspaceId, roundsWorked, revealedFlag}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedWorker {
    pub id: WorkerId,
    pub kind: WorkerKind,
    pub assigned_workspace_id: Option<WorkspaceId>,
    pub rounds_worked: u32,
    pub revealed: bool,
}

impl From<&Worker> for SavedWorker {
    fn from(worker: &Worker) -> Self {
        Self {
            id: worker.id,
            kind: worker.kind,
            assigned_workspace_id: worker.assigned_workspace,
            rounds_worked: worker.rounds_worked,
            revealed: worker.revealed,
        }
    }
}

impl SavedWorker {
    /// Rebuild the live record. A worker whose workspace is gone comes back
    /// unassigned.
    pub fn to_worker(&self, workspace_exists: bool) -> Worker {
        let mut worker = Worker::new(self.id, self.kind);
        worker.revealed = self.revealed || self.kind.always_revealed();
        match self.assigned_workspace_id {
            Some(ws) if workspace_exists => {
                worker.assign_to_workspace(ws);
                worker.rounds_worked = self.rounds_worked;
            }
            _ => {}
        }
        worker
    }
}

/// Every workspace and worker, as flat records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub workspaces: Vec<SavedWorkspace>,
    pub workers: Vec<SavedWorker>,
}

impl RosterSnapshot {
    pub fn capture<'a>(
        workspaces: impl IntoIterator<Item = &'a Workspace>,
        workers: impl IntoIterator<Item = &'a Worker>,
    ) -> Self {
        Self {
            workspaces: workspaces.into_iter().map(SavedWorkspace::from).collect(),
            workers: workers.into_iter().map(SavedWorker::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty() && self.workers.is_empty()
    }

    pub fn to_json(&self) -> SaveResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SaveResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serializable snapshot of the whole engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub config: SimConfig,
    pub ledger: Ledger,
    pub progress: PlayerProgress,
    pub turns: TurnClock,
    pub goals: GoalTracker,
    pub level: Option<LevelTracker>,
    pub roster: RosterSnapshot,
}

/// Write a save to `writer`.
pub fn save_simulation<W: Write>(writer: W, save_data: &SaveData) -> SaveResult<()> {
    bincode::serialize_into(writer, save_data)?;
    Ok(())
}

/// Read a save, rejecting other format versions.
pub fn load_simulation<R: Read>(reader: R) -> SaveResult<SaveData> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(save_data)
}
