//! Game constants - worker kinds, workspace kinds and their rate tables.
//!
//! Rates are expressed in "rate units": a worker with rate 1.0 on a Basic
//! workspace produces [`INCOME_PER_RATE`] income per turn.

use serde::{Deserialize, Serialize};

/// Income produced per rate unit.
pub const INCOME_PER_RATE: f64 = 100.0;

/// Lowest grid row a workspace may occupy. Row 0 is the floor.
pub const GROUND_ROW: i32 = 1;

/// Workspace tier. Determines the output multiplier applied to its occupant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkspaceKind {
    #[default]
    Basic,
    Advanced,
    Elite,
}

impl WorkspaceKind {
    pub const ALL: [WorkspaceKind; 3] = [Self::Basic, Self::Advanced, Self::Elite];

    /// Output multiplier applied to whoever works here.
    pub fn multiplier(self) -> f64 {
        match self {
            WorkspaceKind::Basic => 1.0,
            WorkspaceKind::Advanced => 1.5,
            WorkspaceKind::Elite => 2.0,
        }
    }
}

/// Worker ("workhorse") type.
///
/// The first three kinds are plain producers. The rest carry an ability rule
/// registered in [`crate::synergy::AbilityRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkerKind {
    Intern,
    Regular,
    Senior,
    Solitary,
    Amplifier,
    Accelerator,
    Dampener,
    Decayer,
    Saboteur,
}

impl WorkerKind {
    pub const ALL: [WorkerKind; 9] = [
        Self::Intern,
        Self::Regular,
        Self::Senior,
        Self::Solitary,
        Self::Amplifier,
        Self::Accelerator,
        Self::Dampener,
        Self::Decayer,
        Self::Saboteur,
    ];

    /// Base output in rate units before workspace and synergy modifiers.
    pub fn base_rate(self) -> f64 {
        match self {
            WorkerKind::Intern => 0.5,
            WorkerKind::Regular => 1.0,
            WorkerKind::Senior => 1.5,
            WorkerKind::Solitary => 2.0, // overridden by ability
            WorkerKind::Amplifier => 0.5,
            WorkerKind::Accelerator => 0.5, // grows each round
            WorkerKind::Dampener => 1.0,
            WorkerKind::Decayer => 1.0, // shrinks each round
            WorkerKind::Saboteur => 0.0,
        }
    }

    /// Plain producers are visible from the start; ability kinds are masked
    /// until revealed.
    pub fn always_revealed(self) -> bool {
        matches!(
            self,
            WorkerKind::Intern | WorkerKind::Regular | WorkerKind::Senior
        )
    }

    pub fn has_ability(self) -> bool {
        !self.always_revealed()
    }

    pub fn name(self) -> &'static str {
        match self {
            WorkerKind::Intern => "Intern",
            WorkerKind::Regular => "Regular",
            WorkerKind::Senior => "Senior",
            WorkerKind::Solitary => "Solitary",
            WorkerKind::Amplifier => "Amplifier",
            WorkerKind::Accelerator => "Accelerator",
            WorkerKind::Dampener => "Dampener",
            WorkerKind::Decayer => "Decayer",
            WorkerKind::Saboteur => "Saboteur",
        }
    }
}

impl std::fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Base productivity of a worker kind on a workspace kind, in income units.
pub fn base_output(workspace: WorkspaceKind, worker: WorkerKind) -> f64 {
    workspace.multiplier() * worker.base_rate() * INCOME_PER_RATE
}
