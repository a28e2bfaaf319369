//! Level configuration, turn budget and win/lose state.

use serde::{Deserialize, Serialize};

use crate::constants::WorkerKind;
use crate::goals::GoalDefinition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: String,
    pub name: String,
    /// Kinds that may be hired. The first two are spawned on load.
    pub available_kinds: Vec<WorkerKind>,
    pub turn_limit: u32,
    pub goal: GoalDefinition,
    /// Currency credited when the level is won.
    pub project_reward: i64,
}

impl LevelConfig {
    pub fn is_kind_available(&self, kind: WorkerKind) -> bool {
        self.available_kinds.contains(&kind)
    }

    /// Kinds spawned as the starting roster.
    pub fn starting_kinds(&self) -> &[WorkerKind] {
        let n = self.available_kinds.len().min(2);
        &self.available_kinds[..n]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    #[default]
    InProgress,
    Won,
    Failed,
}

impl LevelStatus {
    pub fn is_terminal(self) -> bool {
        self != LevelStatus::InProgress
    }
}

/// What happened to the level at the end of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTurnOutcome {
    pub turns_remaining: u32,
    pub status: LevelStatus,
    /// Reward to credit, set only on the turn the level is won.
    pub reward: Option<i64>,
}

/// Turn budget and status of the level being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTracker {
    config: LevelConfig,
    turns_remaining: u32,
    status: LevelStatus,
}

impl LevelTracker {
    pub fn new(config: LevelConfig) -> Self {
        Self {
            turns_remaining: config.turn_limit,
            config,
            status: LevelStatus::InProgress,
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn turns_remaining(&self) -> u32 {
        self.turns_remaining
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    /// Spend one turn of budget, then settle the level.
    ///
    /// A completed goal wins even on the last turn. Terminal levels ignore
    /// further turns and return `None`.
    pub fn on_turn_ended(&mut self, goal_completed: bool) -> Option<LevelTurnOutcome> {
        if self.status.is_terminal() {
            return None;
        }

        self.turns_remaining = self.turns_remaining.saturating_sub(1);

        let mut reward = None;
        if goal_completed {
            self.status = LevelStatus::Won;
            if self.config.project_reward > 0 {
                reward = Some(self.config.project_reward);
            }
        } else if self.turns_remaining == 0 {
            self.status = LevelStatus::Failed;
        }

        Some(LevelTurnOutcome {
            turns_remaining: self.turns_remaining,
            status: self.status,
            reward,
        })
    }
}

/// Ordered list of levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelConfig>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[LevelConfig] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn first(&self) -> Option<&LevelConfig> {
        self.levels.first()
    }

    pub fn get(&self, id: &str) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// The level after `id`, or `None` if `id` is last or unknown.
    pub fn next_after(&self, id: &str) -> Option<&LevelConfig> {
        let index = self.levels.iter().position(|l| l.id == id)?;
        self.levels.get(index + 1)
    }
}
