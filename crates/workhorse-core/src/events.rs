//! Engine notifications.
//!
//! The engine queues events as it mutates state; subscribers drain them
//! after each call. The engine never knows who is listening.

use serde::{Deserialize, Serialize};
use workhorse_logic::constants::WorkerKind;
use workhorse_logic::goals::GoalDefinition;
use workhorse_logic::ids::WorkerId;
use workhorse_logic::synergy::SynergyResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Synergies active at resolution. Only emitted when non-empty.
    SynergiesActivated(Vec<SynergyResult>),
    ProductivityGained { amount: f64 },
    TurnEnded { turn: u32 },
    TurnStarted { turn: u32 },
    CurrencyChanged { balance: i64 },
    GoalCompleted(GoalDefinition),
    GoalChanged(GoalDefinition),
    LevelLoaded { level_id: String },
    TurnsRemainingChanged { turns_remaining: u32 },
    ProjectRewardEarned { amount: i64 },
    LevelWon { level_id: String },
    LevelFailed { level_id: String },
    WorkerSpawned { worker: WorkerId, kind: WorkerKind },
    WorkerRevealed { worker: WorkerId, kind: WorkerKind },
}

/// FIFO of pending events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    pending: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.pending.push(event);
    }

    pub fn pending(&self) -> &[SimEvent] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
