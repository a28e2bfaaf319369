//! Level transitions: load, restart, advance with roster carry-over.

use workhorse_logic::constants::WorkspaceKind;
use workhorse_logic::goals::GoalTracker;
use workhorse_logic::grid::{GridCell, GridSize};
use workhorse_logic::level::{LevelConfig, LevelStatus, LevelTracker};

use crate::engine::SimulationEngine;
use crate::error::LevelError;
use crate::events::SimEvent;
use crate::persistence::RosterSnapshot;

/// The starting L of Basic workspaces.
const INITIAL_WORKSPACES: [GridCell; 3] = [GridCell::new(0, 1), GridCell::new(1, 1), GridCell::new(1, 2)];

impl SimulationEngine {
    /// Clear the world and start `level_id` from its initial setup with the
    /// configured starting currency.
    pub fn load_level(&mut self, level_id: &str) -> Result<(), LevelError> {
        let config = self.level_config(level_id)?;
        self.start_level(config, None);
        Ok(())
    }

    /// Reload the current level from scratch.
    pub fn restart_level(&mut self) -> Result<(), LevelError> {
        let level_id = self
            .level
            .as_ref()
            .map(|l| l.id().to_string())
            .ok_or(LevelError::NoLevelLoaded)?;
        log::info!("Restarting level {}", level_id);
        self.load_level(&level_id)
    }

    /// Move to the next catalog level once the current one has ended.
    ///
    /// The roster carries over with its ids and the balance is kept. A failed
    /// level still pays the consolation share of its reward. Returns the new
    /// level id.
    pub fn advance_to_next_level(&mut self) -> Result<String, LevelError> {
        let current = self.level.as_ref().ok_or(LevelError::NoLevelLoaded)?;
        let current_id = current.id().to_string();
        if !current.status().is_terminal() {
            return Err(LevelError::InProgress(current_id));
        }
        let failed_reward = (current.status() == LevelStatus::Failed)
            .then_some(current.config().project_reward);

        let next = self
            .config
            .levels
            .next_after(&current_id)
            .cloned()
            .ok_or_else(|| LevelError::NoNextLevel(current_id.clone()))?;

        if let Some(reward) = failed_reward {
            let consolation = self.config.consolation_reward(reward);
            if consolation > 0 {
                log::info!("Consolation reward {} for level {}", consolation, current_id);
                self.credit(consolation);
            }
        }

        let roster = self.roster_snapshot();
        let next_id = next.id.clone();
        self.start_level(next, Some(roster));
        Ok(next_id)
    }

    /// Load the first level of the catalog.
    pub fn start_campaign(&mut self) -> Result<(), LevelError> {
        let first = self
            .config
            .levels
            .first()
            .map(|l| l.id.clone())
            .ok_or_else(|| LevelError::UnknownLevel(String::new()))?;
        self.load_level(&first)
    }

    fn level_config(&self, level_id: &str) -> Result<LevelConfig, LevelError> {
        match self.config.levels.get(level_id) {
            Some(config) => Ok(config.clone()),
            None => {
                log::warn!("Level '{}' not found", level_id);
                Err(LevelError::UnknownLevel(level_id.to_string()))
            }
        }
    }

    /// Reset per-level state and populate the world. With a roster the
    /// balance carries over; without one it resets to the starting amount.
    fn start_level(&mut self, config: LevelConfig, roster: Option<RosterSnapshot>) {
        self.world.clear();
        self.progress.reset();
        self.turns.reset();
        self.goals = GoalTracker::single(config.goal.clone());

        let level_id = config.id.clone();
        let turn_limit = config.turn_limit;
        let goal = config.goal.clone();

        match roster {
            Some(roster) => self.restore_roster(&roster),
            None => {
                self.ledger = Default::default();
                self.credit(self.config.starting_currency);
                self.spawn_initial_setup(&config);
            }
        }
        self.level = Some(LevelTracker::new(config));

        log::info!("Level {} loaded ({} turns)", level_id, turn_limit);
        self.events.push(SimEvent::LevelLoaded { level_id });
        self.events.push(SimEvent::TurnsRemainingChanged {
            turns_remaining: turn_limit,
        });
        self.events.push(SimEvent::GoalChanged(goal));
    }

    fn spawn_initial_setup(&mut self, config: &LevelConfig) {
        for anchor in INITIAL_WORKSPACES {
            self.spawn_workspace(anchor, GridSize::UNIT, WorkspaceKind::Basic);
        }
        for &kind in config.starting_kinds() {
            self.spawn_worker(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workhorse_logic::constants::WorkerKind;

    #[test]
    fn test_load_level_initial_setup() {
        let mut engine = SimulationEngine::new();
        engine.load_level("level_1").unwrap();

        assert_eq!(engine.workspace_count(), 3);
        let kinds: Vec<WorkerKind> = engine.workers().iter().map(|w| w.kind).collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&WorkerKind::Intern));
        assert!(kinds.contains(&WorkerKind::Regular));
        assert!(engine.assignments().is_empty());
        assert_eq!(engine.balance(), 50);
        assert_eq!(engine.level().map(|l| l.turns_remaining()), Some(3));
        assert_eq!(engine.current_goal().map(|g| g.id.as_str()), Some("level_1_goal"));
    }

    #[test]
    fn test_unknown_level() {
        let mut engine = SimulationEngine::new();
        assert_eq!(
            engine.load_level("level_99"),
            Err(LevelError::UnknownLevel("level_99".into()))
        );
        assert_eq!(engine.restart_level(), Err(LevelError::NoLevelLoaded));
    }

    #[test]
    fn test_advance_requires_terminal_level() {
        let mut engine = SimulationEngine::new();
        engine.load_level("level_1").unwrap();
        assert_eq!(
            engine.advance_to_next_level(),
            Err(LevelError::InProgress("level_1".into()))
        );
    }

    #[test]
    fn test_last_level_has_no_next() {
        let mut engine = SimulationEngine::new();
        engine.load_level("level_4").unwrap();
        for _ in 0..5 {
            engine.end_turn();
        }
        assert_eq!(engine.level_status(), Some(LevelStatus::Failed));
        assert_eq!(
            engine.advance_to_next_level(),
            Err(LevelError::NoNextLevel("level_4".into()))
        );
    }
}
