//! Simulation engine - the single aggregate owning all mutable state.
//!
//! Workers and workspaces live as components in an `hecs::World`; the pure
//! pipeline in `workhorse_logic` runs over snapshots taken from it. Level
//! transitions live in `progression`, currency transactions in `shop`.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use workhorse_logic::constants::{WorkerKind, WorkspaceKind};
use workhorse_logic::economy::{to_currency, Ledger, PlayerProgress};
use workhorse_logic::goals::{GoalAdvance, GoalDefinition, GoalMetrics, GoalTracker};
use workhorse_logic::grid::{self, Footprint, GridCell, GridSize};
use workhorse_logic::ids::{WorkerId, WorkspaceId};
use workhorse_logic::layout::{build_assignments, Assignment, Worker, Workspace};
use workhorse_logic::level::{LevelStatus, LevelTracker, LevelTurnOutcome};
use workhorse_logic::productivity::{self, ProductivityReport};
use workhorse_logic::registry::{RuleSet, SynergyRegistry};
use workhorse_logic::synergy::{count_active_bonuses, SynergyResult};
use workhorse_logic::turn::TurnClock;

use crate::config::SimConfig;
use crate::error::SaveResult;
use crate::events::{EventQueue, SimEvent};
use crate::persistence::{self, RosterSnapshot, SaveData, SAVE_VERSION};

/// Result of an assignment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOutcome {
    Assigned,
    /// The worker left `from`; its rounds were reset.
    Moved { from: WorkspaceId },
    /// Already on this workspace. Rounds are kept.
    AlreadyAssigned,
    /// Another worker holds the workspace. Nothing changed.
    Occupied { occupant: WorkerId },
    /// The previous occupant was unassigned to make room.
    Replaced { displaced: WorkerId },
    UnknownWorker,
    UnknownWorkspace,
}

impl AssignOutcome {
    /// Whether the worker now holds the workspace.
    pub fn is_assigned(self) -> bool {
        matches!(
            self,
            AssignOutcome::Assigned
                | AssignOutcome::Moved { .. }
                | AssignOutcome::AlreadyAssigned
                | AssignOutcome::Replaced { .. }
        )
    }
}

/// Summary of one resolved turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// The turn that was resolved.
    pub turn: u32,
    pub productivity: f64,
    pub currency_earned: i64,
    pub active_synergies: Vec<SynergyResult>,
    pub goal_completed: Option<GoalDefinition>,
    pub level: Option<LevelTurnOutcome>,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world holding `Worker` and `Workspace` components
    pub world: World,
    pub(crate) config: SimConfig,
    pub(crate) registry: SynergyRegistry,
    pub(crate) ledger: Ledger,
    pub(crate) progress: PlayerProgress,
    pub(crate) turns: TurnClock,
    pub(crate) goals: GoalTracker,
    pub(crate) level: Option<LevelTracker>,
    pub(crate) events: EventQueue,
}

impl SimulationEngine {
    /// Free-play engine with the default config and the campaign goals for
    /// its rule set.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            registry: SynergyRegistry::for_rule_set(config.rule_set),
            ledger: Ledger::new(config.starting_currency),
            progress: PlayerProgress::default(),
            turns: TurnClock::new(),
            goals: GoalTracker::campaign(config.rule_set),
            level: None,
            events: EventQueue::new(),
            config,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn registry(&self) -> &SynergyRegistry {
        &self.registry
    }

    /// Switch rule sets. In free play the campaign is rebuilt for the new
    /// rule set, keeping goals already completed.
    pub fn set_rule_set(&mut self, rule_set: RuleSet) {
        self.config.rule_set = rule_set;
        self.registry = SynergyRegistry::for_rule_set(rule_set);
        if self.level.is_none() {
            let mut goals = GoalTracker::campaign(rule_set);
            goals.carry_completed(&self.goals);
            self.goals = goals;
        }
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance()
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn current_turn(&self) -> u32 {
        self.turns.turn
    }

    pub fn is_resolving_turn(&self) -> bool {
        self.turns.is_resolving()
    }

    pub fn goals(&self) -> &GoalTracker {
        &self.goals
    }

    pub fn current_goal(&self) -> Option<&GoalDefinition> {
        self.goals.current()
    }

    /// Replace the goal list, e.g. for a custom free-play scenario. A loaded
    /// level is still won only by completing its own goal id.
    pub fn set_goals(&mut self, goals: GoalTracker) {
        if let Some(first) = goals.current() {
            self.events.push(SimEvent::GoalChanged(first.clone()));
        }
        self.goals = goals;
    }

    pub fn level(&self) -> Option<&LevelTracker> {
        self.level.as_ref()
    }

    pub fn level_status(&self) -> Option<LevelStatus> {
        self.level.as_ref().map(LevelTracker::status)
    }

    /// Events not yet drained.
    pub fn pending_events(&self) -> &[SimEvent] {
        self.events.pending()
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    pub(crate) fn credit(&mut self, amount: i64) {
        let balance = self.ledger.credit(amount);
        self.events.push(SimEvent::CurrencyChanged { balance });
    }

    // ========================================================================
    // SPAWN / DESPAWN
    // ========================================================================

    fn worker_entity(&self, id: WorkerId) -> Option<Entity> {
        self.world
            .query::<&Worker>()
            .iter()
            .find(|(_, w)| w.id == id)
            .map(|(entity, _)| entity)
    }

    fn workspace_entity(&self, id: WorkspaceId) -> Option<Entity> {
        self.world
            .query::<&Workspace>()
            .iter()
            .find(|(_, w)| w.id == id)
            .map(|(entity, _)| entity)
    }

    pub(crate) fn with_worker_mut<R>(&mut self, id: WorkerId, f: impl FnOnce(&mut Worker) -> R) -> Option<R> {
        let entity = self.worker_entity(id)?;
        let mut worker = self.world.get::<&mut Worker>(entity).ok()?;
        Some(f(&mut *worker))
    }

    pub(crate) fn insert_worker(&mut self, worker: Worker) -> WorkerId {
        let id = worker.id;
        self.events.push(SimEvent::WorkerSpawned {
            worker: id,
            kind: worker.kind,
        });
        self.world.spawn((worker,));
        id
    }

    pub(crate) fn insert_workspace(&mut self, workspace: Workspace) -> WorkspaceId {
        let id = workspace.id;
        self.world.spawn((workspace,));
        id
    }

    /// Spawn a worker with a fresh id.
    pub fn spawn_worker(&mut self, kind: WorkerKind) -> WorkerId {
        self.insert_worker(Worker::new(WorkerId::new(), kind))
    }

    /// Spawn a worker with a caller-supplied id. `None` if the id is taken.
    pub fn spawn_worker_with_id(&mut self, id: WorkerId, kind: WorkerKind) -> Option<WorkerId> {
        if self.worker_entity(id).is_some() {
            log::warn!("Worker {} already exists", id);
            return None;
        }
        Some(self.insert_worker(Worker::new(id, kind)))
    }

    /// Spawn a workspace with a fresh id. Placement is not validated here.
    pub fn spawn_workspace(&mut self, anchor: GridCell, size: GridSize, kind: WorkspaceKind) -> WorkspaceId {
        self.insert_workspace(Workspace::new(WorkspaceId::new(), kind, anchor, size))
    }

    pub fn spawn_workspace_with_id(
        &mut self,
        id: WorkspaceId,
        anchor: GridCell,
        size: GridSize,
        kind: WorkspaceKind,
    ) -> Option<WorkspaceId> {
        if self.workspace_entity(id).is_some() {
            log::warn!("Workspace {} already exists", id);
            return None;
        }
        Some(self.insert_workspace(Workspace::new(id, kind, anchor, size)))
    }

    pub fn despawn_worker(&mut self, id: WorkerId) -> bool {
        match self.worker_entity(id) {
            Some(entity) => self.world.despawn(entity).is_ok(),
            None => false,
        }
    }

    /// Remove a workspace. Its occupant, if any, becomes unassigned.
    pub fn despawn_workspace(&mut self, id: WorkspaceId) -> bool {
        let Some(entity) = self.workspace_entity(id) else {
            return false;
        };
        for (_, worker) in self.world.query_mut::<&mut Worker>() {
            if worker.assigned_workspace == Some(id) {
                worker.unassign_from_workspace();
            }
        }
        self.world.despawn(entity).is_ok()
    }

    // ========================================================================
    // ASSIGNMENT LIFECYCLE
    // ========================================================================

    /// The worker holding `workspace`, dragging or not.
    pub fn occupant_of(&self, workspace: WorkspaceId) -> Option<WorkerId> {
        self.world
            .query::<&Worker>()
            .iter()
            .find(|(_, w)| w.assigned_workspace == Some(workspace))
            .map(|(_, w)| w.id)
    }

    /// Put `worker` on `workspace`.
    ///
    /// Refuses an occupied workspace with `Occupied`. A worker assigned
    /// elsewhere is moved, which resets its rounds.
    pub fn assign_to_workspace(&mut self, worker: WorkerId, workspace: WorkspaceId) -> AssignOutcome {
        if self.worker_entity(worker).is_none() {
            return AssignOutcome::UnknownWorker;
        }
        if self.workspace_entity(workspace).is_none() {
            return AssignOutcome::UnknownWorkspace;
        }

        match self.occupant_of(workspace) {
            Some(occupant) if occupant != worker => {
                log::warn!("Workspace {} is occupied by {}", workspace, occupant);
                return AssignOutcome::Occupied { occupant };
            }
            Some(_) => {
                self.with_worker_mut(worker, |w| w.assign_to_workspace(workspace));
                return AssignOutcome::AlreadyAssigned;
            }
            None => {}
        }

        let previous = self.with_worker_mut(worker, |w| {
            let previous = w.assigned_workspace;
            if previous.is_some() {
                w.unassign_from_workspace();
            }
            w.assign_to_workspace(workspace);
            previous
        });
        log::debug!("Assigned worker {} to workspace {}", worker, workspace);

        match previous.flatten() {
            Some(from) => AssignOutcome::Moved { from },
            None => AssignOutcome::Assigned,
        }
    }

    /// Put `worker` on `workspace`, unassigning whoever held it.
    pub fn replace_occupant(&mut self, worker: WorkerId, workspace: WorkspaceId) -> AssignOutcome {
        match self.occupant_of(workspace) {
            Some(occupant) if occupant != worker && self.worker_entity(worker).is_some() => {
                self.unassign_from_workspace(occupant);
                match self.assign_to_workspace(worker, workspace) {
                    outcome if outcome.is_assigned() => AssignOutcome::Replaced {
                        displaced: occupant,
                    },
                    outcome => outcome,
                }
            }
            _ => self.assign_to_workspace(worker, workspace),
        }
    }

    /// Clear the worker's assignment and reset its rounds. False if the
    /// worker is unknown or was not assigned.
    pub fn unassign_from_workspace(&mut self, worker: WorkerId) -> bool {
        let changed = self
            .with_worker_mut(worker, |w| {
                if w.assigned_workspace.is_none() {
                    return false;
                }
                w.unassign_from_workspace();
                true
            })
            .unwrap_or(false);
        if changed {
            log::debug!("Unassigned worker {}", worker);
        }
        changed
    }

    /// Toggle the drag state. Dragging workers are excluded from turn
    /// snapshots but keep their assignment.
    pub fn set_dragging(&mut self, worker: WorkerId, dragging: bool) -> bool {
        self.with_worker_mut(worker, |w| w.set_dragging(dragging))
            .is_some()
    }

    /// Move a workspace if the new anchor is a valid placement.
    pub fn move_workspace(&mut self, id: WorkspaceId, anchor: GridCell) -> bool {
        let Some(entity) = self.workspace_entity(id) else {
            return false;
        };
        let Some(current) = self.workspace(id).map(|w| w.footprint) else {
            return false;
        };
        let target = Footprint::new(anchor, current.size);
        let others = self.footprints_except(Some(id));
        if !grid::is_valid_placement(&target, &others, Some(&current)) {
            log::warn!("Invalid placement for workspace {} at {:?}", id, anchor);
            return false;
        }
        match self.world.get::<&mut Workspace>(entity) {
            Ok(mut ws) => {
                ws.footprint.anchor = anchor;
                true
            }
            Err(_) => false,
        }
    }

    pub(crate) fn footprints_except(&self, skip: Option<WorkspaceId>) -> Vec<Footprint> {
        self.world
            .query::<&Workspace>()
            .iter()
            .filter(|(_, w)| Some(w.id) != skip)
            .map(|(_, w)| w.footprint)
            .collect()
    }

    // ========================================================================
    // SNAPSHOTS & QUERIES
    // ========================================================================

    pub fn workspaces(&self) -> Vec<Workspace> {
        self.world
            .query::<&Workspace>()
            .iter()
            .map(|(_, w)| *w)
            .collect()
    }

    pub fn workers(&self) -> Vec<Worker> {
        self.world
            .query::<&Worker>()
            .iter()
            .map(|(_, w)| w.clone())
            .collect()
    }

    /// Assignments of working workers, built fresh from the live roster.
    pub fn assignments(&self) -> Vec<Assignment> {
        build_assignments(self.world.query::<&Worker>().iter().map(|(_, w)| w))
    }

    pub fn worker(&self, id: WorkerId) -> Option<Worker> {
        let entity = self.worker_entity(id)?;
        let worker = self.world.get::<&Worker>(entity).ok()?;
        Some((*worker).clone())
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<Workspace> {
        let entity = self.workspace_entity(id)?;
        let workspace = self.world.get::<&Workspace>(entity).ok()?;
        Some(*workspace)
    }

    pub fn worker_count(&self) -> usize {
        self.world.query::<&Worker>().iter().count()
    }

    pub fn workspace_count(&self) -> usize {
        self.world.query::<&Workspace>().iter().count()
    }

    pub fn preview_productivity(&self) -> f64 {
        productivity::calculate(&self.workspaces(), &self.assignments(), &self.registry)
    }

    pub fn preview_synergies(&self) -> Vec<SynergyResult> {
        self.registry
            .active_synergies(&self.workspaces(), &self.assignments())
    }

    pub fn preview_breakdown(&self) -> BTreeMap<WorkerId, f64> {
        productivity::breakdown(&self.workspaces(), &self.assignments(), &self.registry)
    }

    pub fn preview_report(&self) -> ProductivityReport {
        productivity::analyze(&self.workspaces(), &self.assignments(), &self.registry)
    }

    pub fn goal_metrics(&self) -> GoalMetrics {
        GoalMetrics {
            total_output: self.progress.total_productivity,
            worker_count: self.worker_count(),
            max_synergies: self.progress.max_synergies_in_one_turn,
        }
    }

    pub fn goal_progress(&self) -> f64 {
        self.goals.progress(&self.goal_metrics())
    }

    // ========================================================================
    // TURN RESOLUTION
    // ========================================================================

    /// Resolve the current turn. Returns `None` if a resolution is already
    /// in flight.
    pub fn end_turn(&mut self) -> Option<TurnReport> {
        if !self.turns.begin_resolution() {
            log::debug!("end_turn ignored: already resolving");
            return None;
        }
        let turn = self.turns.turn;

        let workspaces = self.workspaces();
        let assignments = self.assignments();
        let output = productivity::calculate(&workspaces, &assignments, &self.registry);

        let active_synergies: Vec<SynergyResult> = self
            .registry
            .active_synergies(&workspaces, &assignments)
            .into_iter()
            .filter(|r| r.is_active)
            .collect();
        self.progress
            .note_active_synergies(count_active_bonuses(&active_synergies));
        if !active_synergies.is_empty() {
            self.events
                .push(SimEvent::SynergiesActivated(active_synergies.clone()));
        }

        let mut currency_earned = 0;
        if output > 0.0 {
            self.progress.add_productivity(output);
            self.events
                .push(SimEvent::ProductivityGained { amount: output });
            currency_earned = to_currency(output);
            if currency_earned > 0 {
                self.credit(currency_earned);
            }
        }

        for (_, worker) in self.world.query_mut::<&mut Worker>() {
            if worker.is_working() {
                worker.rounds_worked = worker.rounds_worked.saturating_add(1);
            }
        }

        self.events.push(SimEvent::TurnEnded { turn });
        let next = self.turns.advance();
        self.events.push(SimEvent::TurnStarted { turn: next });

        let goal_completed = self.check_goals().map(|advance| advance.completed);
        let level = self.settle_level();

        self.turns.finish();
        log::debug!(
            "Turn {} resolved: output {:.1}, earned {}, {} synergies active",
            turn,
            output,
            currency_earned,
            active_synergies.len()
        );

        Some(TurnReport {
            turn,
            productivity: output,
            currency_earned,
            active_synergies,
            goal_completed,
            level,
        })
    }

    /// Complete the current goal if its metric has reached the target.
    pub fn check_goals(&mut self) -> Option<GoalAdvance> {
        let advance = self.goals.check(&self.goal_metrics())?;
        log::info!("Goal completed: {}", advance.completed.name);
        self.events
            .push(SimEvent::GoalCompleted(advance.completed.clone()));
        if let Some(next) = &advance.next {
            self.events.push(SimEvent::GoalChanged(next.clone()));
        }
        Some(advance)
    }

    /// Spend one turn of the level budget and settle win/lose.
    fn settle_level(&mut self) -> Option<LevelTurnOutcome> {
        let level = self.level.as_mut()?;
        let goal_met = self.goals.is_goal_completed(&level.config().goal.id);
        let outcome = level.on_turn_ended(goal_met)?;
        let level_id = level.id().to_string();

        self.events.push(SimEvent::TurnsRemainingChanged {
            turns_remaining: outcome.turns_remaining,
        });

        match outcome.status {
            LevelStatus::Won => {
                if let Some(reward) = outcome.reward {
                    self.credit(reward);
                    self.events
                        .push(SimEvent::ProjectRewardEarned { amount: reward });
                }
                log::info!("Level {} won", level_id);
                self.events.push(SimEvent::LevelWon { level_id });
            }
            LevelStatus::Failed => {
                log::info!("Level {} failed", level_id);
                self.events.push(SimEvent::LevelFailed { level_id });
            }
            LevelStatus::InProgress => {}
        }

        Some(outcome)
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Flat records of every workspace and worker.
    pub fn roster_snapshot(&self) -> RosterSnapshot {
        let workspaces = self.workspaces();
        let workers = self.workers();
        RosterSnapshot::capture(&workspaces, &workers)
    }

    /// Spawn a saved roster, keeping its ids. Records whose id is already
    /// present are skipped.
    pub fn restore_roster(&mut self, roster: &RosterSnapshot) {
        for saved in &roster.workspaces {
            if self.workspace_entity(saved.id).is_none() {
                self.insert_workspace(saved.to_workspace());
            }
        }
        for saved in &roster.workers {
            if self.worker_entity(saved.id).is_some() {
                continue;
            }
            let workspace_exists = saved
                .assigned_workspace_id
                .is_some_and(|ws| self.workspace_entity(ws).is_some());
            let mut worker = saved.to_worker(workspace_exists);
            if let Some(ws) = worker.assigned_workspace {
                // Never restore two workers onto one workspace.
                if self.occupant_of(ws).is_some() {
                    worker.unassign_from_workspace();
                }
            }
            self.insert_worker(worker);
        }
    }

    /// Save simulation state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> SaveResult<()> {
        let save_data = SaveData {
            version: SAVE_VERSION,
            config: self.config.clone(),
            ledger: self.ledger,
            progress: self.progress,
            turns: self.turns,
            goals: self.goals.clone(),
            level: self.level.clone(),
            roster: self.roster_snapshot(),
        };
        persistence::save_simulation(writer, &save_data)?;
        log::info!("Saved simulation at turn {}", self.turns.turn);
        Ok(())
    }

    /// Load simulation state from a reader, replacing everything.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> SaveResult<()> {
        let loaded = persistence::load_simulation(reader)?;

        self.world.clear();
        self.registry = SynergyRegistry::for_rule_set(loaded.config.rule_set);
        self.config = loaded.config;
        self.ledger = loaded.ledger;
        self.progress = loaded.progress;
        self.turns = loaded.turns;
        self.turns.finish();
        self.goals = loaded.goals;
        self.level = loaded.level;
        self.restore_roster(&loaded.roster);
        self.events.clear();

        log::info!("Loaded simulation at turn {}", self.turns.turn);
        Ok(())
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}
