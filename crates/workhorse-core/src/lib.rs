//! Workhorse Core - Turn-Based Workforce Simulation Engine
//!
//! Workers are assigned to grid-placed workspaces; each turn converts the
//! assignment layout into productivity through the synergy pipeline in
//! `workhorse_logic`, then credits the economy and advances goals and the
//! level budget.
//!
//! # Architecture
//!
//! Live records are stored in an ECS world via `hecs`:
//! - **Entities**: workers and workspaces
//! - **Components**: the `Worker` and `Workspace` records themselves
//! - **Engine**: `SimulationEngine` owns the world plus the ledger, turn
//!   clock, goals and level, and snapshots the world for every resolution
//!
//! # Example
//!
//! ```rust,no_run
//! use workhorse_core::prelude::*;
//!
//! let mut engine = SimulationEngine::new();
//! engine.load_level("level_1").expect("level_1 ships with the crate");
//!
//! let workspaces = engine.workspaces();
//! let workers = engine.workers();
//! for (worker, workspace) in workers.iter().zip(&workspaces) {
//!     engine.assign_to_workspace(worker.id, workspace.id);
//! }
//!
//! if let Some(report) = engine.end_turn() {
//!     println!("turn {} produced {:.0}", report.turn, report.productivity);
//! }
//! for event in engine.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod persistence;
pub mod progression;
pub mod shop;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::engine::{AssignOutcome, SimulationEngine, TurnReport};
    pub use crate::error::{ConfigError, LevelError, SaveError, ShopError};
    pub use crate::events::SimEvent;
    pub use crate::persistence::{RosterSnapshot, SavedWorker, SavedWorkspace};
    pub use workhorse_logic::constants::{WorkerKind, WorkspaceKind};
    pub use workhorse_logic::grid::{GridCell, GridSize};
    pub use workhorse_logic::ids::{WorkerId, WorkspaceId};
    pub use workhorse_logic::level::LevelStatus;
    pub use workhorse_logic::registry::RuleSet;
}
