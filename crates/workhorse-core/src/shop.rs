//! Currency transactions: hiring, building, revealing and firing.
//!
//! Every transaction validates first and spends last, so a rejected
//! request never touches the balance.

use workhorse_logic::constants::{WorkerKind, WorkspaceKind};
use workhorse_logic::grid::{self, Footprint, GridCell, GridSize};
use workhorse_logic::ids::{WorkerId, WorkspaceId};

use crate::engine::SimulationEngine;
use crate::error::{ShopError, ShopResult};
use crate::events::SimEvent;

impl SimulationEngine {
    fn spend(&mut self, cost: i64) -> ShopResult<()> {
        if !self.ledger.try_spend(cost) {
            let err = ShopError::InsufficientFunds {
                needed: cost,
                available: self.ledger.balance(),
            };
            log::warn!("{}", err);
            return Err(err);
        }
        self.events.push(SimEvent::CurrencyChanged {
            balance: self.ledger.balance(),
        });
        Ok(())
    }

    /// Whether `kind` may be hired. Always true outside a level.
    pub fn is_kind_available(&self, kind: WorkerKind) -> bool {
        self.level
            .as_ref()
            .map_or(true, |l| l.config().is_kind_available(kind))
    }

    /// Buy a new, unassigned worker.
    pub fn hire_worker(&mut self, kind: WorkerKind) -> ShopResult<WorkerId> {
        if !self.is_kind_available(kind) {
            log::warn!("{} is not available in this level", kind);
            return Err(ShopError::KindUnavailable(kind));
        }
        self.spend(self.config.worker_price)?;
        let id = self.spawn_worker(kind);
        log::debug!("Hired {} {}", kind, id);
        Ok(id)
    }

    /// Buy a workspace at a valid placement.
    pub fn buy_workspace(
        &mut self,
        anchor: GridCell,
        size: GridSize,
        kind: WorkspaceKind,
    ) -> ShopResult<WorkspaceId> {
        let target = Footprint::new(anchor, size);
        if !grid::is_valid_placement(&target, &self.footprints_except(None), None) {
            log::warn!("Invalid placement at {:?}", anchor);
            return Err(ShopError::InvalidPlacement);
        }
        self.spend(self.config.workspace_price)?;
        Ok(self.spawn_workspace(anchor, size, kind))
    }

    /// Pay to unmask a worker's kind.
    pub fn reveal_worker(&mut self, id: WorkerId) -> ShopResult<()> {
        let worker = self.worker(id).ok_or(ShopError::UnknownWorker(id))?;
        if worker.revealed {
            return Err(ShopError::AlreadyRevealed(id));
        }
        self.spend(self.config.reveal_cost)?;

        self.with_worker_mut(id, |w| w.revealed = true);
        self.events.push(SimEvent::WorkerRevealed {
            worker: id,
            kind: worker.kind,
        });
        Ok(())
    }

    /// Pay the severance and remove the worker.
    pub fn fire_worker(&mut self, id: WorkerId) -> ShopResult<()> {
        if self.worker(id).is_none() {
            return Err(ShopError::UnknownWorker(id));
        }
        self.spend(self.config.fire_cost)?;
        self.despawn_worker(id);
        log::debug!("Fired {}", id);
        Ok(())
    }
}
