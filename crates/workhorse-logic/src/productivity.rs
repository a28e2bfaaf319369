//! Productivity calculator - the ordered turn-output pipeline.
//!
//! 1. Base: workspace multiplier × worker base rate.
//! 2. Ability self overrides, in registration order, re-scaled by the
//!    workspace multiplier.
//! 3. Adjacency multipliers for every ordered (owner, target) pair of
//!    adjacent workers; several owners compose multiplicatively.
//! 4. Sum → total base.
//! 5. × (1 + Σ active bonus percent / 100).
//! 6. × Π ability total multipliers.
//!
//! All functions are pure and cheap enough to call every frame.

use std::collections::BTreeMap;

use crate::constants::{base_output, INCOME_PER_RATE};
use crate::ids::WorkerId;
use crate::layout::{workspaces_adjacent, Assignment, Layout, Workspace};
use crate::registry::SynergyRegistry;
use crate::synergy::SynergyRule;

/// Every intermediate of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductivityReport {
    /// Step 3 running value per placed worker, in snapshot order.
    pub per_worker: Vec<(WorkerId, f64)>,
    pub total_base: f64,
    pub bonus_factor: f64,
    pub total_multiplier: f64,
    pub total: f64,
}

impl ProductivityReport {
    /// Final contribution of each worker; sums to `total`.
    pub fn breakdown(&self) -> BTreeMap<WorkerId, f64> {
        let scale = self.bonus_factor * self.total_multiplier;
        self.per_worker
            .iter()
            .map(|(id, value)| (*id, value * scale))
            .collect()
    }
}

/// Steps 1–3: per-worker running values.
fn running_values(layout: &Layout<'_>, registry: &SynergyRegistry) -> Vec<(WorkerId, f64)> {
    let placed: Vec<(&Assignment, &Workspace)> = layout.placed().collect();

    let mut values: Vec<f64> = placed
        .iter()
        .map(|(a, w)| {
            let mut value = base_output(w.kind, a.kind);
            for rule in registry.ability_rules() {
                if let Some(rate) = rule.self_override(a, layout) {
                    value = rate * w.kind.multiplier() * INCOME_PER_RATE;
                }
            }
            value
        })
        .collect();

    for (t, (target, target_ws)) in placed.iter().enumerate() {
        for (owner, owner_ws) in &placed {
            if owner.worker_id == target.worker_id || !workspaces_adjacent(owner_ws, target_ws) {
                continue;
            }
            for rule in registry.ability_rules() {
                values[t] *= rule.adjacency_multiplier(owner, target);
            }
        }
    }

    placed
        .iter()
        .zip(values)
        .map(|((a, _), value)| (a.worker_id, value))
        .collect()
}

/// 1 + Σ (bonus percent / 100) over active non-ability rules.
pub fn bonus_factor(layout: &Layout<'_>, registry: &SynergyRegistry) -> f64 {
    let bonus: f64 = registry
        .bonus_rules()
        .filter(|rule| rule.is_active(layout))
        .map(|rule| rule.bonus_percent() / 100.0)
        .sum();
    1.0 + bonus
}

/// Π ability total multipliers.
pub fn total_multiplier(layout: &Layout<'_>, registry: &SynergyRegistry) -> f64 {
    registry
        .ability_rules()
        .iter()
        .map(|rule| rule.total_multiplier(layout))
        .product()
}

/// Run the full pipeline and keep every intermediate.
pub fn analyze(
    workspaces: &[Workspace],
    assignments: &[Assignment],
    registry: &SynergyRegistry,
) -> ProductivityReport {
    let layout = Layout::new(workspaces, assignments);
    let per_worker = running_values(&layout, registry);
    if per_worker.is_empty() {
        return ProductivityReport {
            per_worker,
            total_base: 0.0,
            bonus_factor: 1.0,
            total_multiplier: 1.0,
            total: 0.0,
        };
    }

    let total_base: f64 = per_worker.iter().map(|(_, v)| v).sum();
    let bonus_factor = bonus_factor(&layout, registry);
    let total_multiplier = total_multiplier(&layout, registry);

    ProductivityReport {
        per_worker,
        total_base,
        bonus_factor,
        total_multiplier,
        total: total_base * bonus_factor * total_multiplier,
    }
}

/// Final team productivity for one snapshot, in income units.
pub fn calculate(
    workspaces: &[Workspace],
    assignments: &[Assignment],
    registry: &SynergyRegistry,
) -> f64 {
    analyze(workspaces, assignments, registry).total
}

/// Step 1 only: Σ workspace multiplier × base rate.
pub fn base_productivity(workspaces: &[Workspace], assignments: &[Assignment]) -> f64 {
    let layout = Layout::new(workspaces, assignments);
    layout
        .placed()
        .map(|(a, w)| base_output(w.kind, a.kind))
        .sum()
}

/// Full-pipeline contribution per worker.
pub fn breakdown(
    workspaces: &[Workspace],
    assignments: &[Assignment],
    registry: &SynergyRegistry,
) -> BTreeMap<WorkerId, f64> {
    analyze(workspaces, assignments, registry).breakdown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{WorkerKind, WorkspaceKind};
    use crate::grid::GridCell;
    use crate::ids::WorkspaceId;

    fn ws(n: u128, x: i32, y: i32) -> Workspace {
        Workspace::unit(WorkspaceId::from_u128(n), WorkspaceKind::Basic, GridCell::new(x, y))
    }

    fn on(n: u128, ws: u128, kind: WorkerKind, rounds: u32) -> Assignment {
        Assignment {
            worker_id: WorkerId::from_u128(n),
            workspace_id: WorkspaceId::from_u128(ws),
            kind,
            rounds_worked: rounds,
        }
    }

    fn abilities() -> SynergyRegistry {
        SynergyRegistry::abilities_only()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(calculate(&[ws(1, 0, 1)], &[], &abilities()), 0.0);
        assert!(breakdown(&[], &[], &abilities()).is_empty());
    }

    #[test]
    fn test_solitary_alone_and_crowded() {
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1)];
        let alone = [on(10, 1, WorkerKind::Solitary, 0)];
        assert!((calculate(&workspaces, &alone, &abilities()) - 200.0).abs() < 1e-3);

        for other in [WorkerKind::Intern, WorkerKind::Saboteur, WorkerKind::Solitary] {
            let crowded = [on(10, 1, WorkerKind::Solitary, 0), on(11, 2, other, 0)];
            let parts = breakdown(&workspaces, &crowded, &abilities());
            let mine = parts[&WorkerId::from_u128(10)];
            // Saboteur scales the whole team; undo it to isolate the self value.
            let team = if other == WorkerKind::Saboteur { 0.85 } else { 1.0 };
            assert!((mine / team - 50.0).abs() < 1e-3, "{:?}: {}", other, mine);
        }
    }

    #[test]
    fn test_accelerator_growth_and_cap() {
        let workspaces = [ws(1, 0, 1)];
        for (rounds, expected) in [(0, 50.0), (1, 100.0), (4, 250.0), (10, 250.0)] {
            let a = [on(10, 1, WorkerKind::Accelerator, rounds)];
            let got = calculate(&workspaces, &a, &abilities());
            assert!((got - expected).abs() < 1e-3, "rounds {}: {}", rounds, got);
        }
    }

    #[test]
    fn test_decayer_goes_negative_but_floors() {
        let workspaces = [ws(1, 0, 1)];
        let a = [on(10, 1, WorkerKind::Decayer, 4)];
        assert!((calculate(&workspaces, &a, &abilities()) + 20.0).abs() < 1e-3);
        let a = [on(10, 1, WorkerKind::Decayer, 50)];
        assert!((calculate(&workspaces, &a, &abilities()) + 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_override_rescaled_by_workspace() {
        let workspaces = [Workspace::unit(
            WorkspaceId::from_u128(1),
            WorkspaceKind::Elite,
            GridCell::new(0, 1),
        )];
        let a = [on(10, 1, WorkerKind::Accelerator, 2)];
        // (0.5 + 1.0) × 2.0 × 100
        assert!((calculate(&workspaces, &a, &abilities()) - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_amplifier_and_dampener_compose() {
        // Regular at (1,1) flanked by an Amplifier (0,1) and a Dampener (2,1).
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1), ws(3, 2, 1)];
        let a = [
            on(10, 1, WorkerKind::Amplifier, 0),
            on(11, 2, WorkerKind::Regular, 0),
            on(12, 3, WorkerKind::Dampener, 0),
        ];
        let parts = breakdown(&workspaces, &a, &abilities());
        assert!((parts[&WorkerId::from_u128(11)] - 100.0 * 1.5 * 0.7).abs() < 1e-3);
        // Amplifier is not adjacent to the Dampener; its neighbour is a Regular.
        assert!((parts[&WorkerId::from_u128(10)] - 50.0).abs() < 1e-3);
        // Dampener is boosted by nobody, neighbour Regular has no ability.
        assert!((parts[&WorkerId::from_u128(12)] - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_two_amplifiers_stack() {
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1), ws(3, 1, 2)];
        let a = [
            on(10, 1, WorkerKind::Amplifier, 0),
            on(11, 2, WorkerKind::Regular, 0),
            on(12, 3, WorkerKind::Amplifier, 0),
        ];
        let parts = breakdown(&workspaces, &a, &abilities());
        assert!((parts[&WorkerId::from_u128(11)] - 225.0).abs() < 1e-3);
    }

    #[test]
    fn test_saboteur_floor_binds() {
        let workspaces: Vec<Workspace> = (0..11).map(|i| ws(i as u128 + 1, i, 1)).collect();
        let mut a = vec![on(100, 1, WorkerKind::Regular, 0)];
        for i in 0..10 {
            a.push(on(200 + i as u128, i as u128 + 2, WorkerKind::Saboteur, 0));
        }
        let report = analyze(&workspaces, &a, &abilities());
        assert_eq!(report.total_multiplier, 0.3);
        assert!((report.total - report.total_base * 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_bonus_is_additive() {
        // Lone Regular on the ground: Centered 15 + Cornered 20 + Elevated 15 + Grounded 10.
        let workspaces = [ws(1, 0, 1)];
        let a = [on(10, 1, WorkerKind::Regular, 0)];
        let report = analyze(&workspaces, &a, &SynergyRegistry::full());
        assert!((report.bonus_factor - 1.6).abs() < 1e-5);
        assert!((report.total - 160.0).abs() < 1e-3);
    }

    #[test]
    fn test_base_productivity_ignores_synergies() {
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1)];
        let a = [
            on(10, 1, WorkerKind::Solitary, 0),
            on(11, 2, WorkerKind::Amplifier, 0),
        ];
        assert!((base_productivity(&workspaces, &a) - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let workspaces = [ws(1, 0, 1), ws(2, 1, 1), ws(3, 1, 2), ws(4, 2, 1)];
        let a = [
            on(10, 1, WorkerKind::Solitary, 0),
            on(11, 2, WorkerKind::Amplifier, 0),
            on(12, 3, WorkerKind::Decayer, 2),
            on(13, 4, WorkerKind::Saboteur, 0),
        ];
        let registry = SynergyRegistry::full();
        let total = calculate(&workspaces, &a, &registry);
        let sum: f64 = breakdown(&workspaces, &a, &registry).values().sum();
        assert!((total - sum).abs() < 1e-4);
    }
}
